//! Ordered, deadline-bounded walk over acquisition strategies.

use std::time::Duration;

use chrono::{DateTime, Utc};
use handlescan_core::{
    AcquisitionConfig, AcquisitionOutcome, AcquisitionResult, AttemptSummary, PageState,
    ProfileSnapshot, SourceFamily, StopReason,
};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::extraction::{within_deadline, ExtractionLoop};
use crate::jitter::{Jitter, SeededJitter};
use crate::normalize::normalize_profile;
use crate::page::{DiagnosticSink, NavigateOptions, NoopSink, PageCapability};

/// Bound on `close()`, which also runs after the global deadline.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// One way of obtaining a handle's activity: a labeled page plus the URL to
/// drive it to.
pub struct Strategy {
    pub label: String,
    pub family: SourceFamily,
    pub url: String,
    pub user_agent: Option<String>,
    pub page: Box<dyn PageCapability>,
}

impl Strategy {
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        family: SourceFamily,
        url: impl Into<String>,
        page: Box<dyn PageCapability>,
    ) -> Self {
        Self {
            label: label.into(),
            family,
            url: url.into(),
            user_agent: None,
            page,
        }
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy")
            .field("label", &self.label)
            .field("family", &self.family)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Runs strategies in priority order under one global deadline and keeps
/// the best result.
pub struct FallbackController {
    config: AcquisitionConfig,
    jitter: Box<dyn Jitter>,
    sink: Box<dyn DiagnosticSink>,
}

impl FallbackController {
    /// A controller with jitter seeded from `config.jitter_seed` and no
    /// diagnostic sink.
    #[must_use]
    pub fn new(config: AcquisitionConfig) -> Self {
        let jitter = SeededJitter::from_config(config.jitter_seed);
        Self {
            config,
            jitter: Box::new(jitter),
            sink: Box::new(NoopSink),
        }
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: impl Jitter + 'static) -> Self {
        self.jitter = Box::new(jitter);
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    #[must_use]
    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Acquires `handle` through `strategies`, starting the global deadline now.
    ///
    /// Strategy failures are recorded on the outcome and never propagated.
    pub async fn run(
        &mut self,
        handle: &str,
        strategies: Vec<Strategy>,
        now: DateTime<Utc>,
    ) -> AcquisitionOutcome {
        let deadline = Instant::now() + self.config.deadline;
        self.run_until(handle, strategies, now, deadline).await
    }

    /// Same as [`Self::run`] with an explicit global deadline.
    pub async fn run_until(
        &mut self,
        handle: &str,
        strategies: Vec<Strategy>,
        now: DateTime<Utc>,
        deadline: Instant,
    ) -> AcquisitionOutcome {
        let mut best: Option<AcquisitionResult> = None;
        let mut profile: Option<ProfileSnapshot> = None;
        let mut attempts: Vec<AttemptSummary> = Vec::new();
        let total = strategies.len();

        for (position, mut strategy) in strategies.into_iter().enumerate() {
            if Instant::now() >= deadline {
                warn!(
                    handle,
                    skipped = total - position,
                    "global deadline exceeded; no further strategies attempted"
                );
                break;
            }

            info!(
                handle,
                strategy = %strategy.label,
                family = %strategy.family,
                url = %strategy.url,
                "attempting strategy"
            );
            let started = Instant::now();
            let (result, captured) = self
                .attempt(handle, &mut strategy, profile.is_none(), deadline, now)
                .await;

            match tokio::time::timeout(CLOSE_TIMEOUT, strategy.page.close()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(strategy = %strategy.label, error = %e, "failed to close page"),
                Err(_) => warn!(strategy = %strategy.label, "timed out closing page"),
            }

            if profile.is_none() {
                profile = captured;
            }

            let mut summary = AttemptSummary::from(&result);
            summary.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            attempts.push(summary);

            if result.success {
                info!(
                    strategy = %result.strategy_label,
                    posts = result.posts.len(),
                    stop_reason = ?result.stop_reason,
                    "strategy finished"
                );
            } else {
                warn!(
                    strategy = %result.strategy_label,
                    posts = result.posts.len(),
                    error = result.error.as_deref().unwrap_or("unknown"),
                    "strategy failed"
                );
            }

            let protected = result.page_state == PageState::Protected;
            let enough = result.success && result.yield_count() >= self.config.min_yield;

            if best.as_ref().is_none_or(|b| is_better(&result, b)) {
                best = Some(result);
            }

            if protected {
                info!(handle, "account is protected; stopping");
                break;
            }
            if enough {
                info!(handle, min_yield = self.config.min_yield, "minimum yield reached; stopping");
                break;
            }
        }

        let mut best = best.unwrap_or_else(|| {
            AcquisitionResult::failed(
                "none",
                SourceFamily::Timeline,
                "no strategy was attempted",
                PageState::Ready,
            )
        });

        if !attempts.is_empty() && attempts.iter().all(|a| !a.success && a.posts == 0) {
            best.success = false;
            best.error = Some(aggregate_errors(&attempts));
        }

        info!(
            handle,
            strategy = %best.strategy_label,
            posts = best.posts.len(),
            success = best.success,
            attempts = attempts.len(),
            "acquisition finished"
        );

        AcquisitionOutcome {
            best,
            profile,
            attempts,
        }
    }

    /// One strategy, from navigation to the end of its loop. `close()` is
    /// the caller's job.
    async fn attempt(
        &mut self,
        handle: &str,
        strategy: &mut Strategy,
        need_profile: bool,
        deadline: Instant,
        now: DateTime<Utc>,
    ) -> (AcquisitionResult, Option<ProfileSnapshot>) {
        let label = strategy.label.as_str();
        let family = strategy.family;
        let options = NavigateOptions {
            timeout: self.config.navigate_timeout,
            user_agent: strategy.user_agent.clone(),
        };

        let page_state = match within_deadline(
            deadline,
            "navigate",
            strategy.page.navigate(&strategy.url, &options),
        )
        .await
        {
            Ok(state) => state,
            Err(e) => {
                return (
                    AcquisitionResult::failed(label, family, e.to_string(), e.page_state()),
                    None,
                );
            }
        };

        match page_state {
            PageState::NotFound => {
                return (
                    AcquisitionResult::failed(label, family, "account not found", page_state),
                    None,
                );
            }
            PageState::Blocked => {
                return (
                    AcquisitionResult::failed(label, family, "access blocked", page_state),
                    None,
                );
            }
            PageState::Ready | PageState::Protected => {}
        }

        let page_protected = page_state == PageState::Protected;
        let mut profile = None;
        if need_profile || page_protected {
            match within_deadline(deadline, "extract_profile", strategy.page.extract_profile())
                .await
            {
                Ok(Some(raw)) => profile = Some(normalize_profile(raw, handle, page_protected)),
                Ok(None) => {}
                Err(e) => warn!(strategy = %label, error = %e, "profile extraction failed"),
            }
        }

        if page_protected || profile.as_ref().is_some_and(|p| p.protected) {
            let snapshot = profile.unwrap_or_else(|| ProfileSnapshot {
                protected: true,
                ..ProfileSnapshot::placeholder(handle)
            });
            let result = AcquisitionResult {
                strategy_label: label.to_owned(),
                family,
                posts: Vec::new(),
                success: true,
                error: None,
                page_state: PageState::Protected,
                stop_reason: StopReason::NotStarted,
                iterations: 0,
            };
            return (result, Some(snapshot));
        }

        if family == SourceFamily::ProfileCard {
            let success = profile.is_some();
            let result = AcquisitionResult {
                strategy_label: label.to_owned(),
                family,
                posts: Vec::new(),
                success,
                error: (!success).then(|| "no profile card on page".to_owned()),
                page_state,
                stop_reason: StopReason::NotStarted,
                iterations: 0,
            };
            return (result, profile);
        }

        let mut extraction = ExtractionLoop::new(
            &self.config,
            self.jitter.as_mut(),
            self.sink.as_ref(),
            deadline,
            now,
            label,
        );
        let report = extraction.run(strategy.page.as_mut()).await;

        let (success, error) = match report.stop_reason {
            StopReason::ExtractionFailed => (!report.posts.is_empty(), report.error),
            StopReason::TimedOut if report.posts.is_empty() => (
                false,
                Some("deadline exceeded before any post was collected".to_owned()),
            ),
            _ => (true, None),
        };

        let result = AcquisitionResult {
            strategy_label: label.to_owned(),
            family,
            posts: report.posts,
            success,
            error,
            page_state,
            stop_reason: report.stop_reason,
            iterations: report.iterations,
        };
        (result, profile)
    }
}

/// More posts wins; on equal yield a success replaces a failure. Otherwise
/// the earlier, higher-priority result stays.
fn is_better(candidate: &AcquisitionResult, best: &AcquisitionResult) -> bool {
    match candidate.posts.len().cmp(&best.posts.len()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => candidate.success && !best.success,
        std::cmp::Ordering::Less => false,
    }
}

/// `"<label>: <error>"` for every failed attempt, joined with `"; "`.
fn aggregate_errors(attempts: &[AttemptSummary]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.label, a.error.as_deref().unwrap_or("no posts")))
        .collect::<Vec<_>>()
        .join("; ")
}
