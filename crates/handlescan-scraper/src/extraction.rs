//! The per-strategy extraction loop.
//!
//! ```text
//! Collecting ──no new posts × N──▶ Stalled ───────┐
//!     │  ──post older than cutoff─▶ CutoffReached ─┼──▶ Done
//!     │  ──global deadline───────▶ TimedOut ──────┘
//!     └──max_scrolls / capability error──────────────▶ Done
//! ```

use std::collections::HashSet;
use std::future::Future;

use chrono::{DateTime, Utc};
use handlescan_core::{AcquisitionConfig, Post, StopReason};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::dedup::Deduplicator;
use crate::error::AcquisitionError;
use crate::jitter::Jitter;
use crate::normalize::normalize_post;
use crate::page::{DiagnosticSink, LoopSnapshot, PageCapability};
use crate::types::RawPost;

/// State of an [`ExtractionLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Collecting,
    Stalled,
    CutoffReached,
    TimedOut,
    Done,
}

impl LoopState {
    /// The stop reason a terminal transition reports.
    #[must_use]
    pub fn stop_reason(self) -> Option<StopReason> {
        match self {
            LoopState::Stalled => Some(StopReason::Stalled),
            LoopState::CutoffReached => Some(StopReason::CutoffReached),
            LoopState::TimedOut => Some(StopReason::TimedOut),
            LoopState::Collecting | LoopState::Done => None,
        }
    }
}

/// What one loop run produced.
#[derive(Debug, Clone)]
pub struct LoopReport {
    /// Deduplicated, in-range posts, newest first.
    pub posts: Vec<Post>,
    pub stop_reason: StopReason,
    pub iterations: u32,
    /// Capability error that ended the loop, if any.
    pub error: Option<String>,
    /// Distinct posts dropped for being older than the lookback boundary.
    pub excluded_old: usize,
}

/// Runs `fut` until it completes or `deadline` passes.
pub(crate) async fn within_deadline<T>(
    deadline: Instant,
    operation: &'static str,
    fut: impl Future<Output = Result<T, AcquisitionError>>,
) -> Result<T, AcquisitionError> {
    match tokio::time::timeout_at(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(AcquisitionError::Timeout(operation)),
    }
}

/// Pulls batches from one page until it stalls, crosses the lookback
/// boundary, runs out of time or hits the iteration cap.
pub struct ExtractionLoop<'a> {
    config: &'a AcquisitionConfig,
    jitter: &'a mut dyn Jitter,
    sink: &'a dyn DiagnosticSink,
    deadline: Instant,
    cutoff: DateTime<Utc>,
    label: &'a str,
}

impl<'a> ExtractionLoop<'a> {
    /// `now` anchors the lookback boundary; `deadline` is the global one
    /// shared with every other strategy in the run.
    #[must_use]
    pub fn new(
        config: &'a AcquisitionConfig,
        jitter: &'a mut dyn Jitter,
        sink: &'a dyn DiagnosticSink,
        deadline: Instant,
        now: DateTime<Utc>,
        label: &'a str,
    ) -> Self {
        let cutoff = now - chrono::Duration::days(i64::from(config.lookback_days));
        Self {
            config,
            jitter,
            sink,
            deadline,
            cutoff,
            label,
        }
    }

    #[must_use]
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    /// Drives `page` to completion. Never fails: a capability error ends the
    /// loop with whatever was merged so far.
    pub async fn run(&mut self, page: &mut dyn PageCapability) -> LoopReport {
        let mut dedup = Deduplicator::new();
        let mut state = LoopState::Collecting;
        let mut stop_reason = StopReason::NotStarted;
        let mut iterations = 0u32;
        let mut no_new_streak = 0u32;
        let mut excluded_old = HashSet::new();
        let mut error = None;

        while state == LoopState::Collecting {
            if Instant::now() >= self.deadline {
                state = LoopState::TimedOut;
                break;
            }
            if iterations >= self.config.max_scrolls {
                stop_reason = StopReason::IterationCap;
                state = LoopState::Done;
                break;
            }

            iterations += 1;
            let (batch, advanced) = match self.fetch_batch(page).await {
                Ok(fetched) => fetched,
                Err(AcquisitionError::Timeout(_)) => {
                    state = LoopState::TimedOut;
                    break;
                }
                Err(e) => {
                    warn!(strategy = %self.label, iteration = iterations, error = %e, "extraction failed");
                    error = Some(e.to_string());
                    stop_reason = StopReason::ExtractionFailed;
                    state = LoopState::Done;
                    break;
                }
            };
            let batch_len = batch.len();

            let mut crossed_cutoff = false;
            let mut new_posts = 0usize;
            for raw in batch {
                let post = normalize_post(raw);
                if post.timestamp.is_some_and(|ts| ts < self.cutoff) {
                    excluded_old.insert(dedup.identity_key(&post));
                    if !post.is_pinned {
                        crossed_cutoff = true;
                    }
                    continue;
                }
                if dedup.merge(post, self.config.enrich_known_posts).is_new() {
                    new_posts += 1;
                }
            }

            if new_posts == 0 {
                no_new_streak += 1;
            } else {
                no_new_streak = 0;
            }

            debug!(
                strategy = %self.label,
                iteration = iterations,
                batch = batch_len,
                new_posts,
                collected = dedup.len(),
                no_new_streak,
                "extraction iteration"
            );

            self.maybe_snapshot(iterations, new_posts, no_new_streak, &dedup);

            if crossed_cutoff {
                state = LoopState::CutoffReached;
                break;
            }
            if no_new_streak >= self.config.no_new_threshold {
                state = LoopState::Stalled;
                break;
            }
            if iterations >= self.config.max_scrolls {
                stop_reason = StopReason::IterationCap;
                state = LoopState::Done;
                break;
            }

            if batch_len > 0 && !advanced {
                match within_deadline(self.deadline, "scroll_stimulus", page.scroll_stimulus())
                    .await
                {
                    Ok(()) => {}
                    Err(AcquisitionError::Timeout(_)) => {
                        state = LoopState::TimedOut;
                        break;
                    }
                    Err(e) => {
                        warn!(strategy = %self.label, iteration = iterations, error = %e, "scroll stimulus failed");
                        error = Some(e.to_string());
                        stop_reason = StopReason::ExtractionFailed;
                        state = LoopState::Done;
                        break;
                    }
                }
            }

            let delay = self
                .jitter
                .next_delay(self.config.delay_min_ms, self.config.delay_max_ms);
            let wake = (Instant::now() + delay).min(self.deadline);
            tokio::time::sleep_until(wake).await;
        }

        if let Some(reason) = state.stop_reason() {
            stop_reason = reason;
        }

        let posts = dedup.into_sorted();
        info!(
            strategy = %self.label,
            iterations,
            posts = posts.len(),
            excluded_old = excluded_old.len(),
            stop_reason = ?stop_reason,
            "extraction loop finished"
        );

        LoopReport {
            posts,
            stop_reason,
            iterations,
            error,
            excluded_old: excluded_old.len(),
        }
    }

    /// One batch. An empty batch gets one stimulus and one retry; the second
    /// flag reports whether that stimulus already advanced the page.
    async fn fetch_batch(
        &self,
        page: &mut dyn PageCapability,
    ) -> Result<(Vec<RawPost>, bool), AcquisitionError> {
        let batch = within_deadline(self.deadline, "extract_batch", page.extract_batch()).await?;
        if !batch.is_empty() {
            return Ok((batch, false));
        }
        within_deadline(self.deadline, "scroll_stimulus", page.scroll_stimulus()).await?;
        let retry = within_deadline(self.deadline, "extract_batch", page.extract_batch()).await?;
        Ok((retry, true))
    }

    fn maybe_snapshot(
        &self,
        iteration: u32,
        new_in_batch: usize,
        no_new_streak: u32,
        dedup: &Deduplicator,
    ) {
        let every = self.config.snapshot_every;
        if every == 0 || iteration % every != 0 {
            return;
        }
        let snapshot = LoopSnapshot {
            label: self.label.to_owned(),
            iteration,
            collected: dedup.len(),
            new_in_batch,
            no_new_streak,
            posts: dedup.snapshot(),
        };
        if let Err(e) = self.sink.record(&snapshot) {
            warn!(strategy = %self.label, iteration, error = %e, "failed to record loop snapshot");
        }
    }
}

#[cfg(test)]
#[path = "extraction_test.rs"]
mod tests;
