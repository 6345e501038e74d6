//! Acquisition results exchanged between the scraper and the analysis layer.

use serde::{Deserialize, Serialize};

use crate::posts::{Post, ProfileSnapshot};

/// The shape of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFamily {
    /// A dated, dynamically loaded activity stream.
    Timeline,
    /// Profile metadata only; no timestamped activity stream.
    ProfileCard,
}

impl std::fmt::Display for SourceFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFamily::Timeline => write!(f, "timeline"),
            SourceFamily::ProfileCard => write!(f, "profile_card"),
        }
    }
}

/// What a page reported about the account once it finished loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    #[default]
    Ready,
    NotFound,
    Protected,
    Blocked,
}

/// Why an extraction loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The loop never ran (navigation failed or the page was not usable).
    #[default]
    NotStarted,
    Stalled,
    CutoffReached,
    TimedOut,
    IterationCap,
    ExtractionFailed,
}

/// Outcome of one strategy attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionResult {
    pub strategy_label: String,
    pub family: SourceFamily,
    /// Deduplicated, in-range posts, newest first.
    pub posts: Vec<Post>,
    pub success: bool,
    pub error: Option<String>,
    pub page_state: PageState,
    pub stop_reason: StopReason,
    pub iterations: u32,
}

impl AcquisitionResult {
    /// A result for an attempt that produced nothing.
    #[must_use]
    pub fn failed(
        strategy_label: &str,
        family: SourceFamily,
        error: impl Into<String>,
        page_state: PageState,
    ) -> Self {
        Self {
            strategy_label: strategy_label.to_owned(),
            family,
            posts: Vec::new(),
            success: false,
            error: Some(error.into()),
            page_state,
            stop_reason: StopReason::NotStarted,
            iterations: 0,
        }
    }

    #[must_use]
    pub fn yield_count(&self) -> usize {
        self.posts.len()
    }
}

/// Per-attempt bookkeeping kept by the fallback controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub label: String,
    pub posts: usize,
    pub success: bool,
    pub error: Option<String>,
    pub page_state: PageState,
    pub stop_reason: StopReason,
    pub elapsed_ms: u64,
}

impl From<&AcquisitionResult> for AttemptSummary {
    fn from(result: &AcquisitionResult) -> Self {
        Self {
            label: result.strategy_label.clone(),
            posts: result.posts.len(),
            success: result.success,
            error: result.error.clone(),
            page_state: result.page_state,
            stop_reason: result.stop_reason,
            elapsed_ms: 0,
        }
    }
}

/// Distinguished reason attached to a response when the account could not
/// be analyzed normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    NotFound,
    Protected,
    Blocked,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::NotFound => write!(f, "not_found"),
            FailureReason::Protected => write!(f, "protected"),
            FailureReason::Blocked => write!(f, "blocked"),
        }
    }
}

/// Everything the fallback controller hands to the analysis layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionOutcome {
    pub best: AcquisitionResult,
    /// The single profile snapshot captured during the run, if any.
    pub profile: Option<ProfileSnapshot>,
    pub attempts: Vec<AttemptSummary>,
}

impl AcquisitionOutcome {
    /// `true` when neither a profile nor a single post could be obtained.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.profile.is_none() && self.best.posts.is_empty()
    }

    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.best.page_state == PageState::Protected
            || self.profile.as_ref().is_some_and(|p| p.protected)
    }

    /// The reason reported alongside the response, if any.
    ///
    /// A protected account is a successful acquisition and still reports
    /// `protected`. An unavailable account reports `not_found` when any
    /// strategy saw a missing account, otherwise `blocked`.
    #[must_use]
    pub fn failure_reason(&self) -> Option<FailureReason> {
        if self.is_protected() {
            return Some(FailureReason::Protected);
        }
        if !self.is_unavailable() {
            return None;
        }
        if self
            .attempts
            .iter()
            .any(|a| a.page_state == PageState::NotFound)
        {
            Some(FailureReason::NotFound)
        } else {
            Some(FailureReason::Blocked)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(label: &str, page_state: PageState) -> AttemptSummary {
        AttemptSummary {
            label: label.to_owned(),
            posts: 0,
            success: false,
            error: Some("boom".to_owned()),
            page_state,
            stop_reason: StopReason::NotStarted,
            elapsed_ms: 5,
        }
    }

    fn outcome(profile: Option<ProfileSnapshot>, attempts: Vec<AttemptSummary>) -> AcquisitionOutcome {
        AcquisitionOutcome {
            best: AcquisitionResult::failed("a", SourceFamily::Timeline, "boom", PageState::Ready),
            profile,
            attempts,
        }
    }

    #[test]
    fn not_found_wins_over_blocked() {
        let o = outcome(
            None,
            vec![attempt("a", PageState::Blocked), attempt("b", PageState::NotFound)],
        );
        assert_eq!(o.failure_reason(), Some(FailureReason::NotFound));
    }

    #[test]
    fn generic_failure_reports_blocked() {
        let o = outcome(None, vec![attempt("a", PageState::Ready)]);
        assert_eq!(o.failure_reason(), Some(FailureReason::Blocked));
    }

    #[test]
    fn profile_without_posts_is_not_a_failure() {
        let o = outcome(Some(ProfileSnapshot::placeholder("x")), vec![]);
        assert!(o.failure_reason().is_none());
    }

    #[test]
    fn protected_profile_reports_protected() {
        let profile = ProfileSnapshot {
            protected: true,
            ..ProfileSnapshot::placeholder("x")
        };
        let o = outcome(Some(profile), vec![]);
        assert_eq!(o.failure_reason(), Some(FailureReason::Protected));
    }

    #[test]
    fn page_state_serializes_snake_case() {
        let json = serde_json::to_string(&PageState::NotFound).unwrap();
        assert_eq!(json, "\"not_found\"");
    }
}
