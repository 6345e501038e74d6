//! The capability contract an acquisition strategy drives, plus the sink
//! that receives loop diagnostics.

use std::time::Duration;

use async_trait::async_trait;
use handlescan_core::{PageState, Post};
use serde::Serialize;

use crate::error::AcquisitionError;
use crate::types::{RawPost, RawProfile};

/// Options for one navigation.
#[derive(Debug, Clone)]
pub struct NavigateOptions {
    /// Upper bound for the load; the caller also bounds it by the global deadline.
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

/// A page the acquisition layer can drive.
///
/// Implementations wrap whatever actually renders the source: a browser
/// session, an HTML mirror, or a scripted fake in tests. Every call is a
/// suspension point; callers bound each one by the global deadline.
#[async_trait]
pub trait PageCapability: Send {
    /// Loads `url` and reports the state of the account as the page sees it.
    async fn navigate(
        &mut self,
        url: &str,
        options: &NavigateOptions,
    ) -> Result<PageState, AcquisitionError>;

    /// The profile header of the loaded page, if the page renders one.
    async fn extract_profile(&mut self) -> Result<Option<RawProfile>, AcquisitionError>;

    /// Post-like records currently visible on the page.
    async fn extract_batch(&mut self) -> Result<Vec<RawPost>, AcquisitionError>;

    /// Advances the page (scroll, "show more") so the next batch can differ.
    async fn scroll_stimulus(&mut self) -> Result<(), AcquisitionError>;

    /// Releases the page. Called once per strategy on every path.
    async fn close(&mut self) -> Result<(), AcquisitionError>;
}

/// Point-in-time view of an extraction loop, emitted every K iterations.
#[derive(Debug, Clone, Serialize)]
pub struct LoopSnapshot {
    pub label: String,
    pub iteration: u32,
    pub collected: usize,
    pub new_in_batch: usize,
    pub no_new_streak: u32,
    pub posts: Vec<Post>,
}

/// Receives loop snapshots. Failures are logged by the loop and never stop it.
pub trait DiagnosticSink: Send + Sync {
    /// # Errors
    ///
    /// Returns an I/O error if the snapshot could not be persisted.
    fn record(&self, snapshot: &LoopSnapshot) -> std::io::Result<()>;
}

/// A sink that discards every snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _snapshot: &LoopSnapshot) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_loop_progress() {
        let snapshot = LoopSnapshot {
            label: "mirror".to_owned(),
            iteration: 4,
            collected: 1,
            new_in_batch: 0,
            no_new_streak: 2,
            posts: vec![Post {
                id: "7".to_owned(),
                text: "hello".to_owned(),
                ..Post::default()
            }],
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["label"], "mirror");
        assert_eq!(json["iteration"], 4);
        assert_eq!(json["no_new_streak"], 2);
        assert_eq!(json["posts"][0]["id"], "7");
        assert!(json["posts"][0]["timestamp"].is_null());
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let snapshot = LoopSnapshot {
            label: String::new(),
            iteration: 0,
            collected: 0,
            new_in_batch: 0,
            no_new_streak: 0,
            posts: Vec::new(),
        };
        assert!(NoopSink.record(&snapshot).is_ok());
    }

    #[test]
    fn default_navigation_allows_thirty_seconds() {
        let options = NavigateOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert!(options.user_agent.is_none());
    }
}
