use handlescan_core::PageState;
use thiserror::Error;

/// A failure inside one acquisition strategy.
///
/// Never surfaced to callers directly: the fallback controller records it
/// on the attempt and moves on to the next strategy.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("account not found at {url}")]
    NotFound { url: String },

    #[error("blocked by {domain}: {reason}")]
    Blocked { domain: String, reason: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("deadline exceeded during {0}")]
    Timeout(&'static str),

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no page loaded; navigate first")]
    NotNavigated,
}

impl AcquisitionError {
    /// The page state this error implies for the attempt summary.
    #[must_use]
    pub fn page_state(&self) -> PageState {
        match self {
            AcquisitionError::NotFound { .. } => PageState::NotFound,
            AcquisitionError::Blocked { .. } => PageState::Blocked,
            _ => PageState::Ready,
        }
    }
}
