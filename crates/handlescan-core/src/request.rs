//! The `{handle, platform}` request contract.
//!
//! Invalid requests are client errors, never acquisition failures: callers
//! validate with [`AnalysisRequest::parse`] before any page is touched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::acquisition::SourceFamily;

const MAX_HANDLE_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid handle \"{0}\": expected 1-30 letters, digits, '_' or '.'")]
    InvalidHandle(String),

    #[error("unsupported platform \"{0}\": expected twitter or instagram")]
    UnsupportedPlatform(String),
}

/// The two supported source families, as named by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(alias = "x")]
    Twitter,
    Instagram,
}

impl Platform {
    /// The source family this platform's pages are shaped like.
    #[must_use]
    pub fn family(self) -> SourceFamily {
        match self {
            Platform::Twitter => SourceFamily::Timeline,
            Platform::Instagram => SourceFamily::ProfileCard,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Twitter => write!(f, "twitter"),
            Platform::Instagram => write!(f, "instagram"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twitter" | "x" => Ok(Platform::Twitter),
            "instagram" => Ok(Platform::Instagram),
            other => Err(RequestError::UnsupportedPlatform(other.to_owned())),
        }
    }
}

/// A validated analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub handle: String,
    pub platform: Platform,
}

impl AnalysisRequest {
    /// Validates raw request fields.
    ///
    /// The handle is trimmed and a single leading `@` is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] when a field is missing, the handle has
    /// characters outside `[A-Za-z0-9_.]` or the platform is unknown.
    pub fn parse(handle: Option<&str>, platform: Option<&str>) -> Result<Self, RequestError> {
        let raw_handle = handle
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(RequestError::MissingField("handle"))?;
        let raw_platform = platform
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(RequestError::MissingField("platform"))?;

        let handle = raw_handle.strip_prefix('@').unwrap_or(raw_handle);
        let valid = !handle.is_empty()
            && handle.len() <= MAX_HANDLE_LEN
            && handle
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if !valid {
            return Err(RequestError::InvalidHandle(raw_handle.to_owned()));
        }

        Ok(Self {
            handle: handle.to_owned(),
            platform: raw_platform.parse()?,
        })
    }
}
