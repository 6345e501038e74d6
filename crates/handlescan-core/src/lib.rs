//! Shared domain types and configuration for handlescan.
//!
//! Everything the acquisition and analysis crates exchange lives here:
//! normalized posts, the profile snapshot, per-strategy acquisition results,
//! the request contract, and the environment/YAML configuration layer.

pub mod acquisition;
pub mod app_config;
pub mod config;
pub mod posts;
pub mod request;
pub mod strategies;

pub use acquisition::{
    AcquisitionOutcome, AcquisitionResult, AttemptSummary, FailureReason, PageState,
    SourceFamily, StopReason,
};
pub use app_config::{AcquisitionConfig, AnalysisConfig, AppConfig, Environment, HttpConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use posts::{Coordinates, Post, ProfileSnapshot};
pub use request::{AnalysisRequest, Platform, RequestError};
pub use strategies::{load_strategies, StrategiesFile, StrategyConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read strategies file {path}: {source}")]
    StrategiesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse strategies file: {0}")]
    StrategiesFileParse(#[source] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}
