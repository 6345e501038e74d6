use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::acquisition::SourceFamily;
use crate::request::Platform;
use crate::ConfigError;

/// One acquisition strategy as declared in `strategies.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub label: String,
    pub family: SourceFamily,
    /// Scheme + host of the source, e.g. `https://nitter.net`.
    pub base_url: String,
    /// Per-strategy user agent; falls back to the global one.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl StrategyConfig {
    /// The page to navigate to for `handle`.
    #[must_use]
    pub fn target_url(&self, handle: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        match self.family {
            SourceFamily::Timeline => format!("{base}/{handle}"),
            SourceFamily::ProfileCard => format!("{base}/{handle}/"),
        }
    }
}

/// Ordered strategies per platform; order is priority.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategiesFile {
    #[serde(default)]
    pub twitter: Vec<StrategyConfig>,
    #[serde(default)]
    pub instagram: Vec<StrategyConfig>,
}

impl StrategiesFile {
    #[must_use]
    pub fn for_platform(&self, platform: Platform) -> &[StrategyConfig] {
        match platform {
            Platform::Twitter => &self.twitter,
            Platform::Instagram => &self.instagram,
        }
    }
}

/// Load and validate the strategies configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_strategies(path: &Path) -> Result<StrategiesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StrategiesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_strategies(&content)
}

fn parse_strategies(content: &str) -> Result<StrategiesFile, ConfigError> {
    let file: StrategiesFile =
        serde_yaml::from_str(content).map_err(ConfigError::StrategiesFileParse)?;
    validate_strategies(&file)?;
    Ok(file)
}

fn validate_strategies(file: &StrategiesFile) -> Result<(), ConfigError> {
    let mut seen_labels = HashSet::new();

    for strategy in file.twitter.iter().chain(file.instagram.iter()) {
        if strategy.label.trim().is_empty() {
            return Err(ConfigError::Validation(
                "strategy label must be non-empty".to_string(),
            ));
        }

        if !seen_labels.insert(strategy.label.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate strategy label: '{}'",
                strategy.label
            )));
        }

        if !(strategy.base_url.starts_with("http://") || strategy.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "strategy '{}' has invalid base_url '{}'; must start with http:// or https://",
                strategy.label, strategy.base_url
            )));
        }
    }

    Ok(())
}
