use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::app_config::{AcquisitionConfig, AnalysisConfig, AppConfig, Environment, HttpConfig};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is malformed or fails validation.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is malformed or fails validation.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_num = |var: &str, default: &str| -> Result<u64, ConfigError> {
        parse_value::<u64>(var, &or_default(var, default))
    };

    let parse_ratio = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = parse_value::<f64>(var, &or_default(var, default))?;
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("{value} is outside [0, 1]"),
            })
        }
    };

    let env = parse_environment(&or_default("HANDLESCAN_ENV", "development"))?;
    let log_level = or_default("HANDLESCAN_LOG_LEVEL", "info");
    let strategies_path = PathBuf::from(or_default(
        "HANDLESCAN_STRATEGIES_PATH",
        "./config/strategies.yaml",
    ));
    let snapshot_dir = lookup("HANDLESCAN_SNAPSHOT_DIR")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let jitter_seed = match lookup("HANDLESCAN_JITTER_SEED") {
        Ok(raw) => Some(parse_value::<u64>("HANDLESCAN_JITTER_SEED", &raw)?),
        Err(_) => None,
    };

    let request_timeout_secs = parse_num("HANDLESCAN_REQUEST_TIMEOUT_SECS", "30")?;

    let acquisition = AcquisitionConfig {
        deadline: Duration::from_secs(parse_num("HANDLESCAN_DEADLINE_SECS", "120")?),
        min_yield: to_usize("HANDLESCAN_MIN_YIELD", parse_num("HANDLESCAN_MIN_YIELD", "50")?)?,
        max_scrolls: to_u32("HANDLESCAN_MAX_SCROLLS", parse_num("HANDLESCAN_MAX_SCROLLS", "40")?)?,
        no_new_threshold: to_u32(
            "HANDLESCAN_NO_NEW_THRESHOLD",
            parse_num("HANDLESCAN_NO_NEW_THRESHOLD", "3")?,
        )?,
        lookback_days: to_u32(
            "HANDLESCAN_LOOKBACK_DAYS",
            parse_num("HANDLESCAN_LOOKBACK_DAYS", "30")?,
        )?,
        snapshot_every: to_u32(
            "HANDLESCAN_SNAPSHOT_EVERY",
            parse_num("HANDLESCAN_SNAPSHOT_EVERY", "0")?,
        )?,
        delay_min_ms: parse_num("HANDLESCAN_DELAY_MIN_MS", "800")?,
        delay_max_ms: parse_num("HANDLESCAN_DELAY_MAX_MS", "2000")?,
        jitter_seed,
        enrich_known_posts: parse_value::<bool>(
            "HANDLESCAN_ENRICH_KNOWN_POSTS",
            &or_default("HANDLESCAN_ENRICH_KNOWN_POSTS", "true"),
        )?,
        navigate_timeout: Duration::from_secs(request_timeout_secs),
    };
    validate_acquisition(&acquisition)?;

    let analysis = AnalysisConfig {
        duplicate_ratio: parse_ratio("HANDLESCAN_DUPLICATE_RATIO", "0.3")?,
        link_ratio: parse_ratio("HANDLESCAN_LINK_RATIO", "0.8")?,
        hashtag_avg: parse_value::<f64>(
            "HANDLESCAN_HASHTAG_AVG",
            &or_default("HANDLESCAN_HASHTAG_AVG", "5.0"),
        )?,
        min_posts_for_content_rules: 5,
        enable_heuristics: parse_value::<bool>(
            "HANDLESCAN_ENABLE_HEURISTICS",
            &or_default("HANDLESCAN_ENABLE_HEURISTICS", "false"),
        )?,
    };

    let http = HttpConfig {
        request_timeout_secs,
        user_agent: or_default("HANDLESCAN_USER_AGENT", DEFAULT_USER_AGENT),
    };

    Ok(AppConfig {
        env,
        log_level,
        strategies_path,
        snapshot_dir,
        acquisition,
        analysis,
        http,
    })
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn to_u32(var: &str, value: u64) -> Result<u32, ConfigError> {
    u32::try_from(value).map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

fn to_usize(var: &str, value: u64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

fn validate_acquisition(config: &AcquisitionConfig) -> Result<(), ConfigError> {
    if config.delay_min_ms > config.delay_max_ms {
        return Err(ConfigError::Validation(format!(
            "HANDLESCAN_DELAY_MIN_MS ({}) must not exceed HANDLESCAN_DELAY_MAX_MS ({})",
            config.delay_min_ms, config.delay_max_ms
        )));
    }
    if config.max_scrolls == 0 {
        return Err(ConfigError::Validation(
            "HANDLESCAN_MAX_SCROLLS must be at least 1".to_string(),
        ));
    }
    if config.min_yield == 0 {
        return Err(ConfigError::Validation(
            "HANDLESCAN_MIN_YIELD must be at least 1".to_string(),
        ));
    }
    if config.navigate_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "HANDLESCAN_REQUEST_TIMEOUT_SECS must be at least 1".to_string(),
        ));
    }
    if config.no_new_threshold == 0 {
        return Err(ConfigError::Validation(
            "HANDLESCAN_NO_NEW_THRESHOLD must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "HANDLESCAN_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
