use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Immutable settings for the fallback controller and its extraction loops.
///
/// Built once at startup and passed by reference into every strategy run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionConfig {
    /// Global wall-clock budget shared by every strategy in a run.
    pub deadline: Duration,
    /// A strategy yielding at least this many posts ends the run early.
    pub min_yield: usize,
    /// Hard cap on loop iterations per strategy.
    pub max_scrolls: u32,
    /// Consecutive iterations without a new post before the loop stalls.
    pub no_new_threshold: u32,
    pub lookback_days: u32,
    /// Emit a diagnostic snapshot every `snapshot_every` iterations; `0` disables.
    pub snapshot_every: u32,
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    /// Fixed seed for the jitter source. `None` seeds from the OS.
    pub jitter_seed: Option<u64>,
    /// Fill empty counters of re-encountered posts instead of dropping them.
    pub enrich_known_posts: bool,
    /// Bound handed to each page navigation. The global deadline still
    /// applies on top of it.
    pub navigate_timeout: Duration,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(120),
            min_yield: 50,
            max_scrolls: 40,
            no_new_threshold: 3,
            lookback_days: 30,
            snapshot_every: 0,
            delay_min_ms: 800,
            delay_max_ms: 2_000,
            jitter_seed: None,
            enrich_known_posts: true,
            navigate_timeout: Duration::from_secs(30),
        }
    }
}

/// Tunable thresholds for the analysis pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Duplicate-text ratio above which the duplicate-content rule fires.
    pub duplicate_ratio: f64,
    /// Link-bearing ratio above which the link-spam rule fires.
    pub link_ratio: f64,
    /// Average hashtags per post above which the stuffing rule fires.
    pub hashtag_avg: f64,
    /// Minimum post count before content-based rules are evaluated.
    pub min_posts_for_content_rules: usize,
    pub enable_heuristics: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            duplicate_ratio: 0.3,
            link_ratio: 0.8,
            hashtag_avg: 5.0,
            min_posts_for_content_rules: 5,
            enable_heuristics: false,
        }
    }
}

/// Settings for the HTTP-backed page adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub strategies_path: PathBuf,
    pub snapshot_dir: Option<PathBuf>,
    pub acquisition: AcquisitionConfig,
    pub analysis: AnalysisConfig,
    pub http: HttpConfig,
}
