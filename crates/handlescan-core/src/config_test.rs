use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "HANDLESCAN_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.acquisition, AcquisitionConfig::default());
    assert_eq!(cfg.analysis, AnalysisConfig::default());
    assert!(cfg.snapshot_dir.is_none());
    assert_eq!(cfg.http.request_timeout_secs, 30);
}

#[test]
fn build_app_config_reads_acquisition_overrides() {
    let mut map = HashMap::new();
    map.insert("HANDLESCAN_DEADLINE_SECS", "45");
    map.insert("HANDLESCAN_MIN_YIELD", "10");
    map.insert("HANDLESCAN_MAX_SCROLLS", "7");
    map.insert("HANDLESCAN_JITTER_SEED", "42");
    map.insert("HANDLESCAN_ENRICH_KNOWN_POSTS", "false");
    map.insert("HANDLESCAN_SNAPSHOT_DIR", "/tmp/snaps");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.acquisition.deadline, Duration::from_secs(45));
    assert_eq!(cfg.acquisition.min_yield, 10);
    assert_eq!(cfg.acquisition.max_scrolls, 7);
    assert_eq!(cfg.acquisition.jitter_seed, Some(42));
    assert!(!cfg.acquisition.enrich_known_posts);
    assert_eq!(cfg.snapshot_dir, Some(PathBuf::from("/tmp/snaps")));
}

#[test]
fn build_app_config_rejects_non_numeric_deadline() {
    let mut map = HashMap::new();
    map.insert("HANDLESCAN_DEADLINE_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HANDLESCAN_DEADLINE_SECS"),
        "expected InvalidEnvVar(HANDLESCAN_DEADLINE_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_inverted_delay_bounds() {
    let mut map = HashMap::new();
    map.insert("HANDLESCAN_DELAY_MIN_MS", "3000");
    map.insert("HANDLESCAN_DELAY_MAX_MS", "1000");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("DELAY_MIN_MS")),
        "expected Validation error, got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_max_scrolls() {
    let mut map = HashMap::new();
    map.insert("HANDLESCAN_MAX_SCROLLS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn build_app_config_rejects_zero_min_yield() {
    let mut map = HashMap::new();
    map.insert("HANDLESCAN_MIN_YIELD", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn request_timeout_bounds_navigation() {
    let mut map = HashMap::new();
    map.insert("HANDLESCAN_REQUEST_TIMEOUT_SECS", "12");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.http.request_timeout_secs, 12);
    assert_eq!(cfg.acquisition.navigate_timeout, Duration::from_secs(12));
}

#[test]
fn build_app_config_rejects_zero_request_timeout() {
    let mut map = HashMap::new();
    map.insert("HANDLESCAN_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("REQUEST_TIMEOUT")),
        "expected Validation error, got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_ratio_out_of_range() {
    let mut map = HashMap::new();
    map.insert("HANDLESCAN_LINK_RATIO", "1.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HANDLESCAN_LINK_RATIO"),
        "expected InvalidEnvVar(HANDLESCAN_LINK_RATIO), got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_analysis_overrides() {
    let mut map = HashMap::new();
    map.insert("HANDLESCAN_DUPLICATE_RATIO", "0.5");
    map.insert("HANDLESCAN_HASHTAG_AVG", "3");
    map.insert("HANDLESCAN_ENABLE_HEURISTICS", "true");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.analysis.duplicate_ratio - 0.5).abs() < f64::EPSILON);
    assert!((cfg.analysis.hashtag_avg - 3.0).abs() < f64::EPSILON);
    assert!(cfg.analysis.enable_heuristics);
}
