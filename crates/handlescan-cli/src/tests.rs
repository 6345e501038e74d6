use std::time::Duration;

use handlescan_core::{AcquisitionConfig, AnalysisConfig, AppConfig, Environment, HttpConfig};

use super::*;

#[test]
fn parses_analyze_command() {
    let cli = Cli::try_parse_from(["handlescan", "analyze", "@jack"]).expect("expected valid cli args");

    match cli.command {
        Commands::Analyze {
            handle,
            platform,
            output,
        } => {
            assert_eq!(handle, "@jack");
            assert_eq!(platform, "twitter");
            assert!(output.is_none());
        }
        Commands::Config => panic!("expected analyze"),
    }
}

#[test]
fn parses_analyze_with_platform_and_output() {
    let cli = Cli::try_parse_from([
        "handlescan",
        "analyze",
        "someone",
        "--platform",
        "instagram",
        "-o",
        "report.json",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Analyze { ref platform, output: Some(ref path), .. }
            if platform == "instagram" && path == &PathBuf::from("report.json")
    ));
}

#[test]
fn parses_config_command() {
    let cli = Cli::try_parse_from(["handlescan", "config"]).expect("expected valid cli args");

    assert!(matches!(cli.command, Commands::Config));
}

#[test]
fn analyze_requires_a_handle() {
    assert!(Cli::try_parse_from(["handlescan", "analyze"]).is_err());
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["handlescan"]).is_err());
}

#[test]
fn renders_config_with_shortened_user_agent() {
    let config = AppConfig {
        env: Environment::Development,
        log_level: "info".to_owned(),
        strategies_path: PathBuf::from("./config/strategies.yaml"),
        snapshot_dir: None,
        acquisition: AcquisitionConfig {
            deadline: Duration::from_secs(120),
            ..AcquisitionConfig::default()
        },
        analysis: AnalysisConfig::default(),
        http: HttpConfig {
            request_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36".to_owned(),
        },
    };

    let rendered = render_config(&config);

    assert!(rendered.contains("env = development\n"));
    assert!(rendered.contains("deadline_secs = 120\n"));
    assert!(rendered.contains("snapshot_dir = (unset)\n"));
    assert!(rendered.contains("delay_ms = 800..=2000\n"));
    assert!(rendered.contains("user_agent = Mozilla/5.0 (X11; Linux ...\n"));
    assert!(!rendered.contains("AppleWebKit"));
}

#[test]
fn startup_config_loads_without_env_file() {
    let config = handlescan_core::load_app_config().expect("default config is valid");
    assert!(config.acquisition.min_yield >= 1);
}
