mod analyze;
mod snapshots;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const USER_AGENT_PREVIEW: usize = 24;

#[derive(Debug, Parser)]
#[command(name = "handlescan")]
#[command(about = "Acquire a public account's recent activity and analyze it")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Acquire and analyze one handle, printing the report as JSON
    Analyze {
        /// Handle to analyze; a leading '@' is ignored
        handle: String,
        /// Source platform: twitter (alias x) or instagram
        #[arg(long, default_value = "twitter")]
        platform: String,
        /// Write the report here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = handlescan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            handle,
            platform,
            output,
        } => {
            let success =
                analyze::run_analyze(&config, &handle, &platform, output.as_deref()).await?;
            Ok(if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Config => {
            print!("{}", render_config(&config));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// One `key = value` line per setting. The user agent is shortened since it
/// is usually a full browser string.
fn render_config(config: &handlescan_core::AppConfig) -> String {
    let acq = &config.acquisition;
    let analysis = &config.analysis;
    let user_agent = if config.http.user_agent.chars().count() > USER_AGENT_PREVIEW {
        let head: String = config.http.user_agent.chars().take(USER_AGENT_PREVIEW).collect();
        format!("{head}...")
    } else {
        config.http.user_agent.clone()
    };
    let lines = [
        ("env", config.env.to_string()),
        ("log_level", config.log_level.clone()),
        (
            "strategies_path",
            config.strategies_path.display().to_string(),
        ),
        (
            "snapshot_dir",
            config
                .snapshot_dir
                .as_ref()
                .map_or_else(|| "(unset)".to_owned(), |d| d.display().to_string()),
        ),
        ("deadline_secs", acq.deadline.as_secs().to_string()),
        ("min_yield", acq.min_yield.to_string()),
        ("max_scrolls", acq.max_scrolls.to_string()),
        ("no_new_threshold", acq.no_new_threshold.to_string()),
        ("lookback_days", acq.lookback_days.to_string()),
        ("snapshot_every", acq.snapshot_every.to_string()),
        (
            "delay_ms",
            format!("{}..={}", acq.delay_min_ms, acq.delay_max_ms),
        ),
        (
            "jitter_seed",
            acq.jitter_seed
                .map_or_else(|| "(os)".to_owned(), |s| s.to_string()),
        ),
        ("enrich_known_posts", acq.enrich_known_posts.to_string()),
        (
            "request_timeout_secs",
            config.http.request_timeout_secs.to_string(),
        ),
        ("user_agent", user_agent),
        ("duplicate_ratio", analysis.duplicate_ratio.to_string()),
        ("link_ratio", analysis.link_ratio.to_string()),
        ("hashtag_avg", analysis.hashtag_avg.to_string()),
        ("enable_heuristics", analysis.enable_heuristics.to_string()),
    ];
    lines
        .iter()
        .map(|(key, value)| format!("{key} = {value}\n"))
        .collect()
}

#[cfg(test)]
mod tests;
