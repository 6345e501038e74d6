//! The `analyze` command: validate, acquire, analyze, write JSON.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use handlescan_core::{load_strategies, AnalysisRequest, AppConfig};
use handlescan_scraper::{build_strategies, FallbackController};

use crate::snapshots::JsonFileSink;

/// Runs one analysis and writes the response to `output` (stdout if unset).
///
/// Returns the response's `success` flag. Invalid requests and broken
/// configuration are errors; an unavailable account is not.
///
/// # Errors
///
/// Returns an error if the request is invalid, the strategies file cannot
/// be loaded, no strategy is configured for the platform, or the output
/// cannot be written.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    handle: &str,
    platform: &str,
    output: Option<&Path>,
) -> anyhow::Result<bool> {
    let request = AnalysisRequest::parse(Some(handle), Some(platform))?;

    let strategies_file = load_strategies(&config.strategies_path)?;
    let configs = strategies_file.for_platform(request.platform);
    if configs.is_empty() {
        anyhow::bail!(
            "no strategies configured for {} in {}",
            request.platform,
            config.strategies_path.display()
        );
    }
    let strategies = build_strategies(&request.handle, configs, &config.http)?;

    let mut controller = FallbackController::new(config.acquisition.clone());
    if let Some(dir) = &config.snapshot_dir {
        controller = controller.with_sink(JsonFileSink::new(dir, &request.handle));
    }

    tracing::info!(
        handle = %request.handle,
        platform = %request.platform,
        strategies = strategies.len(),
        "starting analysis"
    );
    let now = Utc::now();
    let outcome = controller.run(&request.handle, strategies, now).await;
    let response = handlescan_analysis::analyze(&request.handle, &outcome, &config.analysis, now);

    let json = serde_json::to_string_pretty(&response)?;
    match output {
        Some(path) => std::fs::write(path, format!("{json}\n"))
            .with_context(|| format!("failed to write report to {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(response.success)
}
