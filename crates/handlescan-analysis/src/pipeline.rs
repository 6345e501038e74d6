use chrono::{DateTime, Utc};
use handlescan_core::{AcquisitionOutcome, AnalysisConfig};

use crate::report::ReportAssembler;
use crate::types::AnalysisResponse;

/// Analyzes `outcome` and wraps the report in the response envelope.
///
/// `success` is false only when neither a profile nor a post was acquired.
/// A protected account is a success that still carries `reason: protected`.
#[must_use]
pub fn analyze(
    handle: &str,
    outcome: &AcquisitionOutcome,
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> AnalysisResponse {
    let report = ReportAssembler::new(config.clone()).assemble(handle, outcome, now, now);
    let success = !outcome.is_unavailable();
    let reason = outcome.failure_reason();

    if success {
        tracing::info!(
            handle,
            strategy = %outcome.best.strategy_label,
            posts = outcome.best.posts.len(),
            risk = %report.suspicious_activity.risk_level,
            score = report.health_score.score,
            "analysis complete"
        );
    } else {
        tracing::warn!(handle, reason = ?reason, "account not available");
    }

    AnalysisResponse {
        success,
        reason,
        report,
    }
}
