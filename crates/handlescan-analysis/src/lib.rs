//! Deterministic behavior and risk analysis over an acquired activity history.
//!
//! Every sub-analysis is a pure function of the profile snapshot and the
//! deduplicated post list, and every one of them returns a fully populated,
//! zero-valued structure when there is nothing to analyze. The
//! [`ReportAssembler`] merges them into one [`AnalysisReport`]; [`analyze`]
//! adds the response envelope.

pub mod behavior;
pub mod content;
pub mod engagement;
pub mod health;
pub mod heuristics;
pub mod insights;
pub mod pipeline;
pub mod report;
pub mod scorer;
pub mod statistics;
pub mod suspicious;
pub mod types;

pub use behavior::analyze_behavior;
pub use content::analyze_content;
pub use engagement::analyze_engagement;
pub use health::compute_health_score;
pub use heuristics::detect_patterns;
pub use pipeline::analyze;
pub use report::ReportAssembler;
pub use scorer::{classify, Sentiment};
pub use statistics::compute_statistics;
pub use suspicious::detect_suspicious_activity;
pub use types::{
    AcquisitionSummary, AnalysisReport, AnalysisResponse, Applicability, BehaviorAnalysis,
    ContentAnalysis, EngagementAnalysis, HealthFactor, HealthScore, HeuristicFinding, RiskLevel,
    SentimentBreakdown, Statistics, SuspiciousActivity, TermCount, TopPost,
};
