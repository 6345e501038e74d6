use chrono::{DateTime, Utc};
use handlescan_core::{AttemptSummary, FailureReason, ProfileSnapshot, StopReason};
use serde::{Deserialize, Serialize};

/// Whether a sub-analysis was computed from the activity stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Applicability {
    /// Computed from the profile and the activity stream.
    #[default]
    Full,
    /// Computed from profile metadata only; stream-derived fields are zero.
    ProfileOnly,
    /// The source family has no data for this view; every field is zero.
    NotApplicable,
}

/// Aggregate counters over the post list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub total_posts: usize,
    pub dated_posts: usize,
    pub undated_posts: usize,
    pub first_post_at: Option<DateTime<Utc>>,
    pub last_post_at: Option<DateTime<Utc>>,
    /// Days between the oldest and newest dated post.
    pub span_days: f64,
    pub total_likes: u64,
    pub total_retweets: u64,
    pub total_replies: u64,
    pub total_views: u64,
    pub posts_with_location: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorAnalysis {
    pub applicability: Applicability,
    pub account_type: String,
    pub activity_level: String,
    pub posting_consistency: String,
    /// Dated posts per day over the dated span (span floored at one day).
    pub posts_per_day: f64,
    pub avg_gap_hours: f64,
    /// UTC hour with the most posts.
    pub most_active_hour: Option<u32>,
    pub most_active_weekday: Option<String>,
}

/// Posts classified by the presence-only lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub applicability: Applicability,
    pub original_posts: usize,
    pub replies: usize,
    pub retweets: usize,
    pub media_posts: usize,
    pub link_posts: usize,
    pub sentiment: SentimentBreakdown,
    pub overall_sentiment: String,
    pub top_hashtags: Vec<TermCount>,
    pub top_mentions: Vec<TermCount>,
    pub avg_hashtags_per_post: f64,
    /// Share of posts whose text repeats an earlier post's text.
    pub duplicate_ratio: f64,
    pub link_ratio: f64,
    pub original_ratio: f64,
    pub media_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPost {
    pub id: String,
    pub text: String,
    pub permalink: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    /// `likes + 2 × retweets + 3 × replies`.
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementAnalysis {
    pub applicability: Applicability,
    pub avg_likes: f64,
    pub avg_retweets: f64,
    pub avg_replies: f64,
    pub avg_views: f64,
    /// Average total engagement as a percentage of followers.
    pub engagement_rate: f64,
    pub virality: String,
    pub top_posts: Vec<TopPost>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Low for no flags, Medium for one or two, High for three or more.
    #[must_use]
    pub fn from_flag_count(flags: usize) -> Self {
        match flags {
            0 => RiskLevel::Low,
            1 | 2 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousActivity {
    pub applicability: Applicability,
    pub flags: Vec<String>,
    pub risk_level: RiskLevel,
    /// Followers per followed account, following floored at one.
    pub follower_ratio: f64,
}

/// One scoring rule that moved the health score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthFactor {
    pub label: String,
    pub delta: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    /// Always within `[0, 100]`.
    pub score: u8,
    pub rating: String,
    pub factors: Vec<HealthFactor>,
}

/// An optional pattern finding. Never feeds the risk level or health score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicFinding {
    pub name: String,
    pub description: String,
    pub speculative: bool,
}

/// How the analyzed posts were obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionSummary {
    pub strategy: String,
    pub success: bool,
    pub error: Option<String>,
    pub stop_reason: StopReason,
    pub attempts: Vec<AttemptSummary>,
}

/// The assembled report. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub profile: ProfileSnapshot,
    pub statistics: Statistics,
    pub behavior: BehaviorAnalysis,
    pub content: ContentAnalysis,
    pub engagement: EngagementAnalysis,
    pub suspicious_activity: SuspiciousActivity,
    pub health_score: HealthScore,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub heuristics: Vec<HeuristicFinding>,
    pub acquisition: AcquisitionSummary,
    pub diagnostics: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// The response envelope: the report plus overall success and, when the
/// account could not be analyzed normally, the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    #[serde(flatten)]
    pub report: AnalysisReport,
}
