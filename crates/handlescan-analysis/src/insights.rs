//! Template-driven insight, recommendation and warning text.

use handlescan_core::ProfileSnapshot;

use crate::types::{
    Applicability, BehaviorAnalysis, ContentAnalysis, EngagementAnalysis, HealthScore, RiskLevel,
    Statistics, SuspiciousActivity,
};

/// The computed views the narrative is written from.
#[derive(Debug, Clone, Copy)]
pub struct Sections<'a> {
    pub profile: &'a ProfileSnapshot,
    pub statistics: &'a Statistics,
    pub behavior: &'a BehaviorAnalysis,
    pub content: &'a ContentAnalysis,
    pub engagement: &'a EngagementAnalysis,
    pub suspicious: &'a SuspiciousActivity,
    pub health: &'a HealthScore,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Narrative {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
}

/// Fills the templates from `sections`. Deterministic for identical input.
#[must_use]
pub fn write_narrative(sections: &Sections<'_>) -> Narrative {
    Narrative {
        insights: insights(sections),
        recommendations: recommendations(sections),
        warnings: warnings(sections),
    }
}

fn display_name(profile: &ProfileSnapshot) -> String {
    if profile.display_name.is_empty() {
        format!("@{}", profile.handle)
    } else {
        profile.display_name.clone()
    }
}

fn insights(s: &Sections<'_>) -> Vec<String> {
    let mut out = vec![format!(
        "{} is a {} with {} followers and {} following.",
        display_name(s.profile),
        s.behavior.account_type,
        s.profile.follower_count,
        s.profile.following_count
    )];

    if s.behavior.applicability == Applicability::ProfileOnly {
        out.push(format!(
            "The profile reports {} posts; this source exposes profile metadata only.",
            s.profile.post_count
        ));
    }
    if s.statistics.total_posts > 0 {
        out.push(format!(
            "Collected {} posts ({:.1} per day); activity level is {}.",
            s.statistics.total_posts, s.behavior.posts_per_day, s.behavior.activity_level
        ));
        out.push(format!(
            "Posting pattern: {}.",
            s.behavior.posting_consistency
        ));
    }
    if let (Some(hour), Some(day)) = (
        s.behavior.most_active_hour,
        s.behavior.most_active_weekday.as_deref(),
    ) {
        out.push(format!("Most active around {hour:02}:00 UTC, mostly on {day}."));
    }
    if s.engagement.applicability == Applicability::Full && s.statistics.total_posts > 0 {
        out.push(format!(
            "Average engagement rate is {:.2}% with {} virality.",
            s.engagement.engagement_rate,
            s.engagement.virality.to_lowercase()
        ));
    }
    if let Some(tag) = s.content.top_hashtags.first() {
        out.push(format!(
            "Most used hashtag is #{} ({} uses).",
            tag.term, tag.count
        ));
    }
    if s.statistics.total_posts > 0 {
        out.push(format!(
            "Overall tone is {}.",
            s.content.overall_sentiment.to_lowercase()
        ));
    }
    out.push(format!(
        "Account health is {} ({}/100).",
        s.health.rating, s.health.score
    ));
    out
}

fn recommendations(s: &Sections<'_>) -> Vec<String> {
    let mut out = Vec::new();
    let posts = s.statistics.total_posts;

    if s.behavior.applicability == Applicability::Full
        && matches!(s.behavior.activity_level.as_str(), "Low Activity" | "Inactive")
        && !s.profile.protected
    {
        out.push("Post more regularly to keep the audience engaged.".to_owned());
    }
    if matches!(
        s.behavior.posting_consistency.as_str(),
        "Irregular" | "Highly Irregular"
    ) {
        out.push("A steadier posting schedule would help followers anticipate content.".to_owned());
    }
    if posts > 0 && s.content.original_ratio < 0.5 {
        out.push("Most activity is replies or reposts; more original posts would strengthen the profile.".to_owned());
    }
    if posts >= 5 && s.content.media_ratio < 0.2 {
        out.push("Few posts carry images or video; adding media usually raises engagement.".to_owned());
    }
    if posts > 0
        && s.engagement.applicability == Applicability::Full
        && s.engagement.engagement_rate < 1.0
    {
        out.push("Engagement is below 1% of followers; questions and replies tend to start conversations.".to_owned());
    }
    if s.profile.follower_ratio() < 0.1 && s.profile.following_count > 0 {
        out.push("Following far more accounts than follow back can look like follow farming.".to_owned());
    }
    out
}

fn warnings(s: &Sections<'_>) -> Vec<String> {
    let mut out = Vec::new();

    if s.profile.protected {
        out.push("The account is protected; only profile metadata was analyzed.".to_owned());
    } else if s.statistics.total_posts == 0 && s.behavior.applicability == Applicability::Full {
        out.push("No posts were collected; activity metrics are zero-valued.".to_owned());
    }
    for flag in &s.suspicious.flags {
        out.push(format!("Suspicious activity: {flag}."));
    }
    if s.suspicious.risk_level == RiskLevel::High {
        out.push(format!(
            "High risk: {} suspicious signals detected.",
            s.suspicious.flags.len()
        ));
    }
    if s.statistics.undated_posts > 0 {
        out.push(format!(
            "{} posts had no readable date and were left out of timing metrics.",
            s.statistics.undated_posts
        ));
    }
    out
}
