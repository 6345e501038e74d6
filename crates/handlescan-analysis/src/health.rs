//! Bounded account health score.

use handlescan_core::ProfileSnapshot;

use crate::types::{
    Applicability, BehaviorAnalysis, ContentAnalysis, HealthFactor, HealthScore,
    SuspiciousActivity,
};

const BASE_SCORE: i32 = 100;
const FLAG_PENALTY: i32 = 15;

/// Scores the account from 100, listing every rule that applied.
///
/// The activity rule only applies to a behavior view computed from the
/// activity stream.
///
/// The result is clamped to `[0, 100]`.
#[must_use]
pub fn compute_health_score(
    profile: &ProfileSnapshot,
    behavior: &BehaviorAnalysis,
    content: &ContentAnalysis,
    suspicious: &SuspiciousActivity,
) -> HealthScore {
    let mut factors = Vec::new();
    let mut apply = |label: &str, delta: i32| {
        factors.push(HealthFactor {
            label: label.to_owned(),
            delta,
        });
    };

    if profile.verified {
        apply("Verified account", 10);
    }
    if behavior.applicability == Applicability::Full {
        match behavior.activity_level.as_str() {
            "Very Active" | "Active" => apply("Active posting", 10),
            "Low Activity" | "Inactive" => apply("Low activity", -10),
            _ => {}
        }
    }
    if content.original_ratio > 0.7 {
        apply("Mostly original content", 15);
    }
    let ratio = profile.follower_ratio();
    if ratio >= 1.0 {
        apply("Healthy follower ratio", 10);
    } else if ratio < 0.1 {
        apply("Poor follower ratio", -10);
    }
    for flag in &suspicious.flags {
        apply(&format!("Suspicious activity: {flag}"), -FLAG_PENALTY);
    }

    let raw = BASE_SCORE + factors.iter().map(|f| f.delta).sum::<i32>();
    let score = u8::try_from(raw.clamp(0, 100)).unwrap_or(0);

    HealthScore {
        score,
        rating: rating(score).to_owned(),
        factors,
    }
}

#[must_use]
pub fn rating(score: u8) -> &'static str {
    match score {
        80.. => "Excellent",
        60..=79 => "Good",
        40..=59 => "Fair",
        _ => "Poor",
    }
}
