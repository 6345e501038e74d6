//! Account type, activity level and posting rhythm.

use chrono::{Datelike, Timelike, Weekday};
use handlescan_core::{Post, ProfileSnapshot};

use crate::statistics::{coefficient_of_variation, compute_statistics, gap_hours, mean, ratio};
use crate::types::{Applicability, BehaviorAnalysis};

/// Activity and consistency label for sources without an activity stream.
pub const NOT_APPLICABLE: &str = "Not Applicable";

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Behavior view over `profile` and `posts`.
#[must_use]
pub fn analyze_behavior(profile: &ProfileSnapshot, posts: &[Post]) -> BehaviorAnalysis {
    let gaps = gap_hours(posts);
    let stats = compute_statistics(posts);

    BehaviorAnalysis {
        applicability: Applicability::Full,
        account_type: account_type(profile).to_owned(),
        activity_level: activity_level(posts.len()).to_owned(),
        posting_consistency: posting_consistency(&gaps).to_owned(),
        posts_per_day: ratio(stats.dated_posts, 1) / stats.span_days.max(1.0),
        avg_gap_hours: mean(&gaps),
        most_active_hour: most_active_hour(posts),
        most_active_weekday: most_active_weekday(posts),
    }
}

/// The placeholder view for sources without an activity stream: the
/// account type still comes from the profile, every stream-derived field is
/// [`NOT_APPLICABLE`] or zero.
#[must_use]
pub fn profile_only(profile: &ProfileSnapshot) -> BehaviorAnalysis {
    BehaviorAnalysis {
        applicability: Applicability::ProfileOnly,
        activity_level: NOT_APPLICABLE.to_owned(),
        posting_consistency: NOT_APPLICABLE.to_owned(),
        ..analyze_behavior(profile, &[])
    }
}

/// Follower tier, overridden by verification.
#[must_use]
pub fn account_type(profile: &ProfileSnapshot) -> &'static str {
    if profile.verified {
        return "Verified Account";
    }
    match profile.follower_count {
        n if n > 1_000_000 => "Mega Influencer",
        n if n > 100_000 => "Major Influencer",
        n if n > 10_000 => "Micro Influencer",
        n if n > 1_000 => "Active Community Member",
        _ => "Personal Account",
    }
}

#[must_use]
pub fn activity_level(post_count: usize) -> &'static str {
    match post_count {
        n if n >= 8 => "Very Active",
        n if n >= 4 => "Active",
        n if n >= 1 => "Low Activity",
        _ => "Inactive",
    }
}

/// Label for the coefficient of variation of inter-post gaps. Fewer than
/// two dated posts means no gap at all.
#[must_use]
pub fn posting_consistency(gaps: &[f64]) -> &'static str {
    if gaps.is_empty() {
        return "Insufficient Data";
    }
    match coefficient_of_variation(gaps) {
        cv if cv < 0.5 => "Very Consistent",
        cv if cv < 1.0 => "Consistent",
        cv if cv < 2.0 => "Irregular",
        _ => "Highly Irregular",
    }
}

/// Busiest UTC hour; ties go to the earlier hour.
fn most_active_hour(posts: &[Post]) -> Option<u32> {
    let mut hours = [0usize; 24];
    for ts in posts.iter().filter_map(|p| p.timestamp) {
        hours[ts.hour() as usize] += 1;
    }
    busiest(&hours).and_then(|h| u32::try_from(h).ok())
}

/// Busiest UTC weekday; ties go to the earlier day, Monday first.
fn most_active_weekday(posts: &[Post]) -> Option<String> {
    let mut days = [0usize; 7];
    for ts in posts.iter().filter_map(|p| p.timestamp) {
        days[ts.weekday().num_days_from_monday() as usize] += 1;
    }
    busiest(&days).map(|d| weekday_name(WEEKDAYS[d]).to_owned())
}

fn busiest(buckets: &[usize]) -> Option<usize> {
    let max = *buckets.iter().max()?;
    if max == 0 {
        return None;
    }
    buckets.iter().position(|&count| count == max)
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
