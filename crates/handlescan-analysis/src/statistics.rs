//! Aggregate counters plus the small numeric helpers the sub-analyses share.

use chrono::{DateTime, Utc};
use handlescan_core::Post;

use crate::types::Statistics;

/// Aggregate counters over `posts`. All zero for an empty list.
#[must_use]
pub fn compute_statistics(posts: &[Post]) -> Statistics {
    let dated = dated_timestamps(posts);
    let first_post_at = dated.first().copied();
    let last_post_at = dated.last().copied();
    let span_days = match (first_post_at, last_post_at) {
        (Some(first), Some(last)) => hours_between(first, last) / 24.0,
        _ => 0.0,
    };

    Statistics {
        total_posts: posts.len(),
        dated_posts: dated.len(),
        undated_posts: posts.len() - dated.len(),
        first_post_at,
        last_post_at,
        span_days,
        total_likes: saturating_sum(posts, |p| p.likes),
        total_retweets: saturating_sum(posts, |p| p.retweets),
        total_replies: saturating_sum(posts, |p| p.replies),
        total_views: saturating_sum(posts, |p| p.views),
        posts_with_location: posts.iter().filter(|p| p.coordinates.is_some()).count(),
    }
}

/// Counter total that pins at `u64::MAX` instead of overflowing.
fn saturating_sum(posts: &[Post], field: fn(&Post) -> u64) -> u64 {
    posts
        .iter()
        .fold(0u64, |acc, p| acc.saturating_add(field(p)))
}

/// Timestamps of dated posts, oldest first.
pub(crate) fn dated_timestamps(posts: &[Post]) -> Vec<DateTime<Utc>> {
    let mut dated: Vec<_> = posts.iter().filter_map(|p| p.timestamp).collect();
    dated.sort_unstable();
    dated
}

/// Hours between consecutive dated posts, oldest first.
pub(crate) fn gap_hours(posts: &[Post]) -> Vec<f64> {
    dated_timestamps(posts)
        .windows(2)
        .map(|pair| hours_between(pair[0], pair[1]))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_seconds() as f64 / 3_600.0
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// `std_dev / mean`; `0.0` when the mean is zero.
pub(crate) fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m.abs() < f64::EPSILON {
        0.0
    } else {
        std_dev(values) / m
    }
}
