//! Conversion from raw page records to [`handlescan_core::Post`] and
//! [`handlescan_core::ProfileSnapshot`].
//!
//! Every function here is total: malformed counts become `0`, malformed dates
//! and map links become `None`. Nothing defaults to the epoch or to "now".

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use handlescan_core::{Coordinates, Post, ProfileSnapshot};
use regex::Regex;

use crate::types::{RawPost, RawProfile};

static SUFFIX_EXACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?)([kmb])$").expect("valid suffix regex")
});

static SUFFIX_LEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*([kmb])\b").expect("valid leading suffix regex")
});

static COORD_QUERY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[?&](?:q|ll|query|center)=(-?\d{1,3}(?:\.\d+)?)(?:,|%2C)\s*(-?\d{1,3}(?:\.\d+)?)",
    )
    .expect("valid coordinate query regex")
});

static COORD_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/@(-?\d{1,3}(?:\.\d+)?),(-?\d{1,3}(?:\.\d+)?)").expect("valid coordinate path regex")
});

/// Parses a rendered counter such as `"1,234"`, `"1.2K"` or `"2M"`.
///
/// Thousands separators and whitespace are stripped, a trailing `K`/`M`/`B`
/// (any case) multiplies by 1e3/1e6/1e9, and anything else falls back to the
/// digits it contains. Empty, missing or digit-free input yields `0`.
#[must_use]
pub fn normalize_count(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };

    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '\u{a0}')
        .collect();
    if compact.is_empty() {
        return 0;
    }

    if let Ok(n) = compact.parse::<u64>() {
        return n;
    }

    if let Some(count) = SUFFIX_EXACT_RE
        .captures(&compact)
        .and_then(|cap| apply_suffix(&cap[1], &cap[2]))
    {
        return count;
    }

    let without_commas = raw.replace(',', "");
    if let Some(count) = SUFFIX_LEADING_RE
        .captures(without_commas.trim())
        .and_then(|cap| apply_suffix(&cap[1], &cap[2]))
    {
        return count;
    }

    if let Ok(value) = compact.parse::<f64>() {
        if value.is_finite() && value >= 0.0 {
            return f64_to_count(value.trunc());
        }
    }

    let digits: String = compact.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<u64>().unwrap_or(0)
}

fn apply_suffix(number: &str, suffix: &str) -> Option<u64> {
    let value = number.parse::<f64>().ok()?;
    let multiplier = match suffix.to_ascii_lowercase().as_str() {
        "k" => 1e3,
        "m" => 1e6,
        "b" => 1e9,
        _ => return None,
    };
    Some(f64_to_count((value * multiplier).round()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn f64_to_count(value: f64) -> u64 {
    // `as` saturates at the integer bounds.
    value as u64
}

/// Parses a rendered date into UTC.
///
/// Accepted shapes:
/// - RFC 3339: `2024-10-05T15:04:00Z`
/// - naive ISO datetime (UTC assumed): `2024-10-05T15:04:00`, `2024-10-05 15:04:00`
/// - ISO date: `2024-10-05`
/// - mirror timeline title: `Oct 5, 2024 · 3:04 PM UTC`
/// - legacy API: `Wed Oct 10 20:19:24 +0000 2018`
/// - mirror join-date title: `10:00 AM - 1 Jan 2010`
/// - join label: `Joined January 2010` (first of the month)
///
/// Returns `None` for anything else.
#[must_use]
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%a %b %d %H:%M:%S %z %Y") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }

    let cleaned = s.replace('·', " ");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned = cleaned.strip_suffix(" UTC").unwrap_or(&cleaned);
    for fmt in ["%b %d, %Y %I:%M %p", "%I:%M %p - %d %b %Y"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(naive.and_utc());
        }
    }

    if let Some(rest) = cleaned.strip_prefix("Joined ") {
        return NaiveDate::parse_from_str(&format!("1 {rest}"), "%d %B %Y")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|n| n.and_utc());
    }

    None
}

/// Extracts coordinates from a map link.
///
/// Two shapes are recognized: a query parameter (`?q=lat,lng`, also `ll`,
/// `query`, `center`, comma optionally percent-encoded) and a path segment
/// (`/@lat,lng`). Out-of-range values yield `None`.
#[must_use]
pub fn parse_coordinates(link: Option<&str>) -> Option<Coordinates> {
    let link = link?;
    let cap = COORD_QUERY_RE
        .captures(link)
        .or_else(|| COORD_PATH_RE.captures(link))?;

    let latitude = cap[1].parse::<f64>().ok()?;
    let longitude = cap[2].parse::<f64>().ok()?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some(Coordinates {
        latitude,
        longitude,
    })
}

/// Converts a raw page record into a [`Post`].
#[must_use]
pub fn normalize_post(raw: RawPost) -> Post {
    let permalink = raw
        .permalink
        .as_deref()
        .map(canonical_permalink)
        .filter(|p| !p.is_empty());
    let id = raw
        .id
        .map(|id| id.trim().to_owned())
        .filter(|id| !id.is_empty())
        .or_else(|| permalink.as_deref().and_then(id_from_permalink))
        .unwrap_or_default();

    let text = raw.text.trim().to_owned();
    let is_retweet = raw.is_retweet || text.starts_with("RT @");
    let is_reply = raw.is_reply || (!is_retweet && text.starts_with('@'));

    Post {
        id,
        timestamp: parse_timestamp(raw.date.as_deref()),
        likes: normalize_count(raw.likes.as_deref()),
        retweets: normalize_count(raw.retweets.as_deref()),
        replies: normalize_count(raw.replies.as_deref()),
        views: normalize_count(raw.views.as_deref()),
        has_image: raw.has_image,
        has_video: raw.has_video,
        coordinates: parse_coordinates(raw.location_link.as_deref()),
        place_name: raw.place_name.map(|p| p.trim().to_owned()).unwrap_or_default(),
        permalink,
        urls: raw.urls,
        is_reply,
        is_retweet,
        is_pinned: raw.is_pinned,
        text,
    }
}

/// Converts a raw profile header into a [`ProfileSnapshot`] for `handle`.
///
/// `page_protected` is the page-level verdict from navigation; either it or
/// the profile header can mark the account as protected.
#[must_use]
pub fn normalize_profile(raw: RawProfile, handle: &str, page_protected: bool) -> ProfileSnapshot {
    let text = |v: Option<String>| v.map(|s| s.trim().to_owned()).unwrap_or_default();

    ProfileSnapshot {
        handle: handle.to_owned(),
        join_date: parse_timestamp(raw.join_date.as_deref()),
        follower_count: normalize_count(raw.followers.as_deref()),
        following_count: normalize_count(raw.following.as_deref()),
        post_count: normalize_count(raw.posts.as_deref()),
        verified: raw.verified,
        avatar_url: raw.avatar_url.filter(|u| !u.trim().is_empty()),
        protected: raw.protected || page_protected,
        display_name: text(raw.display_name),
        bio: text(raw.bio),
        location: text(raw.location),
        website: text(raw.website),
    }
}

/// Drops the fragment and trailing slash: `/jack/status/20#m` → `/jack/status/20`.
fn canonical_permalink(permalink: &str) -> String {
    let without_fragment = permalink.split('#').next().unwrap_or(permalink);
    without_fragment.trim().trim_end_matches('/').to_owned()
}

/// Takes the trailing all-digit path segment, e.g. the status id.
fn id_from_permalink(permalink: &str) -> Option<String> {
    let last = permalink.rsplit('/').next()?;
    let last = last.split('?').next().unwrap_or(last);
    if !last.is_empty() && last.chars().all(|c| c.is_ascii_digit()) {
        Some(last.to_owned())
    } else {
        None
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
