//! Optional pattern heuristics.
//!
//! Every finding is labeled speculative. None of them feeds the risk level
//! or the health score.

use handlescan_core::Post;

use crate::statistics::{coefficient_of_variation, gap_hours, mean, ratio, std_dev};
use crate::types::HeuristicFinding;

const ACROSTIC_MIN_POSTS: usize = 5;
const ACROSTIC_MIN_HANDLE: usize = 4;
const ACROSTIC_RUN: usize = 5;
const REGULAR_MIN_POSTS: usize = 6;
const REGULAR_MAX_CV: f64 = 0.1;
const EMOJI_PER_POST: usize = 5;
const EMOJI_POST_RATIO: f64 = 0.3;
const OUTLIER_MIN_POSTS: usize = 5;
const OUTLIER_SIGMAS: f64 = 3.0;

/// Runs every heuristic over `posts` for `handle`.
#[must_use]
pub fn detect_patterns(handle: &str, posts: &[Post]) -> Vec<HeuristicFinding> {
    [
        acrostic(handle, posts),
        timing_regularity(posts),
        emoji_stuffing(posts),
        engagement_outliers(posts),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn finding(name: &str, description: String) -> HeuristicFinding {
    HeuristicFinding {
        name: name.to_owned(),
        description,
        speculative: true,
    }
}

/// First letters of posts in chronological order spelling the handle or
/// repeating a run.
fn acrostic(handle: &str, posts: &[Post]) -> Option<HeuristicFinding> {
    let mut dated: Vec<&Post> = posts.iter().filter(|p| p.timestamp.is_some()).collect();
    if dated.len() < ACROSTIC_MIN_POSTS {
        return None;
    }
    dated.sort_by_key(|p| p.timestamp);

    let letters: String = dated
        .iter()
        .filter_map(|p| p.text.chars().find(|c| c.is_alphabetic()))
        .flat_map(char::to_lowercase)
        .collect();

    let handle: String = handle
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if handle.chars().count() >= ACROSTIC_MIN_HANDLE && letters.contains(&handle) {
        return Some(finding(
            "acrostic",
            format!("first letters of consecutive posts spell \"{handle}\""),
        ));
    }

    let chars: Vec<char> = letters.chars().collect();
    let runs: Vec<String> = chars
        .windows(ACROSTIC_RUN)
        .map(|w| w.iter().collect())
        .collect();
    runs.iter().enumerate().find_map(|(i, run)| {
        let later = runs.get(i + ACROSTIC_RUN..).unwrap_or(&[]);
        later.contains(run).then(|| {
            finding(
                "acrostic",
                format!("first letters of posts repeat the sequence \"{run}\""),
            )
        })
    })
}

/// Near-identical gaps between posts, as a scheduler would produce.
fn timing_regularity(posts: &[Post]) -> Option<HeuristicFinding> {
    let gaps = gap_hours(posts);
    if gaps.len() + 1 < REGULAR_MIN_POSTS {
        return None;
    }
    let cv = coefficient_of_variation(&gaps);
    (cv < REGULAR_MAX_CV).then(|| {
        finding(
            "timing_regularity",
            format!(
                "posts are spaced {:.1} hours apart with variation {cv:.3}",
                mean(&gaps)
            ),
        )
    })
}

fn emoji_stuffing(posts: &[Post]) -> Option<HeuristicFinding> {
    let stuffed = posts
        .iter()
        .filter(|p| p.text.chars().filter(|c| is_emoji(*c)).count() >= EMOJI_PER_POST)
        .count();
    let share = ratio(stuffed, posts.len());
    (share > EMOJI_POST_RATIO).then(|| {
        finding(
            "emoji_stuffing",
            format!(
                "{stuffed} of {} posts carry {EMOJI_PER_POST} or more emoji",
                posts.len()
            ),
        )
    })
}

#[allow(clippy::cast_precision_loss)]
fn engagement_outliers(posts: &[Post]) -> Option<HeuristicFinding> {
    if posts.len() < OUTLIER_MIN_POSTS {
        return None;
    }
    let totals: Vec<f64> = posts.iter().map(|p| p.total_engagement() as f64).collect();
    let threshold = mean(&totals) + OUTLIER_SIGMAS * std_dev(&totals);
    let outliers: Vec<&str> = posts
        .iter()
        .zip(&totals)
        .filter(|(_, total)| **total > threshold)
        .map(|(p, _)| p.id.as_str())
        .collect();
    if outliers.is_empty() {
        return None;
    }
    Some(finding(
        "engagement_outliers",
        format!(
            "{} posts far above typical engagement: {}",
            outliers.len(),
            outliers.join(", ")
        ),
    ))
}

fn is_emoji(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1F300..=0x1FAFF | 0x2600..=0x27BF | 0x1F1E6..=0x1F1FF
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn dated(texts: &[&str], spacing_hours: &[i64]) -> Vec<Post> {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut at = 0;
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                if i > 0 {
                    at += spacing_hours[(i - 1) % spacing_hours.len()];
                }
                Post {
                    id: i.to_string(),
                    text: (*text).to_owned(),
                    timestamp: Some(base + chrono::Duration::hours(at)),
                    ..Post::default()
                }
            })
            .collect()
    }

    #[test]
    fn spots_handle_acrostic() {
        let posts = dated(&["Just", "Another", "Cool", "Kite", "day"], &[1, 5, 2]);
        let findings = detect_patterns("jack", &posts);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "acrostic");
        assert!(findings[0].speculative);
    }

    #[test]
    fn spots_repeated_letter_run() {
        let texts = [
            "alpha", "bravo", "charlie", "delta", "echo", "xray", "alpha", "bravo", "charlie",
            "delta", "echo",
        ];
        let posts = dated(&texts, &[1, 7, 3]);
        let findings = detect_patterns("zz", &posts);
        assert!(findings
            .iter()
            .any(|f| f.name == "acrostic" && f.description.contains("abcde")));
    }

    #[test]
    fn spots_scheduled_posting() {
        let posts = dated(&["a1", "b2", "c3", "d4", "e5", "f6"], &[6]);
        let findings = detect_patterns("handle", &posts);
        assert!(findings.iter().any(|f| f.name == "timing_regularity"));
    }

    #[test]
    fn spots_emoji_stuffing() {
        let posts: Vec<Post> = ["🔥🔥🔥🔥🔥 buy", "🚀🚀🚀🚀🚀🚀", "plain"]
            .iter()
            .map(|t| Post {
                text: (*t).to_owned(),
                ..Post::default()
            })
            .collect();
        let findings = detect_patterns("handle", &posts);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "emoji_stuffing");
    }

    #[test]
    fn spots_engagement_outlier() {
        let mut posts: Vec<Post> = (0..19)
            .map(|i| Post {
                id: format!("p{i}"),
                likes: 1,
                ..Post::default()
            })
            .collect();
        posts.push(Post {
            id: "viral".to_owned(),
            likes: 1_000,
            ..Post::default()
        });
        let findings = detect_patterns("handle", &posts);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].description.contains("viral"));
    }

    #[test]
    fn quiet_history_has_no_findings() {
        assert!(detect_patterns("handle", &[]).is_empty());
        let posts = dated(&["one", "two", "three"], &[1, 9]);
        assert!(detect_patterns("handle", &posts).is_empty());
    }
}
