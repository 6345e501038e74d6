//! Rule-based suspicious-activity flags and the risk level derived from them.

use chrono::{DateTime, Utc};
use handlescan_core::{AnalysisConfig, Post, ProfileSnapshot};

use crate::content::analyze_content;
use crate::types::{Applicability, RiskLevel, SuspiciousActivity};

pub const UNUSUAL_FOLLOWING: &str = "Unusual following pattern";
pub const SUSPICIOUS_RATIO: &str = "Suspicious follower ratio";
pub const DUPLICATE_CONTENT: &str = "Duplicate content";
pub const LINK_SPAM: &str = "Link spam pattern";
pub const HASHTAG_STUFFING: &str = "Hashtag stuffing";
pub const NEW_ACCOUNT: &str = "New account with high followers";

/// Evaluates the suspicious-activity rules.
///
/// Profile rules always run. Content rules need `Applicability::Full` and at
/// least `config.min_posts_for_content_rules` posts; with
/// `Applicability::ProfileOnly` they are skipped entirely.
#[must_use]
pub fn detect_suspicious_activity(
    profile: &ProfileSnapshot,
    posts: &[Post],
    config: &AnalysisConfig,
    now: DateTime<Utc>,
    applicability: Applicability,
) -> SuspiciousActivity {
    let follower_ratio = profile.follower_ratio();
    let mut flags = Vec::new();

    if profile.following_count > 5_000 && follower_ratio < 0.1 {
        flags.push(UNUSUAL_FOLLOWING.to_owned());
    }
    if profile.follower_count > 10_000 && follower_ratio > 1_000.0 {
        flags.push(SUSPICIOUS_RATIO.to_owned());
    }

    if applicability == Applicability::Full && posts.len() >= config.min_posts_for_content_rules
    {
        let content = analyze_content(posts);
        if content.duplicate_ratio > config.duplicate_ratio {
            flags.push(DUPLICATE_CONTENT.to_owned());
        }
        if content.link_ratio > config.link_ratio {
            flags.push(LINK_SPAM.to_owned());
        }
        if content.avg_hashtags_per_post > config.hashtag_avg {
            flags.push(HASHTAG_STUFFING.to_owned());
        }
    }

    let young = profile
        .join_date
        .is_some_and(|joined| now - joined < chrono::Duration::days(30));
    if young && profile.follower_count > 10_000 {
        flags.push(NEW_ACCOUNT.to_owned());
    }

    SuspiciousActivity {
        applicability,
        risk_level: RiskLevel::from_flag_count(flags.len()),
        flags,
        follower_ratio,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap()
    }

    fn profile(followers: u64, following: u64) -> ProfileSnapshot {
        ProfileSnapshot {
            follower_count: followers,
            following_count: following,
            ..ProfileSnapshot::placeholder("x")
        }
    }

    fn posts(n: usize, text: impl Fn(usize) -> String) -> Vec<Post> {
        (0..n)
            .map(|i| Post {
                text: text(i),
                ..Post::default()
            })
            .collect()
    }

    fn detect(profile: &ProfileSnapshot, posts: &[Post]) -> SuspiciousActivity {
        detect_suspicious_activity(
            profile,
            posts,
            &AnalysisConfig::default(),
            now(),
            Applicability::Full,
        )
    }

    #[test]
    fn healthy_account_has_no_flags() {
        let result = detect(&profile(500, 300), &posts(10, |i| format!("post {i}")));
        assert!(result.flags.is_empty());
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn follow_farming_is_flagged() {
        let result = detect(&profile(100, 6_000), &[]);
        assert_eq!(result.flags, vec![UNUSUAL_FOLLOWING]);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn extreme_follower_ratio_is_flagged() {
        let result = detect(&profile(2_000_000, 1), &[]);
        assert_eq!(result.flags, vec![SUSPICIOUS_RATIO]);
        assert!((result.follower_ratio - 2_000_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn content_rules_need_enough_posts() {
        let spam = posts(4, |_| "same https://spam.example #a #b #c #d #e #f".to_owned());
        assert!(detect(&profile(500, 300), &spam).flags.is_empty());

        let spam = posts(5, |_| "same https://spam.example #a #b #c #d #e #f".to_owned());
        let result = detect(&profile(500, 300), &spam);
        assert_eq!(result.flags, vec![DUPLICATE_CONTENT, LINK_SPAM, HASHTAG_STUFFING]);
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn thresholds_are_configurable() {
        let linky = posts(10, |i| format!("read https://example.com/{i}"));
        let lenient = AnalysisConfig {
            link_ratio: 1.0,
            ..AnalysisConfig::default()
        };
        let result = detect_suspicious_activity(
            &profile(500, 300),
            &linky,
            &lenient,
            now(),
            Applicability::Full,
        );
        assert!(result.flags.is_empty());
    }

    #[test]
    fn young_popular_account_is_flagged() {
        let mut p = profile(20_000, 100);
        p.join_date = Some(now() - chrono::Duration::days(10));
        assert_eq!(detect(&p, &[]).flags, vec![NEW_ACCOUNT]);

        p.join_date = Some(now() - chrono::Duration::days(400));
        assert!(detect(&p, &[]).flags.is_empty());

        p.join_date = None;
        assert!(detect(&p, &[]).flags.is_empty());
    }

    #[test]
    fn profile_only_skips_content_rules() {
        let spam = posts(10, |_| "same https://spam.example".to_owned());
        let result = detect_suspicious_activity(
            &profile(100, 6_000),
            &spam,
            &AnalysisConfig::default(),
            now(),
            Applicability::ProfileOnly,
        );
        assert_eq!(result.flags, vec![UNUSUAL_FOLLOWING]);
        assert_eq!(result.applicability, Applicability::ProfileOnly);
    }
}
