//! Merges the acquisition outcome and every sub-analysis into one report.

use chrono::{DateTime, Utc};
use handlescan_core::{AcquisitionOutcome, AnalysisConfig, ProfileSnapshot, SourceFamily};

use crate::insights::{write_narrative, Sections};
use crate::types::{AcquisitionSummary, AnalysisReport, Applicability};
use crate::{
    analyze_behavior, analyze_content, analyze_engagement, behavior, compute_health_score,
    compute_statistics, content, detect_patterns, detect_suspicious_activity, engagement,
};

/// Builds [`AnalysisReport`]s. Holds no state besides its configuration, so
/// identical inputs and timestamps always yield identical reports.
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    config: AnalysisConfig,
}

impl ReportAssembler {
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Assembles the report for `handle`.
    ///
    /// `generated_at` is stamped on the report; `now` anchors account-age
    /// rules. A missing profile is replaced by a handle-only placeholder and
    /// noted in `diagnostics`.
    #[must_use]
    pub fn assemble(
        &self,
        handle: &str,
        outcome: &AcquisitionOutcome,
        generated_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AnalysisReport {
        let mut diagnostics = Vec::new();
        let posts = outcome.best.posts.as_slice();

        let profile = if let Some(profile) = &outcome.profile {
            profile.clone()
        } else {
            tracing::warn!(handle, "no profile snapshot acquired, using placeholder");
            diagnostics.push(format!(
                "no profile snapshot was acquired; using a placeholder for @{handle}"
            ));
            ProfileSnapshot::placeholder(handle)
        };

        let profile_only = outcome.best.family == SourceFamily::ProfileCard
            && !posts.iter().any(|p| p.timestamp.is_some());
        if profile_only {
            diagnostics.push(format!(
                "source {} has no dated activity stream; stream-derived views are placeholders",
                outcome.best.strategy_label
            ));
        }

        let statistics = compute_statistics(posts);
        let (behavior, content, engagement, suspicious) = if profile_only {
            (
                behavior::profile_only(&profile),
                content::not_applicable(),
                engagement::not_applicable(&profile),
                detect_suspicious_activity(
                    &profile,
                    &[],
                    &self.config,
                    now,
                    Applicability::ProfileOnly,
                ),
            )
        } else {
            (
                analyze_behavior(&profile, posts),
                analyze_content(posts),
                analyze_engagement(&profile, posts),
                detect_suspicious_activity(&profile, posts, &self.config, now, Applicability::Full),
            )
        };
        let health = compute_health_score(&profile, &behavior, &content, &suspicious);

        let narrative = write_narrative(&Sections {
            profile: &profile,
            statistics: &statistics,
            behavior: &behavior,
            content: &content,
            engagement: &engagement,
            suspicious: &suspicious,
            health: &health,
        });

        let heuristics = if self.config.enable_heuristics {
            detect_patterns(&profile.handle, posts)
        } else {
            Vec::new()
        };

        tracing::debug!(
            handle,
            posts = posts.len(),
            flags = suspicious.flags.len(),
            score = health.score,
            "report assembled"
        );

        AnalysisReport {
            acquisition: AcquisitionSummary {
                strategy: outcome.best.strategy_label.clone(),
                success: outcome.best.success,
                error: outcome.best.error.clone(),
                stop_reason: outcome.best.stop_reason,
                attempts: outcome.attempts.clone(),
            },
            profile,
            statistics,
            behavior,
            content,
            engagement,
            suspicious_activity: suspicious,
            health_score: health,
            insights: narrative.insights,
            recommendations: narrative.recommendations,
            warnings: narrative.warnings,
            heuristics,
            diagnostics,
            generated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use handlescan_core::{AcquisitionResult, PageState, Post, StopReason};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn result(family: SourceFamily, posts: Vec<Post>) -> AcquisitionResult {
        AcquisitionResult {
            strategy_label: "mirror".to_owned(),
            family,
            success: !posts.is_empty(),
            posts,
            error: None,
            page_state: PageState::Ready,
            stop_reason: StopReason::Stalled,
            iterations: 3,
        }
    }

    fn profile(followers: u64, following: u64) -> ProfileSnapshot {
        ProfileSnapshot {
            display_name: "Someone".to_owned(),
            follower_count: followers,
            following_count: following,
            ..ProfileSnapshot::placeholder("someone")
        }
    }

    fn dated_posts(n: i64) -> Vec<Post> {
        (0..n)
            .map(|i| Post {
                id: i.to_string(),
                text: format!("note number {i}"),
                timestamp: Some(now() - chrono::Duration::hours(i * 13)),
                likes: 2,
                ..Post::default()
            })
            .collect()
    }

    #[test]
    fn missing_profile_gets_placeholder_and_diagnostic() {
        let outcome = AcquisitionOutcome {
            best: result(SourceFamily::Timeline, dated_posts(3)),
            profile: None,
            attempts: vec![],
        };
        let report = ReportAssembler::default().assemble("ghost", &outcome, now(), now());
        assert_eq!(report.profile.handle, "ghost");
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].contains("placeholder"));
        assert_eq!(report.statistics.total_posts, 3);
    }

    #[test]
    fn profile_card_without_dated_posts_uses_placeholders() {
        let outcome = AcquisitionOutcome {
            best: result(SourceFamily::ProfileCard, vec![]),
            profile: Some(profile(100, 9_000)),
            attempts: vec![],
        };
        let report = ReportAssembler::default().assemble("someone", &outcome, now(), now());
        assert_eq!(report.engagement.applicability, Applicability::NotApplicable);
        assert_eq!(report.content.applicability, Applicability::NotApplicable);
        assert_eq!(report.behavior.applicability, Applicability::ProfileOnly);
        assert_eq!(
            report.suspicious_activity.applicability,
            Applicability::ProfileOnly
        );
        assert_eq!(
            report.suspicious_activity.flags,
            vec!["Unusual following pattern"]
        );
        assert_eq!(report.behavior.activity_level, behavior::NOT_APPLICABLE);
        assert!(!report
            .health_score
            .factors
            .iter()
            .any(|f| f.label == "Low activity"));
        assert!(!report
            .warnings
            .iter()
            .any(|w| w.starts_with("No posts were collected")));
    }

    #[test]
    fn timeline_with_no_posts_stays_full() {
        let outcome = AcquisitionOutcome {
            best: result(SourceFamily::Timeline, vec![]),
            profile: Some(profile(100, 50)),
            attempts: vec![],
        };
        let report = ReportAssembler::default().assemble("someone", &outcome, now(), now());
        assert_eq!(report.engagement.applicability, Applicability::Full);
        assert_eq!(report.behavior.activity_level, "Inactive");
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn heuristics_only_run_when_enabled() {
        let scheduled: Vec<Post> = (0..8)
            .map(|i| Post {
                id: i.to_string(),
                text: format!("tick {i}"),
                timestamp: Some(now() - chrono::Duration::hours(i * 6)),
                ..Post::default()
            })
            .collect();
        let outcome = AcquisitionOutcome {
            best: result(SourceFamily::Timeline, scheduled),
            profile: Some(profile(100, 50)),
            attempts: vec![],
        };

        let off = ReportAssembler::default().assemble("someone", &outcome, now(), now());
        assert!(off.heuristics.is_empty());

        let on = ReportAssembler::new(AnalysisConfig {
            enable_heuristics: true,
            ..AnalysisConfig::default()
        })
        .assemble("someone", &outcome, now(), now());
        assert!(on.heuristics.iter().any(|f| f.name == "timing_regularity"));
        assert_eq!(on.health_score, off.health_score);
        assert_eq!(
            on.suspicious_activity.risk_level,
            off.suspicious_activity.risk_level
        );
    }

    #[test]
    fn assembly_is_idempotent() {
        let outcome = AcquisitionOutcome {
            best: result(SourceFamily::Timeline, dated_posts(12)),
            profile: Some(profile(5_000, 300)),
            attempts: vec![],
        };
        let assembler = ReportAssembler::default();
        let first = assembler.assemble("someone", &outcome, now(), now());
        let second = assembler.assemble("someone", &outcome, now(), now());
        assert_eq!(first, second);
    }
}
