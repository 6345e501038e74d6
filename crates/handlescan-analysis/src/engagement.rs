//! Interaction averages, engagement rate and top posts.

use handlescan_core::{Post, ProfileSnapshot};

use crate::statistics::mean;
use crate::types::{Applicability, EngagementAnalysis, TopPost};

const TOP_POSTS: usize = 5;

/// Engagement view over `profile` and `posts`.
///
/// Averages are unweighted. The weighted score only ranks top posts; ties
/// keep list order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn analyze_engagement(profile: &ProfileSnapshot, posts: &[Post]) -> EngagementAnalysis {
    let avg = |f: fn(&Post) -> u64| -> f64 {
        let values: Vec<f64> = posts.iter().map(|p| f(p) as f64).collect();
        mean(&values)
    };
    let avg_likes = avg(|p| p.likes);
    let avg_retweets = avg(|p| p.retweets);
    let avg_replies = avg(|p| p.replies);
    let avg_total = avg(Post::total_engagement);

    let mut ranked: Vec<&Post> = posts.iter().collect();
    ranked.sort_by_key(|p| std::cmp::Reverse(p.weighted_engagement()));
    let top_posts = ranked
        .into_iter()
        .take(TOP_POSTS)
        .map(|p| TopPost {
            id: p.id.clone(),
            text: p.text.clone(),
            permalink: p.permalink.clone(),
            timestamp: p.timestamp,
            likes: p.likes,
            retweets: p.retweets,
            replies: p.replies,
            score: p.weighted_engagement(),
        })
        .collect();

    EngagementAnalysis {
        applicability: Applicability::Full,
        avg_likes,
        avg_retweets,
        avg_replies,
        avg_views: avg(|p| p.views),
        engagement_rate: avg_total / profile.follower_count.max(1) as f64 * 100.0,
        virality: virality(avg_retweets).to_owned(),
        top_posts,
    }
}

/// The zero-valued view for sources without an activity stream.
#[must_use]
pub fn not_applicable(profile: &ProfileSnapshot) -> EngagementAnalysis {
    EngagementAnalysis {
        applicability: Applicability::NotApplicable,
        ..analyze_engagement(profile, &[])
    }
}

#[must_use]
pub fn virality(avg_retweets: f64) -> &'static str {
    if avg_retweets > 100.0 {
        "High"
    } else if avg_retweets > 10.0 {
        "Medium"
    } else {
        "Low"
    }
}
