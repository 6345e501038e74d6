use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair recovered from a post's location link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One item of a handle's activity stream, normalized from a raw page record.
///
/// Counts are always non-negative; a counter the page did not render is `0`.
/// Posts are frozen once they leave the deduplicator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Post {
    /// Site identifier, e.g. the numeric status id. Empty when the page did
    /// not expose one.
    pub id: String,
    pub text: String,
    /// `None` when the page rendered no parseable date.
    pub timestamp: Option<DateTime<Utc>>,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub views: u64,
    pub has_image: bool,
    pub has_video: bool,
    pub coordinates: Option<Coordinates>,
    /// Display name of the tagged place; empty when absent.
    pub place_name: String,
    pub permalink: Option<String>,
    /// Outbound links found in the post body.
    pub urls: Vec<String>,
    pub is_reply: bool,
    pub is_retweet: bool,
    pub is_pinned: bool,
}

impl Post {
    /// Unweighted interaction total used for averages.
    #[must_use]
    pub fn total_engagement(&self) -> u64 {
        self.likes
            .saturating_add(self.retweets)
            .saturating_add(self.replies)
    }

    /// Weighted interaction score used only to rank top posts:
    /// `likes + 2 × retweets + 3 × replies`.
    #[must_use]
    pub fn weighted_engagement(&self) -> u64 {
        self.likes
            .saturating_add(self.retweets.saturating_mul(2))
            .saturating_add(self.replies.saturating_mul(3))
    }

    #[must_use]
    pub fn has_media(&self) -> bool {
        self.has_image || self.has_video
    }

    /// `true` when the post carries at least one outbound link.
    #[must_use]
    pub fn has_link(&self) -> bool {
        !self.urls.is_empty() || self.text.contains("http://") || self.text.contains("https://")
    }

    #[must_use]
    pub fn is_original(&self) -> bool {
        !self.is_reply && !self.is_retweet
    }
}

/// Profile metadata captured once per run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub handle: String,
    pub display_name: String,
    pub bio: String,
    pub location: String,
    pub website: String,
    pub join_date: Option<DateTime<Utc>>,
    pub follower_count: u64,
    pub following_count: u64,
    pub verified: bool,
    pub avatar_url: Option<String>,
    /// Site-reported total number of posts; `0` when the page does not show it.
    pub post_count: u64,
    /// The site reports the activity stream as private.
    pub protected: bool,
}

impl ProfileSnapshot {
    /// A profile carrying only the handle, used when no snapshot could be
    /// captured but some activity was.
    #[must_use]
    pub fn placeholder(handle: &str) -> Self {
        Self {
            handle: handle.to_owned(),
            ..Self::default()
        }
    }

    /// Followers per followed account. The following count is floored at 1.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn follower_ratio(&self) -> f64 {
        self.follower_count as f64 / self.following_count.max(1) as f64
    }
}
