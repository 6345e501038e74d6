//! Raw, page-shaped records returned by a [`crate::PageCapability`].
//!
//! Fields hold text exactly as the page rendered it (`"1.2K"`,
//! `"Oct 5, 2024 · 3:04 PM UTC"`). Conversion to typed values happens in
//! [`crate::normalize`], which never fails: anything unparsable becomes a
//! documented soft default.

use serde::{Deserialize, Serialize};

/// One post-like record as scraped from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPost {
    pub id: Option<String>,
    pub text: String,
    /// Rendered date text or ISO timestamp.
    pub date: Option<String>,
    pub likes: Option<String>,
    pub retweets: Option<String>,
    pub replies: Option<String>,
    pub views: Option<String>,
    pub has_image: bool,
    pub has_video: bool,
    /// Map link attached to the post, if any.
    pub location_link: Option<String>,
    pub place_name: Option<String>,
    pub permalink: Option<String>,
    pub urls: Vec<String>,
    pub is_reply: bool,
    pub is_retweet: bool,
    pub is_pinned: bool,
}

/// Profile header as scraped from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProfile {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub join_date: Option<String>,
    pub followers: Option<String>,
    pub following: Option<String>,
    pub posts: Option<String>,
    pub verified: bool,
    pub avatar_url: Option<String>,
    pub protected: bool,
}
