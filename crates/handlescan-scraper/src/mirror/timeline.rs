//! Timeline-family adapter over a public timeline mirror.
//!
//! The mirror renders the profile header and one page of the activity
//! stream as static HTML. Each `timeline-item` block is one post; the
//! `show-more` link carries the cursor for the next page, which is what
//! [`PageCapability::scroll_stimulus`] follows.

use std::sync::LazyLock;

use async_trait::async_trait;
use handlescan_core::PageState;
use regex::Regex;

use super::client::MirrorClient;
use super::html::{absolutize, clean_text, decode_entities, extract_hrefs, has_class, inner_of_class};
use super::origin::extract_origin;
use super::pagination::{extract_next_cursor, next_page_url};
use crate::error::AcquisitionError;
use crate::page::{NavigateOptions, PageCapability};
use crate::types::{RawPost, RawProfile};

/// Host used for canonical permalinks, whichever mirror served the post.
const CANONICAL_HOST: &str = "https://x.com";

static TWEET_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="tweet-link"[^>]*href="([^"]+)""#).expect("valid tweet-link regex")
});

static STATUS_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/status/(\d+)").expect("valid status id regex"));

static TWEET_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="tweet-date"[^>]*>\s*<a[^>]*title="([^"]+)""#)
        .expect("valid tweet-date regex")
});

static STAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="icon-(comment|retweet|quote|heart|views)"[^>]*>\s*</span>\s*([^<]*)<"#)
        .expect("valid tweet-stat regex")
});

static PROFILE_STAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<li class="(posts|following|followers)">.*?class="profile-stat-num">([^<]*)<"#,
    )
    .expect("valid profile-stat regex")
});

static JOIN_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="profile-joindate"[^>]*>.*?title="([^"]+)""#)
        .expect("valid joindate regex")
});

static WEBSITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="profile-website"[^>]*>.*?href="([^"]+)""#)
        .expect("valid website regex")
});

static AVATAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)class="profile-card-avatar"[^>]*>\s*<img[^>]*src="([^"]+)""#)
        .expect("valid avatar regex")
});

/// A timeline mirror page.
#[derive(Debug)]
pub struct TimelinePage {
    client: MirrorClient,
    user_agent: Option<String>,
    current_url: Option<String>,
    origin: String,
    body: Option<String>,
    next_cursor: Option<String>,
    pages_loaded: u32,
}

impl TimelinePage {
    #[must_use]
    pub fn new(client: MirrorClient) -> Self {
        Self {
            client,
            user_agent: None,
            current_url: None,
            origin: String::new(),
            body: None,
            next_cursor: None,
            pages_loaded: 0,
        }
    }

    /// Number of timeline pages fetched since the last navigation.
    #[must_use]
    pub fn pages_loaded(&self) -> u32 {
        self.pages_loaded
    }

    fn body(&self) -> Result<&str, AcquisitionError> {
        self.body.as_deref().ok_or(AcquisitionError::NotNavigated)
    }

    async fn load(&mut self, url: &str) -> Result<(), AcquisitionError> {
        let page = self.client.fetch(url, self.user_agent.as_deref()).await?;
        self.next_cursor = extract_next_cursor(&page.body);
        self.current_url = Some(url.to_owned());
        self.body = Some(page.body);
        self.pages_loaded += 1;
        Ok(())
    }
}

#[async_trait]
impl PageCapability for TimelinePage {
    async fn navigate(
        &mut self,
        url: &str,
        options: &NavigateOptions,
    ) -> Result<PageState, AcquisitionError> {
        self.user_agent.clone_from(&options.user_agent);
        self.origin = extract_origin(url);
        self.pages_loaded = 0;
        tokio::time::timeout(options.timeout, self.load(url))
            .await
            .map_err(|_| AcquisitionError::Navigation {
                url: url.to_owned(),
                reason: format!("no response within {}s", options.timeout.as_secs()),
            })??;
        Ok(detect_page_state(self.body()?))
    }

    async fn extract_profile(&mut self) -> Result<Option<RawProfile>, AcquisitionError> {
        Ok(parse_profile(self.body()?, &self.origin))
    }

    async fn extract_batch(&mut self) -> Result<Vec<RawPost>, AcquisitionError> {
        Ok(parse_timeline(self.body()?))
    }

    async fn scroll_stimulus(&mut self) -> Result<(), AcquisitionError> {
        let (Some(current), Some(cursor)) = (self.current_url.as_deref(), self.next_cursor.as_deref())
        else {
            return Ok(());
        };
        let next = next_page_url(current, cursor);
        self.load(&next).await
    }

    async fn close(&mut self) -> Result<(), AcquisitionError> {
        self.body = None;
        self.next_cursor = None;
        self.current_url = None;
        Ok(())
    }
}

/// What the mirror says about the account.
pub(crate) fn detect_page_state(html: &str) -> PageState {
    if let Some(panel) = inner_of_class(html, "div", "error-panel") {
        let panel = panel.to_lowercase();
        if panel.contains("not found")
            || panel.contains("suspended")
            || panel.contains("doesn't exist")
        {
            return PageState::NotFound;
        }
        return PageState::Blocked;
    }
    if html.to_lowercase().contains("instance has been rate limited") {
        return PageState::Blocked;
    }
    if has_class(html, "timeline-protected") {
        return PageState::Protected;
    }
    PageState::Ready
}

/// The profile card, or `None` when the page renders none.
pub(crate) fn parse_profile(html: &str, origin: &str) -> Option<RawProfile> {
    if !has_class(html, "profile-card") {
        return None;
    }

    let fullname = inner_of_class(html, "a", "profile-card-fullname");
    let verified = fullname.is_some_and(|f| f.contains("verified-icon"));
    let mut profile = RawProfile {
        display_name: fullname.map(clean_text),
        bio: inner_of_class(html, "div", "profile-bio").map(clean_text),
        location: inner_of_class(html, "div", "profile-location").map(clean_text),
        website: WEBSITE_RE
            .captures(html)
            .map(|cap| decode_entities(&cap[1])),
        join_date: JOIN_TITLE_RE
            .captures(html)
            .map(|cap| decode_entities(&cap[1])),
        verified,
        avatar_url: AVATAR_RE
            .captures(html)
            .map(|cap| absolutize(&decode_entities(&cap[1]), origin)),
        protected: has_class(html, "timeline-protected"),
        ..RawProfile::default()
    };

    for cap in PROFILE_STAT_RE.captures_iter(html) {
        let value = Some(cap[2].trim().to_owned());
        match &cap[1] {
            "posts" => profile.posts = value,
            "following" => profile.following = value,
            "followers" => profile.followers = value,
            _ => {}
        }
    }

    Some(profile)
}

/// Every timeline item on the page, in page order.
pub(crate) fn parse_timeline(html: &str) -> Vec<RawPost> {
    html.split(r#"<div class="timeline-item"#)
        .skip(1)
        .filter_map(parse_item)
        .collect()
}

fn parse_item(chunk: &str) -> Option<RawPost> {
    // A bare show-more block shares the timeline-item class.
    if !chunk.contains("tweet-body") {
        return None;
    }

    let link = TWEET_LINK_RE
        .captures(chunk)
        .map(|cap| decode_entities(&cap[1]));
    let id = link
        .as_deref()
        .and_then(|l| STATUS_ID_RE.captures(l))
        .map(|cap| cap[1].to_owned());
    let permalink = link.map(|l| {
        let path = l.split('#').next().unwrap_or(&l).to_owned();
        absolutize(&path, CANONICAL_HOST)
    });

    let content = inner_of_class(chunk, "div", "tweet-content").unwrap_or_default();
    let mut urls = Vec::new();
    let mut location_link = None;
    for href in extract_hrefs(content) {
        if href.starts_with('/') || href.starts_with('#') {
            continue;
        }
        if is_map_link(&href) {
            location_link.get_or_insert(href);
        } else {
            urls.push(href);
        }
    }

    let mut post = RawPost {
        id,
        text: clean_text(content),
        date: TWEET_DATE_RE
            .captures(chunk)
            .map(|cap| decode_entities(&cap[1])),
        has_image: has_class(chunk, "still-image") || has_class(chunk, "image"),
        has_video: has_class(chunk, "gallery-video") || has_class(chunk, "gallery-gif"),
        location_link,
        permalink,
        urls,
        is_reply: has_class(chunk, "replying-to"),
        is_retweet: has_class(chunk, "retweet-header"),
        is_pinned: has_class(chunk, "pinned"),
        ..RawPost::default()
    };

    if let Some(stats_at) = chunk.find(r#"class="tweet-stats""#) {
        for cap in STAT_RE.captures_iter(&chunk[stats_at..]) {
            let value = Some(cap[2].trim().to_owned()).filter(|v| !v.is_empty());
            match &cap[1] {
                "comment" => post.replies = value,
                "retweet" => post.retweets = value,
                "heart" => post.likes = value,
                "views" => post.views = value,
                _ => {}
            }
        }
    }

    Some(post)
}

fn is_map_link(href: &str) -> bool {
    let lower = href.to_lowercase();
    lower.contains("maps.google.")
        || lower.contains("google.com/maps")
        || lower.contains("openstreetmap.org")
}

#[cfg(test)]
#[path = "timeline_test.rs"]
mod tests;
