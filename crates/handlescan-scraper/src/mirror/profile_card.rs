//! Profile-card-family adapter: profile metadata from a public profile
//! page's Open Graph tags. There is no timestamped activity stream.

use std::sync::LazyLock;

use async_trait::async_trait;
use handlescan_core::PageState;
use regex::Regex;

use super::client::MirrorClient;
use super::html::decode_entities;
use crate::error::AcquisitionError;
use crate::page::{NavigateOptions, PageCapability};
use crate::types::{RawPost, RawProfile};

static META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\s+[^>]*>"#).expect("valid meta regex")
});

static META_PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)property\s*=\s*"([^"]+)""#).expect("valid meta property regex")
});

static META_CONTENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)content\s*=\s*"([^"]*)""#).expect("valid meta content regex")
});

static COUNTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([\d.,]+\s*[kmb]?)\s+followers?\s*,\s*([\d.,]+\s*[kmb]?)\s+following\s*,\s*([\d.,]+\s*[kmb]?)\s+posts?",
    )
    .expect("valid profile counts regex")
});

/// A public profile page.
#[derive(Debug)]
pub struct ProfileCardPage {
    client: MirrorClient,
    body: Option<String>,
    final_url: Option<String>,
}

impl ProfileCardPage {
    #[must_use]
    pub fn new(client: MirrorClient) -> Self {
        Self {
            client,
            body: None,
            final_url: None,
        }
    }

    fn body(&self) -> Result<&str, AcquisitionError> {
        self.body.as_deref().ok_or(AcquisitionError::NotNavigated)
    }
}

#[async_trait]
impl PageCapability for ProfileCardPage {
    async fn navigate(
        &mut self,
        url: &str,
        options: &NavigateOptions,
    ) -> Result<PageState, AcquisitionError> {
        let page = tokio::time::timeout(
            options.timeout,
            self.client.fetch(url, options.user_agent.as_deref()),
        )
        .await
        .map_err(|_| AcquisitionError::Navigation {
            url: url.to_owned(),
            reason: format!("no response within {}s", options.timeout.as_secs()),
        })??;

        let state = detect_page_state(&page.body, &page.final_url);
        self.final_url = Some(page.final_url);
        self.body = Some(page.body);
        Ok(state)
    }

    async fn extract_profile(&mut self) -> Result<Option<RawProfile>, AcquisitionError> {
        Ok(parse_profile_card(self.body()?))
    }

    async fn extract_batch(&mut self) -> Result<Vec<RawPost>, AcquisitionError> {
        self.body()?;
        Ok(Vec::new())
    }

    async fn scroll_stimulus(&mut self) -> Result<(), AcquisitionError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), AcquisitionError> {
        self.body = None;
        self.final_url = None;
        Ok(())
    }
}

/// Open Graph `content` for `property`, entity-decoded.
fn meta_property(html: &str, property: &str) -> Option<String> {
    META_RE.find_iter(html).find_map(|tag| {
        let tag = tag.as_str();
        let name = META_PROPERTY_RE.captures(tag)?;
        if !name[1].eq_ignore_ascii_case(property) {
            return None;
        }
        META_CONTENT_RE
            .captures(tag)
            .map(|cap| decode_entities(&cap[1]))
    })
}

pub(crate) fn detect_page_state(html: &str, final_url: &str) -> PageState {
    let lower = html.to_lowercase();
    if lower.contains("this account is private") || lower.contains(r#""is_private":true"#) {
        return PageState::Protected;
    }
    if lower.contains("sorry, this page isn't available")
        || lower.contains("sorry, this page isn&#39;t available")
    {
        return PageState::NotFound;
    }
    if meta_property(html, "og:description").is_none()
        && (final_url.contains("/accounts/login") || lower.contains("login • instagram"))
    {
        return PageState::Blocked;
    }
    PageState::Ready
}

/// Profile metadata from the Open Graph tags, or `None` without them.
pub(crate) fn parse_profile_card(html: &str) -> Option<RawProfile> {
    let title = meta_property(html, "og:title");
    let description = meta_property(html, "og:description");
    if title.is_none() && description.is_none() {
        return None;
    }

    let display_name = title.as_deref().map(|t| {
        t.split(" (@")
            .next()
            .unwrap_or(t)
            .trim()
            .to_owned()
    });

    let counts = description.as_deref().and_then(|d| COUNTS_RE.captures(d));
    let count = |i: usize| counts.as_ref().map(|cap| cap[i].trim().to_owned());

    let lower = html.to_lowercase();
    Some(RawProfile {
        display_name,
        followers: count(1),
        following: count(2),
        posts: count(3),
        verified: lower.contains(r#""is_verified":true"#),
        avatar_url: meta_property(html, "og:image"),
        protected: lower.contains("this account is private"),
        ..RawProfile::default()
    })
}
