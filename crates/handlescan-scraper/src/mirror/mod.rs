//! Page capabilities over public HTML mirrors, one adapter per source family.

mod client;
mod html;
mod origin;
mod pagination;
mod profile_card;
mod timeline;

use async_trait::async_trait;
use handlescan_core::{HttpConfig, PageState, SourceFamily, StrategyConfig};

use crate::error::AcquisitionError;
use crate::fallback::Strategy;
use crate::page::{NavigateOptions, PageCapability};
use crate::types::{RawPost, RawProfile};

pub use client::{FetchedPage, MirrorClient};
pub use origin::{extract_domain, extract_origin};
pub use pagination::{extract_next_cursor, next_page_url};
pub use profile_card::ProfileCardPage;
pub use timeline::TimelinePage;

/// The markup-specific adapter for a source family.
#[derive(Debug)]
pub enum SourceAdapter {
    Timeline(TimelinePage),
    ProfileCard(ProfileCardPage),
}

impl SourceAdapter {
    #[must_use]
    pub fn new(family: SourceFamily, client: MirrorClient) -> Self {
        match family {
            SourceFamily::Timeline => SourceAdapter::Timeline(TimelinePage::new(client)),
            SourceFamily::ProfileCard => SourceAdapter::ProfileCard(ProfileCardPage::new(client)),
        }
    }

    #[must_use]
    pub fn family(&self) -> SourceFamily {
        match self {
            SourceAdapter::Timeline(_) => SourceFamily::Timeline,
            SourceAdapter::ProfileCard(_) => SourceFamily::ProfileCard,
        }
    }

    fn page(&mut self) -> &mut dyn PageCapability {
        match self {
            SourceAdapter::Timeline(page) => page,
            SourceAdapter::ProfileCard(page) => page,
        }
    }
}

#[async_trait]
impl PageCapability for SourceAdapter {
    async fn navigate(
        &mut self,
        url: &str,
        options: &NavigateOptions,
    ) -> Result<PageState, AcquisitionError> {
        self.page().navigate(url, options).await
    }

    async fn extract_profile(&mut self) -> Result<Option<RawProfile>, AcquisitionError> {
        self.page().extract_profile().await
    }

    async fn extract_batch(&mut self) -> Result<Vec<RawPost>, AcquisitionError> {
        self.page().extract_batch().await
    }

    async fn scroll_stimulus(&mut self) -> Result<(), AcquisitionError> {
        self.page().scroll_stimulus().await
    }

    async fn close(&mut self) -> Result<(), AcquisitionError> {
        self.page().close().await
    }
}

/// One [`Strategy`] per configured source, in configuration order.
///
/// # Errors
///
/// Returns [`AcquisitionError::InvalidUrl`] if a strategy's target URL does
/// not parse, or [`AcquisitionError::Http`] if an HTTP client cannot be built.
pub fn build_strategies(
    handle: &str,
    configs: &[StrategyConfig],
    http: &HttpConfig,
) -> Result<Vec<Strategy>, AcquisitionError> {
    configs
        .iter()
        .map(|config| {
            let url = config.target_url(handle);
            reqwest::Url::parse(&url).map_err(|e| AcquisitionError::InvalidUrl {
                url: url.clone(),
                reason: e.to_string(),
            })?;
            let client = MirrorClient::new(http.request_timeout_secs, &http.user_agent)?;
            let page = SourceAdapter::new(config.family, client);
            let strategy = Strategy::new(config.label.clone(), config.family, url, Box::new(page));
            Ok(match &config.user_agent {
                Some(ua) => strategy.with_user_agent(ua.clone()),
                None => strategy,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http() -> HttpConfig {
        HttpConfig {
            request_timeout_secs: 5,
            user_agent: "handlescan-test/0.1".to_owned(),
        }
    }

    fn strategy_config(label: &str, family: SourceFamily, base_url: &str) -> StrategyConfig {
        StrategyConfig {
            label: label.to_owned(),
            family,
            base_url: base_url.to_owned(),
            user_agent: None,
        }
    }

    #[test]
    fn builds_strategies_in_order_with_target_urls() {
        let mut second = strategy_config("ig", SourceFamily::ProfileCard, "https://i.example");
        second.user_agent = Some("custom/1.0".to_owned());
        let configs = vec![
            strategy_config("mirror", SourceFamily::Timeline, "https://m.example/"),
            second,
        ];
        let strategies = build_strategies("jack", &configs, &http()).unwrap();
        assert_eq!(strategies.len(), 2);
        assert_eq!(strategies[0].label, "mirror");
        assert_eq!(strategies[0].url, "https://m.example/jack");
        assert!(strategies[0].user_agent.is_none());
        assert_eq!(strategies[1].family, SourceFamily::ProfileCard);
        assert_eq!(strategies[1].url, "https://i.example/jack/");
        assert_eq!(strategies[1].user_agent.as_deref(), Some("custom/1.0"));
    }

    #[test]
    fn rejects_unparsable_target_url() {
        let configs = vec![strategy_config("bad", SourceFamily::Timeline, "https://bad host.example")];
        let err = build_strategies("jack", &configs, &http()).unwrap_err();
        assert!(matches!(err, AcquisitionError::InvalidUrl { .. }));
    }

    #[test]
    fn adapter_reports_its_family() {
        let client = MirrorClient::new(5, "ua").unwrap();
        assert_eq!(
            SourceAdapter::new(SourceFamily::ProfileCard, client).family(),
            SourceFamily::ProfileCard
        );
    }
}
