//! HTTP fetcher shared by the mirror adapters.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::origin::{extract_domain, extract_origin};
use crate::error::AcquisitionError;

pub(crate) const BROWSER_FALLBACK_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// A fetched HTML page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    /// URL after redirects.
    pub final_url: String,
    pub body: String,
}

/// HTTP client for public HTML mirrors.
///
/// Maps 404/410 to [`AcquisitionError::NotFound`], 403/429 to
/// [`AcquisitionError::Blocked`] and other non-2xx responses to
/// [`AcquisitionError::UnexpectedStatus`]. Failed requests are not retried;
/// the fallback controller moves on to the next strategy instead.
#[derive(Debug, Clone)]
pub struct MirrorClient {
    client: Client,
}

impl MirrorClient {
    /// Creates a `MirrorClient` with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, AcquisitionError> {
        let user_agent = if user_agent.trim().is_empty() {
            BROWSER_FALLBACK_UA
        } else {
            user_agent
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` as HTML, optionally overriding the `User-Agent`.
    ///
    /// # Errors
    ///
    /// - [`AcquisitionError::NotFound`] on HTTP 404 or 410.
    /// - [`AcquisitionError::Blocked`] on HTTP 403 or 429.
    /// - [`AcquisitionError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`AcquisitionError::Http`] on network or TLS failure.
    pub async fn fetch(
        &self,
        url: &str,
        user_agent: Option<&str>,
    ) -> Result<FetchedPage, AcquisitionError> {
        let mut request = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::REFERER, extract_origin(url))
            .header(reqwest::header::CACHE_CONTROL, "no-cache");

        if let Some(ua) = user_agent {
            request = request.header(reqwest::header::USER_AGENT, ua);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let reason = match retry_after {
                Some(secs) => format!("rate limited (HTTP 429, retry after {secs}s)"),
                None => "rate limited (HTTP 429)".to_owned(),
            };
            return Err(AcquisitionError::Blocked {
                domain: extract_domain(url),
                reason,
            });
        }

        if status == StatusCode::FORBIDDEN {
            return Err(AcquisitionError::Blocked {
                domain: extract_domain(url),
                reason: "forbidden (HTTP 403)".to_owned(),
            });
        }

        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(AcquisitionError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(AcquisitionError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;
        tracing::debug!(url, final_url = %final_url, bytes = body.len(), "fetched mirror page");

        Ok(FetchedPage {
            status: status.as_u16(),
            final_url,
            body,
        })
    }
}
