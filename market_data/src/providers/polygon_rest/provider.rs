use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;

use crate::{
    models::dividend::DividendEvent,
    providers::{
        ApiSnafu, DividendsProvider, ProviderError, ProviderInitError, RateLimitSnafu,
        ReqwestSnafu, polygon_rest::response::PolygonDividendsResponse,
    },
};

const BASE_URL: &str = "https://api.polygon.io/v3/reference/dividends";

/// Polygon.io reference-data provider for historical dividend events.
///
/// The dividends endpoint allows a handful of calls per minute, so page
/// requests run through a direct rate limiter with a burst of one: the
/// first page goes out immediately, every later page waits out the
/// configured period.
pub struct PolygonProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
    page_limiter: DefaultDirectRateLimiter,
}

impl PolygonProvider {
    /// Creates a new Polygon provider.
    ///
    /// `page_period` is the minimum spacing between successive page
    /// requests and must be non-zero.
    pub fn new(api_key: SecretString, page_period: Duration) -> Result<Self, ProviderInitError> {
        let quota = Quota::with_period(page_period).ok_or_else(|| {
            RateLimitSnafu {
                message: "page period must be non-zero".to_string(),
            }
            .build()
        })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
            page_limiter: RateLimiter::direct(quota),
        })
    }

    /// Overrides the API root, for tests or a local proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl DividendsProvider for PolygonProvider {
    async fn fetch_dividends(&self, ticker: &str) -> Result<Vec<DividendEvent>, ProviderError> {
        let mut events: Vec<DividendEvent> = Vec::new();
        let mut url = format!(
            "{}?ticker={}&apiKey={}",
            self.base_url,
            ticker,
            self.api_key.expose_secret()
        );

        loop {
            self.page_limiter.until_ready().await;

            let response = self.client.get(&url).send().await.context(ReqwestSnafu)?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown API error".to_string());
                return ApiSnafu {
                    message: format!("Failed to fetch dividends: {status} - {body}"),
                }
                .fail();
            }

            let page: PolygonDividendsResponse = response.json().await.context(ReqwestSnafu)?;
            events.extend(page.results);

            match page.next_url {
                Some(next) => url = with_api_key(next, self.api_key.expose_secret()),
                None => break,
            }
        }

        Ok(events)
    }
}

/// Cursor URLs sometimes already carry the key; never append it twice.
fn with_api_key(url: String, key: &str) -> String {
    if url.contains("apiKey") {
        url
    } else {
        format!("{url}&apiKey={key}")
    }
}
