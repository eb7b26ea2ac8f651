use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use snafu::{ResultExt, ensure};

use crate::{
    models::{bar::Bar, request_params::BarsRequestParams},
    providers::{
        ApiSnafu, BarsProvider, ClientBuildSnafu, InvalidApiKeySnafu, ProviderError,
        ProviderInitError, ReqwestSnafu, ValidationSnafu,
        alpaca_rest::response::AlpacaBarsResponse,
    },
};

const BASE_URL: &str = "https://data.alpaca.markets/v2/stocks";

/// Alpaca market-data provider for intraday bars.
pub struct AlpacaProvider {
    client: Client,
    base_url: String,
}

impl AlpacaProvider {
    /// Creates a new Alpaca provider from injected credentials.
    ///
    /// The key pair is installed once as default headers so every request
    /// reuses one authenticated connection pool.
    pub fn new(
        api_key: &SecretString,
        secret_key: &SecretString,
    ) -> Result<Self, ProviderInitError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(api_key.expose_secret()).context(InvalidApiKeySnafu)?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(secret_key.expose_secret())
                .context(InvalidApiKeySnafu)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Overrides the API root, for tests or a local proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl BarsProvider for AlpacaProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<Bar>, ProviderError> {
        // Rejected locally: the bars API refuses future end dates anyway,
        // and the caller treats this the same as any per-event failure.
        ensure!(
            params.end <= Utc::now(),
            ValidationSnafu {
                message: format!("end {} cannot be in the future", params.end),
            }
        );

        let url = format!("{}/{}/bars", self.base_url, params.symbol);
        let mut bars: Vec<Bar> = Vec::new();
        let mut next_page_token: Option<String> = None;

        loop {
            let mut query = vec![
                (
                    "start".to_string(),
                    params.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                (
                    "end".to_string(),
                    params.end.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                ("timeframe".to_string(), params.timeframe.to_string()),
            ];
            if let Some(token) = &next_page_token {
                query.push(("page_token".to_string(), token.clone()));
            }

            let response = self
                .client
                .get(&url)
                .query(&query)
                .send()
                .await
                .context(ReqwestSnafu)?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown API error".to_string());
                return ApiSnafu {
                    message: format!("{status}: {body}"),
                }
                .fail();
            }

            let page: AlpacaBarsResponse = response.json().await.context(ReqwestSnafu)?;
            bars.extend(page.bars.unwrap_or_default().into_iter().map(Bar::from));

            match page.next_page_token {
                Some(token) => next_page_token = Some(token),
                None => break,
            }
        }

        Ok(bars)
    }
}
