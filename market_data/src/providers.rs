//! Provider abstraction for market data sources.
//!
//! Two narrow traits cover the upstream APIs the worker consumes:
//! [`BarsProvider`] for intraday price bars and [`DividendsProvider`] for
//! historical dividend events. Each concrete implementation (Alpaca for
//! bars, Polygon for dividends) handles its own vendor-specific request
//! shape, pagination, and validation.
//!
//! Both traits are designed for async usage and support dynamic dispatch
//! (`dyn BarsProvider + Send + Sync`) so the worker can be wired against
//! fakes in tests.

pub mod alpaca_rest;
pub mod polygon_rest;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{bar::Bar, dividend::DividendEvent, request_params::BarsRequestParams};

/// Trait for fetching intraday bar data from a market data provider.
#[async_trait]
pub trait BarsProvider {
    /// Fetches all bars for the given request parameters, following the
    /// provider's pagination until exhausted.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Bar>)` - Bars in the provider's delivery order.
    /// * `Err(ProviderError)` - If validation or the request fails.
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<Bar>, ProviderError>;
}

/// Trait for fetching the full historical dividend list for one ticker.
#[async_trait]
pub trait DividendsProvider {
    /// Fetches every declared dividend event for `ticker`, following
    /// pagination cursors until exhausted.
    async fn fetch_dividends(&self, ticker: &str) -> Result<Vec<DividendEvent>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains invalid characters.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// The pagination rate limit could not be constructed.
    #[snafu(display("Invalid rate limit: {message}"))]
    RateLimit {
        message: String,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a provider implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned a non-success status.
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },
}
