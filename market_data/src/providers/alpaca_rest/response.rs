use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::bar::Bar;

/// One bar as returned by the Alpaca per-symbol bars endpoint.
#[derive(Deserialize, Debug)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "vw")]
    pub vwap: f64,
    #[serde(rename = "o")]
    pub open: Option<f64>,
    #[serde(rename = "h")]
    pub high: Option<f64>,
    #[serde(rename = "l")]
    pub low: Option<f64>,
    #[serde(rename = "c")]
    pub close: Option<f64>,
    #[serde(rename = "v")]
    pub volume: Option<f64>,
    #[serde(rename = "n")]
    pub trade_count: Option<u64>,
}

/// One page of the bars endpoint. `bars` is null (not `[]`) when the window
/// contains no data.
#[derive(Deserialize, Debug)]
pub struct AlpacaBarsResponse {
    #[serde(default)]
    pub bars: Option<Vec<AlpacaBar>>,
    pub next_page_token: Option<String>,
}

impl From<AlpacaBar> for Bar {
    fn from(raw: AlpacaBar) -> Self {
        Bar {
            timestamp: raw.timestamp,
            vwap: raw.vwap,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            volume: raw.volume,
            trade_count: raw.trade_count,
        }
    }
}
