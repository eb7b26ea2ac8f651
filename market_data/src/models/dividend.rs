//! One historical dividend event for a ticker.

use chrono::NaiveDate;
use serde::Deserialize;

/// A declared dividend, as reported by the reference-data API.
///
/// Immutable once fetched; one analysis request may reference many events
/// for a ticker. The two dates drive the pipeline: the candle window is
/// bounded around `record_date`, and `ex_dividend_date` anchors offset 0.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DividendEvent {
    /// Ticker symbol the dividend was declared for.
    pub ticker: String,

    /// First trading day the stock trades without the dividend.
    pub ex_dividend_date: NaiveDate,

    /// Date the shareholder registry is checked for eligibility.
    pub record_date: NaiveDate,

    /// Declared cash amount per share.
    #[serde(default)]
    pub cash_amount: Option<f64>,

    /// Date the dividend was announced.
    #[serde(default)]
    pub declaration_date: Option<NaiveDate>,

    /// Date the dividend is paid out.
    #[serde(default)]
    pub pay_date: Option<NaiveDate>,

    /// Payments per year (4 = quarterly).
    #[serde(default)]
    pub frequency: Option<u32>,
}
