use chrono::{DateTime, Utc};

use crate::models::timeframe::TimeFrame;

/// Parameters for one bars request.
///
/// Vendor-agnostic; the standard input for all
/// [`BarsProvider`](crate::providers::BarsProvider) implementations. The
/// analysis pipeline requests one symbol per event window, so a request
/// carries a single symbol.
#[derive(Clone, Debug)]
pub struct BarsRequestParams {
    /// Symbol to request (e.g. `"AAPL"`).
    pub symbol: String,

    /// The time interval for each bar.
    pub timeframe: TimeFrame,

    /// Start of the requested time range (inclusive, UTC).
    pub start: DateTime<Utc>,

    /// End of the requested time range (UTC). Providers reject an end in
    /// the future before any call is made.
    pub end: DateTime<Utc>,
}
