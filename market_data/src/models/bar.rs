//! Canonical in-memory representation of an intraday price bar.
//!
//! This struct is the standard output of every
//! [`BarsProvider`](crate::providers::BarsProvider) implementation,
//! regardless of vendor.

use chrono::{DateTime, Utc};

/// A single price bar for a given timestamp.
///
/// The volume-weighted price is the input the analysis pipeline consumes, so
/// it is required; the OHLCV fields ride along when the vendor supplies them.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// The timestamp for this bar (UTC).
    pub timestamp: DateTime<Utc>,

    /// Volume-weighted average trade price within the bar interval.
    pub vwap: f64,

    /// Opening price. Not all providers supply this.
    pub open: Option<f64>,

    /// Highest price during the bar interval.
    pub high: Option<f64>,

    /// Lowest price during the bar interval.
    pub low: Option<f64>,

    /// Closing price.
    pub close: Option<f64>,

    /// Volume traded during the bar interval.
    pub volume: Option<f64>,

    /// Trade count for the bar. Not all providers supply this.
    pub trade_count: Option<u64>,
}
