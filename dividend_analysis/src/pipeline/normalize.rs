//! Per-event normalization: raw intraday bars to a daily-resolution series
//! indexed by signed trading-day offset, with offset 0 on the ex-dividend
//! day.
//!
//! Offsets are ordinal positions of the trading days actually present in
//! the window, not calendar distances: the row whose exchange-local date
//! equals the ex-dividend date becomes offset 0, the trading day before it
//! −1, and so on. A window that does not contain the ex-dividend date has
//! no anchor and the event is dropped with an explicit error.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use market_data::models::{bar::Bar, dividend::DividendEvent};
use market_data::session;
use thiserror::Error;

/// Reasons a single event cannot be normalized. The event is dropped and
/// the batch continues.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// The candle window contained no bars at all.
    #[error("no bars in candle window")]
    EmptyWindow,

    /// No trading day in the window matches the ex-dividend date, so
    /// offset 0 cannot be anchored.
    #[error("ex-dividend date {0} not present in candle window")]
    ExDateNotInWindow(NaiveDate),
}

/// One event's daily price path keyed by trading-day offset
/// (0 = ex-dividend day).
pub type NormalizedSeries = BTreeMap<i64, f64>;

/// Collapses a candle window into daily mean-vwap rows and re-indexes them
/// by offset from the ex-dividend date.
///
/// Pure and idempotent: the same event and window always produce the same
/// series.
pub fn normalize_event(
    event: &DividendEvent,
    window: &[Bar],
) -> Result<NormalizedSeries, NormalizeError> {
    // One row per trading day present: mean vwap over that day's bars,
    // keyed (and therefore ordered) by exchange-local date.
    let mut daily: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for bar in window {
        let date = session::exchange_date(bar.timestamp);
        let entry = daily.entry(date).or_insert((0.0, 0));
        entry.0 += bar.vwap;
        entry.1 += 1;
    }

    if daily.is_empty() {
        return Err(NormalizeError::EmptyWindow);
    }

    let reference = daily
        .keys()
        .position(|date| *date == event.ex_dividend_date)
        .ok_or(NormalizeError::ExDateNotInWindow(event.ex_dividend_date))?
        as i64;

    Ok(daily
        .values()
        .enumerate()
        .map(|(index, (sum, count))| (index as i64 - reference, sum / f64::from(*count)))
        .collect())
}
