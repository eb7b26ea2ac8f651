//! Regular-session filtering and business-day math for US equities.
//!
//! What this module provides:
//! - [`regular_session_bars`]: Keep only bars whose timestamps fall inside
//!   the regular NYSE session, `[09:30, 16:00]` exchange-local, inclusive on
//!   both ends.
//! - [`exchange_date`]: The exchange-local calendar date of an instant, used
//!   to group intraday bars into trading days.
//! - [`add_business_days`]: Walk Mon-Fri days from a date (no holiday
//!   calendar), used to bound candle windows around a record date.
//!
//! All conversions go through [`chrono_tz`]; DST transitions are handled by
//! the zone data, never by fixed offsets.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::America::New_York;
use chrono_tz::Tz;

use crate::models::bar::Bar;

/// Exchange timezone for the regular session.
pub const EXCHANGE_TZ: Tz = New_York;

fn session_open() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 30, 0).unwrap()
}

fn session_close() -> NaiveTime {
    NaiveTime::from_hms_opt(16, 0, 0).unwrap()
}

/// Keeps the subsequence of bars inside the regular session.
///
/// Boundary bars at exactly 09:30:00 and 16:00:00 local are included.
/// Pure filter; input order is preserved.
pub fn regular_session_bars(bars: &[Bar]) -> Vec<Bar> {
    let open = session_open();
    let close = session_close();
    bars.iter()
        .filter(|bar| {
            let local = bar.timestamp.with_timezone(&EXCHANGE_TZ).time();
            local >= open && local <= close
        })
        .cloned()
        .collect()
}

/// Exchange-local calendar date of `timestamp`.
pub fn exchange_date(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&EXCHANGE_TZ).date_naive()
}

/// Walks `n` business days (Mon-Fri) from `date`; negative `n` walks
/// backwards. Saturdays and Sundays are skipped, holidays are not.
pub fn add_business_days(date: NaiveDate, n: i64) -> NaiveDate {
    let step = if n >= 0 {
        Duration::days(1)
    } else {
        Duration::days(-1)
    };
    let mut remaining = n.abs();
    let mut current = date;
    while remaining > 0 {
        current = current + step;
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            remaining -= 1;
        }
    }
    current
}
