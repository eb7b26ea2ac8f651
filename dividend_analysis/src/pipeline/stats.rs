//! Cross-event aggregation and the quantile-based drop estimate.
//!
//! Each surviving series is rescaled so its offset −1 value (the last
//! trading day before the ex-dividend day) is 1.0, making events of any
//! price level comparable. Values are then pooled per offset across events
//! and described with a five-number-plus-mean distribution. The drop
//! estimate reads the offset 0 distribution: `1 − min(p25, p75)`, the
//! conservative end of the interquartile range, rounded to four decimals.
//!
//! Quantiles use linear interpolation between closest ranks; that choice is
//! load-bearing for reproducibility and pinned by tests.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::pipeline::normalize::NormalizedSeries;

/// One event's series rescaled to its pre-event price, tagged with the
/// event's record date.
#[derive(Debug, Clone, PartialEq)]
pub struct RescaledSeries {
    /// Record date of the source event.
    pub record_date: NaiveDate,
    /// Offset-indexed values, each divided by the offset −1 value.
    pub values: NormalizedSeries,
}

/// Anchors a series to its pre-event price.
///
/// Returns `None` when offset −1 is missing; such a series has no base to
/// rescale against and must be dropped.
pub fn rescale(record_date: NaiveDate, series: &NormalizedSeries) -> Option<RescaledSeries> {
    let base = *series.get(&-1)?;
    Some(RescaledSeries {
        record_date,
        values: series
            .iter()
            .map(|(offset, value)| (*offset, value / base))
            .collect(),
    })
}

/// Cross-event distribution of rescaled values at one offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    /// Number of events contributing at this offset.
    pub count: usize,
    /// Mean of the rescaled values.
    pub mean: f64,
    /// Sample standard deviation (n − 1); `None` with fewer than two
    /// contributing events.
    pub std: Option<f64>,
    /// Smallest value.
    pub min: f64,
    /// 25th percentile.
    pub p25: f64,
    /// Median.
    pub p50: f64,
    /// 75th percentile.
    pub p75: f64,
    /// Largest value.
    pub max: f64,
}

/// Per-offset distributions across all rescaled series. Ephemeral; computed
/// once per request.
pub type AggregatedStats = BTreeMap<i64, Distribution>;

/// Pools every series' value at each offset and describes each pool.
///
/// Grouping is keyed by offset, so the result is independent of the order
/// the series arrive in.
pub fn aggregate(series: &[RescaledSeries]) -> AggregatedStats {
    let mut pooled: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for rescaled in series {
        for (offset, value) in &rescaled.values {
            pooled.entry(*offset).or_default().push(*value);
        }
    }
    pooled
        .into_iter()
        .map(|(offset, values)| (offset, describe(values)))
        .collect()
}

fn describe(mut values: Vec<f64>) -> Distribution {
    values.sort_by(f64::total_cmp);
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        Some(variance.sqrt())
    } else {
        None
    };

    Distribution {
        count,
        mean,
        std,
        min: values[0],
        p25: quantile(&values, 0.25),
        p50: quantile(&values, 0.50),
        p75: quantile(&values, 0.75),
        max: values[count - 1],
    }
}

/// Quantile by linear interpolation between closest ranks.
///
/// `values` must be sorted and non-empty.
fn quantile(values: &[f64], q: f64) -> f64 {
    let rank = q * (values.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        values[lo]
    } else {
        values[lo] + (rank - lo as f64) * (values[hi] - values[lo])
    }
}

/// Rounds to four decimal digits, the precision both sides of the
/// drop-vs-yield comparison use.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Expected fraction of value lost on the ex-dividend day:
/// `1 − min(p25, p75)` at offset 0, rounded to four decimals.
///
/// `None` when no event contributed an offset 0 value — the
/// insufficient-history outcome.
pub fn drop_estimate(stats: &AggregatedStats) -> Option<f64> {
    let day0 = stats.get(&0)?;
    Some(round4(1.0 - day0.p25.min(day0.p75)))
}
