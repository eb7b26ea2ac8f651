//! Decision rule and alert rendering.

use std::fmt::Write as _;

use crate::pipeline::stats::AggregatedStats;
use crate::pipeline::stats::round4;
use crate::queue::AnalysisRequest;

/// Terminal outcome of one analyzed request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The estimated drop is smaller than the yield: a trade is implied and
    /// an alert is published.
    Profit {
        /// Expected profit in percent, `100 × (yield − drop)`.
        expected_profit_pct: f64,
        /// Estimated drop as a fraction.
        drop: f64,
        /// Requested yield as a fraction, rounded to four decimals.
        yield_: f64,
    },

    /// The estimated drop exceeds the yield; logged, no alert.
    NegativeProfit {
        /// Estimated drop as a fraction.
        drop: f64,
        /// Requested yield as a fraction, rounded to four decimals.
        yield_: f64,
    },

    /// Exact tie between drop and yield: neither branch fires.
    NoAction {
        /// Estimated drop as a fraction.
        drop: f64,
        /// Requested yield as a fraction, rounded to four decimals.
        yield_: f64,
    },

    /// No usable events survived to aggregation. A reportable outcome, not
    /// an error; the job is still acknowledged.
    InsufficientHistory,
}

/// Applies the three-way decision rule.
///
/// Both sides compare at four-decimal precision; `drop` arrives already
/// rounded from the estimator.
pub fn decide(drop: f64, yield_: f64) -> Outcome {
    let yield_ = round4(yield_);
    if drop < yield_ {
        Outcome::Profit {
            expected_profit_pct: 100.0 * (yield_ - drop),
            drop,
            yield_,
        }
    } else if drop > yield_ {
        Outcome::NegativeProfit { drop, yield_ }
    } else {
        Outcome::NoAction { drop, yield_ }
    }
}

/// Renders the alert published when a profitable trade is implied:
/// the expected profit, the original request payload, both percentages, and
/// the full per-offset distribution table.
pub fn alert_text(
    request: &AnalysisRequest,
    drop: f64,
    yield_: f64,
    expected_profit_pct: f64,
    stats: &AggregatedStats,
) -> String {
    let payload = serde_json::to_string(request).unwrap_or_default();

    let mut text = String::new();
    let _ = writeln!(text, "Potential Trade: EXPECTED PROFIT: {expected_profit_pct:.4} %");
    let _ = writeln!(text);
    let _ = writeln!(text, "{payload}");
    let _ = writeln!(text);
    let _ = writeln!(text, "EXPECTED DROP: {:.4} %", 100.0 * drop);
    let _ = writeln!(text);
    let _ = writeln!(text, "EXPECTED YIELD: {:.4} %", 100.0 * yield_);
    let _ = writeln!(text);
    let _ = writeln!(text, "STATS");
    for (offset, dist) in stats {
        let std = dist
            .std
            .map(|s| format!("{s:.4}"))
            .unwrap_or_else(|| "n/a".to_string());
        let _ = writeln!(
            text,
            "{offset:>4}: count {:>3}  mean {:.4}  std {std}  min {:.4}  p25 {:.4}  p50 {:.4}  p75 {:.4}  max {:.4}",
            dist.count, dist.mean, dist.min, dist.p25, dist.p50, dist.p75, dist.max,
        );
    }
    text
}
