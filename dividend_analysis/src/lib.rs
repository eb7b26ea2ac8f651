//! Long-running worker that evaluates dividend-capture opportunities.
//!
//! One analysis request at a time is taken from a work queue; for its
//! ticker, every historical ex-dividend event's intraday price path is
//! reconstructed, aligned on a common trading-day axis centered on the
//! ex-dividend day, and aggregated into a single quantile-based estimate of
//! the expected price drop. When the estimated drop is smaller than the
//! requested yield, a plain-text alert is published.

#![deny(missing_docs)]

pub mod config;
pub mod notify;
pub mod pipeline;
pub mod queue;
pub mod worker;
