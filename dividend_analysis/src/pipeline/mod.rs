//! The event-alignment and drop-estimation pipeline.
//!
//! One event at a time, [`normalize`] collapses a candle window to a daily
//! series indexed by trading-day offset from the ex-dividend date. Across
//! events, [`stats`] rescales each series to its pre-event price, pools the
//! values per offset, and derives the quantile-based drop estimate.
//! [`decide`] turns the estimate and the requested yield into a terminal
//! outcome and the alert text.

pub mod decide;
pub mod normalize;
pub mod stats;
