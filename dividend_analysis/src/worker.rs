//! Per-request driver: fetch the event list, load each event's candle
//! window with isolated failures, normalize, aggregate, decide, notify,
//! acknowledge. Plus the outer drain loop.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use market_data::{
    models::{
        bar::Bar, dividend::DividendEvent, request_params::BarsRequestParams,
        timeframe::TimeFrame,
    },
    providers::{BarsProvider, DividendsProvider, ProviderError},
    session,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    config::Config,
    notify::Notifier,
    pipeline::{
        decide::{Outcome, alert_text, decide},
        normalize,
        stats,
    },
    queue::{AnalysisRequest, QueueError, WorkQueue},
};

/// Errors that abort a whole request. The job is not acknowledged and is
/// left for the queue's own redelivery.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The dividend-event list could not be fetched at all.
    #[error("dividend event fetch failed: {0}")]
    FatalFetch(#[source] ProviderError),

    /// The queue itself failed (receive or acknowledge).
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// What one call to [`Worker::process_one`] observed.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// The queue had no job.
    QueueEmpty,
    /// A job was fully processed and acknowledged.
    Analyzed(Outcome),
}

/// All collaborators for one worker, constructed once at startup and reused
/// for every request. No state survives a request beyond these handles.
pub struct Worker {
    queue: Box<dyn WorkQueue + Send + Sync>,
    dividends: Box<dyn DividendsProvider + Send + Sync>,
    bars: Box<dyn BarsProvider + Send + Sync>,
    notifier: Box<dyn Notifier + Send + Sync>,
    window_days: i64,
    cooldown: Duration,
}

impl Worker {
    /// Wires a worker from its collaborators and the loaded config.
    pub fn new(
        queue: Box<dyn WorkQueue + Send + Sync>,
        dividends: Box<dyn DividendsProvider + Send + Sync>,
        bars: Box<dyn BarsProvider + Send + Sync>,
        notifier: Box<dyn Notifier + Send + Sync>,
        config: &Config,
    ) -> Self {
        Self {
            queue,
            dividends,
            bars,
            notifier,
            window_days: config.window_days,
            cooldown: config.cooldown(),
        }
    }

    /// Processes at most one job end-to-end.
    ///
    /// The job is acknowledged after the pipeline completes — including the
    /// insufficient-history outcome — and not acknowledged when the event
    /// list itself cannot be fetched.
    pub async fn process_one(&self) -> Result<ProcessOutcome, WorkerError> {
        let Some(job) = self.queue.receive_one().await? else {
            return Ok(ProcessOutcome::QueueEmpty);
        };
        info!(ticker = %job.request.ticker, "processing job");

        let events = self
            .dividends
            .fetch_dividends(&job.request.ticker)
            .await
            .map_err(WorkerError::FatalFetch)?;
        info!(events = events.len(), "fetched dividend history");

        let windows = self.load_candle_windows(&events).await;
        let outcome = self.analyze(&job.request, &windows).await;

        self.queue.acknowledge(&job).await?;
        Ok(ProcessOutcome::Analyzed(outcome))
    }

    /// Drains the queue: one job at a time with a fixed cooldown between
    /// jobs, exiting cleanly once the queue reports empty.
    pub async fn run(&self) -> Result<(), WorkerError> {
        loop {
            match self.process_one().await? {
                ProcessOutcome::QueueEmpty => {
                    info!("queue empty, exiting");
                    return Ok(());
                }
                ProcessOutcome::Analyzed(_) => {
                    tokio::time::sleep(self.cooldown).await;
                }
            }
        }
    }

    /// Fetches each event's hourly candle window, restricted to the regular
    /// session.
    ///
    /// A failed fetch drops that event and the loop continues; one bad
    /// event never aborts the batch, and nothing is retried within the
    /// pass.
    async fn load_candle_windows(
        &self,
        events: &[DividendEvent],
    ) -> Vec<(DividendEvent, Vec<Bar>)> {
        let mut loaded = Vec::with_capacity(events.len());
        for event in events {
            match self.fetch_window(event).await {
                Ok(bars) => loaded.push((event.clone(), bars)),
                Err(error) => {
                    warn!(
                        ticker = %event.ticker,
                        ex_dividend_date = %event.ex_dividend_date,
                        %error,
                        "skipping event: candle fetch failed"
                    );
                }
            }
        }
        loaded
    }

    async fn fetch_window(&self, event: &DividendEvent) -> Result<Vec<Bar>, ProviderError> {
        let start = day_start_utc(session::add_business_days(
            event.record_date,
            -self.window_days,
        ));
        let end = day_start_utc(session::add_business_days(
            event.record_date,
            self.window_days,
        ));

        let bars = self
            .bars
            .fetch_bars(BarsRequestParams {
                symbol: event.ticker.clone(),
                timeframe: TimeFrame::hour(),
                start,
                end,
            })
            .await?;
        Ok(session::regular_session_bars(&bars))
    }

    /// Normalize → rescale → aggregate → decide, performing the sole side
    /// effect (the alert) when a profit is implied.
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        windows: &[(DividendEvent, Vec<Bar>)],
    ) -> Outcome {
        let mut rescaled = Vec::new();
        for (event, bars) in windows {
            let series = match normalize::normalize_event(event, bars) {
                Ok(series) => series,
                Err(error) => {
                    warn!(ex_dividend_date = %event.ex_dividend_date, %error, "skipping event");
                    continue;
                }
            };
            match stats::rescale(event.record_date, &series) {
                Some(series) => rescaled.push(series),
                None => warn!(
                    ex_dividend_date = %event.ex_dividend_date,
                    "skipping event: no trading day at offset -1 to anchor on"
                ),
            }
        }

        let aggregated = stats::aggregate(&rescaled);
        let Some(drop) = stats::drop_estimate(&aggregated) else {
            info!(ticker = %request.ticker, "insufficient history, no estimate produced");
            return Outcome::InsufficientHistory;
        };

        let outcome = decide(drop, request.yield_);
        match &outcome {
            Outcome::Profit {
                expected_profit_pct,
                drop,
                yield_,
            } => {
                info!(
                    ticker = %request.ticker,
                    expected_profit_pct = *expected_profit_pct,
                    "profit predicted, notifying"
                );
                let text = alert_text(request, *drop, *yield_, *expected_profit_pct, &aggregated);
                if let Err(error) = self.notifier.publish(&text).await {
                    warn!(%error, "notification delivery failed");
                }
            }
            Outcome::NegativeProfit { drop, yield_ } => {
                info!(
                    ticker = %request.ticker,
                    drop = *drop,
                    yield_ = *yield_,
                    "negative profit predicted"
                );
            }
            Outcome::NoAction { .. } => {
                info!(ticker = %request.ticker, "drop equals yield, no action");
            }
            Outcome::InsufficientHistory => {}
        }
        outcome
    }
}

fn day_start_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
