//! In-memory fakes for the worker's collaborators.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use dividend_analysis::{
    config::Config,
    notify::{Notifier, NotifyError},
    queue::{Job, QueueError, WorkQueue},
};
use market_data::{
    models::{bar::Bar, dividend::DividendEvent, request_params::BarsRequestParams},
    providers::{ApiSnafu, BarsProvider, DividendsProvider, ProviderError},
};

/// Config pointing nowhere, with a zero cooldown so drain loops finish fast.
pub fn test_config() -> Config {
    Config {
        queue_url: "http://unused".to_string(),
        notify_url: "http://unused".to_string(),
        cooldown_secs: 0,
        page_period_secs: 12,
        window_days: 4,
    }
}

/// Queue backed by a `VecDeque`, recording acknowledged receipts.
#[derive(Clone, Default)]
pub struct MemoryQueue {
    jobs: Arc<Mutex<VecDeque<Job>>>,
    pub acknowledged: Arc<Mutex<Vec<String>>>,
}

impl MemoryQueue {
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        Self {
            jobs: Arc::new(Mutex::new(jobs.into())),
            acknowledged: Arc::default(),
        }
    }
}

#[async_trait]
impl WorkQueue for MemoryQueue {
    async fn receive_one(&self) -> Result<Option<Job>, QueueError> {
        Ok(self.jobs.lock().unwrap().pop_front())
    }

    async fn acknowledge(&self, job: &Job) -> Result<(), QueueError> {
        self.acknowledged.lock().unwrap().push(job.receipt.clone());
        Ok(())
    }
}

/// Dividend source returning a canned list, or failing outright.
#[derive(Clone)]
pub struct StaticDividends {
    result: Result<Vec<DividendEvent>, String>,
}

impl StaticDividends {
    pub fn with_events(events: Vec<DividendEvent>) -> Self {
        Self { result: Ok(events) }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl DividendsProvider for StaticDividends {
    async fn fetch_dividends(&self, _ticker: &str) -> Result<Vec<DividendEvent>, ProviderError> {
        match &self.result {
            Ok(events) => Ok(events.clone()),
            Err(message) => ApiSnafu {
                message: message.clone(),
            }
            .fail(),
        }
    }
}

/// Bars source answering each fetch in order from a script of results.
#[derive(Clone, Default)]
pub struct ScriptedBars {
    script: Arc<Mutex<VecDeque<Result<Vec<Bar>, String>>>>,
}

impl ScriptedBars {
    pub fn push_ok(&self, bars: Vec<Bar>) {
        self.script.lock().unwrap().push_back(Ok(bars));
    }

    pub fn push_err(&self, message: &str) {
        self.script.lock().unwrap().push_back(Err(message.to_string()));
    }
}

#[async_trait]
impl BarsProvider for ScriptedBars {
    async fn fetch_bars(&self, _params: BarsRequestParams) -> Result<Vec<Bar>, ProviderError> {
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(bars)) => Ok(bars),
            Some(Err(message)) => ApiSnafu { message }.fail(),
            None => Ok(Vec::new()),
        }
    }
}

/// Notifier that records every published message.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub messages: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, text: &str) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// One session bar at `hour_utc` on the given date. January dates are under
/// EST, so 15:00Z-20:00Z land inside the regular session.
pub fn session_bar(date: NaiveDate, hour_utc: u32, vwap: f64) -> Bar {
    Bar {
        timestamp: date.and_hms_opt(hour_utc, 0, 0).unwrap().and_utc(),
        vwap,
        open: None,
        high: None,
        low: None,
        close: None,
        volume: None,
        trade_count: None,
    }
}

/// A candle window of one session bar per (date, vwap) pair.
pub fn window_of(days: &[(NaiveDate, f64)]) -> Vec<Bar> {
    days.iter()
        .map(|(date, vwap)| session_bar(*date, 15, *vwap))
        .collect()
}

/// A dividend event for `ticker` with the given ex-dividend and record
/// dates.
pub fn dividend(ticker: &str, ex: NaiveDate, record: NaiveDate) -> DividendEvent {
    DividendEvent {
        ticker: ticker.to_string(),
        ex_dividend_date: ex,
        record_date: record,
        cash_amount: Some(0.25),
        declaration_date: None,
        pay_date: None,
        frequency: Some(4),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
