//! End-to-end scenarios for the per-request driver, run against in-memory
//! fakes of the queue, both providers, and the notification sink.

mod common;

use common::{
    MemoryQueue, RecordingNotifier, ScriptedBars, StaticDividends, date, dividend, test_config,
    window_of,
};
use dividend_analysis::{
    pipeline::decide::Outcome,
    queue::{AnalysisRequest, Job},
    worker::{ProcessOutcome, Worker, WorkerError},
};

fn job(ticker: &str, yield_: f64) -> Job {
    Job {
        request: AnalysisRequest {
            ticker: ticker.to_string(),
            yield_,
        },
        receipt: format!("receipt-{ticker}"),
    }
}

/// Two complete events whose rescaled day-0 values are 0.95 and 0.90.
fn two_event_fixture(bars: &ScriptedBars) -> StaticDividends {
    bars.push_ok(window_of(&[
        (date(2024, 1, 8), 100.0),
        (date(2024, 1, 9), 95.0),
        (date(2024, 1, 10), 96.0),
    ]));
    bars.push_ok(window_of(&[
        (date(2024, 2, 5), 200.0),
        (date(2024, 2, 6), 180.0),
        (date(2024, 2, 7), 190.0),
    ]));

    StaticDividends::with_events(vec![
        dividend("X", date(2024, 1, 9), date(2024, 1, 11)),
        dividend("X", date(2024, 2, 6), date(2024, 2, 8)),
    ])
}

#[tokio::test]
async fn scenario_profit_predicted_sends_one_alert() {
    let queue = MemoryQueue::with_jobs(vec![job("X", 0.12)]);
    let bars = ScriptedBars::default();
    let dividends = two_event_fixture(&bars);
    let notifier = RecordingNotifier::default();

    let worker = Worker::new(
        Box::new(queue.clone()),
        Box::new(dividends),
        Box::new(bars),
        Box::new(notifier.clone()),
        &test_config(),
    );

    let outcome = worker.process_one().await.unwrap();
    // Day-0 rescaled values {0.95, 0.90}: p25 = 0.9125, drop = 0.0875.
    match outcome {
        ProcessOutcome::Analyzed(Outcome::Profit {
            expected_profit_pct,
            drop,
            yield_,
        }) => {
            assert_eq!(drop, 0.0875);
            assert_eq!(yield_, 0.12);
            assert!((expected_profit_pct - 3.25).abs() < 1e-9);
        }
        other => panic!("expected Profit, got {other:?}"),
    }

    let messages = notifier.messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Potential Trade"));
    assert!(messages[0].contains("\"ticker\":\"X\""));

    assert_eq!(
        *queue.acknowledged.lock().unwrap(),
        vec!["receipt-X".to_string()]
    );
}

#[tokio::test]
async fn scenario_negative_profit_stays_quiet() {
    let queue = MemoryQueue::with_jobs(vec![job("X", 0.05)]);
    let bars = ScriptedBars::default();
    let dividends = two_event_fixture(&bars);
    let notifier = RecordingNotifier::default();

    let worker = Worker::new(
        Box::new(queue.clone()),
        Box::new(dividends),
        Box::new(bars),
        Box::new(notifier.clone()),
        &test_config(),
    );

    let outcome = worker.process_one().await.unwrap();
    match outcome {
        ProcessOutcome::Analyzed(Outcome::NegativeProfit { drop, yield_ }) => {
            assert_eq!(drop, 0.0875);
            assert_eq!(yield_, 0.05);
        }
        other => panic!("expected NegativeProfit, got {other:?}"),
    }

    assert!(notifier.messages.lock().unwrap().is_empty());
    assert_eq!(queue.acknowledged.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn scenario_exact_tie_fires_neither_branch() {
    let queue = MemoryQueue::with_jobs(vec![job("X", 0.0875)]);
    let bars = ScriptedBars::default();
    let dividends = two_event_fixture(&bars);
    let notifier = RecordingNotifier::default();

    let worker = Worker::new(
        Box::new(queue.clone()),
        Box::new(dividends),
        Box::new(bars),
        Box::new(notifier.clone()),
        &test_config(),
    );

    let outcome = worker.process_one().await.unwrap();
    assert!(matches!(
        outcome,
        ProcessOutcome::Analyzed(Outcome::NoAction { .. })
    ));
    assert!(notifier.messages.lock().unwrap().is_empty());
    assert_eq!(queue.acknowledged.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn scenario_no_events_is_insufficient_history() {
    let queue = MemoryQueue::with_jobs(vec![job("X", 0.05)]);
    let dividends = StaticDividends::with_events(vec![]);
    let notifier = RecordingNotifier::default();

    let worker = Worker::new(
        Box::new(queue.clone()),
        Box::new(dividends),
        Box::new(ScriptedBars::default()),
        Box::new(notifier.clone()),
        &test_config(),
    );

    let outcome = worker.process_one().await.unwrap();
    assert!(matches!(
        outcome,
        ProcessOutcome::Analyzed(Outcome::InsufficientHistory)
    ));
    // Still acknowledged: insufficient history is a successful terminal
    // outcome, not a retryable error.
    assert_eq!(queue.acknowledged.lock().unwrap().len(), 1);
    assert!(notifier.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn scenario_fatal_fetch_leaves_the_job_on_the_queue() {
    let queue = MemoryQueue::with_jobs(vec![job("X", 0.05)]);
    let dividends = StaticDividends::failing("500 Internal Server Error");
    let notifier = RecordingNotifier::default();

    let worker = Worker::new(
        Box::new(queue.clone()),
        Box::new(dividends),
        Box::new(ScriptedBars::default()),
        Box::new(notifier.clone()),
        &test_config(),
    );

    let error = worker.process_one().await.unwrap_err();
    assert!(matches!(error, WorkerError::FatalFetch(_)));
    assert!(queue.acknowledged.lock().unwrap().is_empty());
    assert!(notifier.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn one_failed_event_does_not_abort_the_batch() {
    let queue = MemoryQueue::with_jobs(vec![job("X", 0.12)]);
    let bars = ScriptedBars::default();
    bars.push_ok(window_of(&[
        (date(2024, 1, 8), 100.0),
        (date(2024, 1, 9), 95.0),
    ]));
    bars.push_err("429 Too Many Requests");
    bars.push_ok(window_of(&[
        (date(2024, 3, 4), 100.0),
        (date(2024, 3, 5), 90.0),
    ]));

    let dividends = StaticDividends::with_events(vec![
        dividend("X", date(2024, 1, 9), date(2024, 1, 11)),
        dividend("X", date(2024, 2, 6), date(2024, 2, 8)),
        dividend("X", date(2024, 3, 5), date(2024, 3, 7)),
    ]);
    let notifier = RecordingNotifier::default();

    let worker = Worker::new(
        Box::new(queue.clone()),
        Box::new(dividends),
        Box::new(bars),
        Box::new(notifier.clone()),
        &test_config(),
    );

    // The surviving two events still carry day-0 values {0.95, 0.90}.
    let outcome = worker.process_one().await.unwrap();
    match outcome {
        ProcessOutcome::Analyzed(Outcome::Profit { drop, .. }) => assert_eq!(drop, 0.0875),
        other => panic!("expected Profit from the surviving events, got {other:?}"),
    }
    assert_eq!(queue.acknowledged.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn series_without_a_prior_trading_day_is_dropped() {
    let queue = MemoryQueue::with_jobs(vec![job("X", 0.12)]);
    let bars = ScriptedBars::default();
    // First event's window starts on the ex-dividend day itself: no offset
    // -1 row, unusable for rescaling.
    bars.push_ok(window_of(&[
        (date(2024, 1, 9), 95.0),
        (date(2024, 1, 10), 96.0),
    ]));
    bars.push_ok(window_of(&[
        (date(2024, 2, 5), 200.0),
        (date(2024, 2, 6), 180.0),
    ]));

    let dividends = StaticDividends::with_events(vec![
        dividend("X", date(2024, 1, 9), date(2024, 1, 11)),
        dividend("X", date(2024, 2, 6), date(2024, 2, 8)),
    ]);
    let notifier = RecordingNotifier::default();

    let worker = Worker::new(
        Box::new(queue.clone()),
        Box::new(dividends),
        Box::new(bars),
        Box::new(notifier.clone()),
        &test_config(),
    );

    // Only the second event survives: day-0 value 0.90, p25 = p75 = 0.90.
    let outcome = worker.process_one().await.unwrap();
    match outcome {
        ProcessOutcome::Analyzed(Outcome::Profit { drop, .. }) => assert_eq!(drop, 0.1),
        other => panic!("expected Profit from the surviving event, got {other:?}"),
    }
}

#[tokio::test]
async fn run_drains_the_queue_and_exits_on_empty() {
    let queue = MemoryQueue::with_jobs(vec![job("A", 0.05), job("B", 0.05)]);
    let notifier = RecordingNotifier::default();

    // Both tickers resolve to no events: two insufficient-history outcomes.
    let worker = Worker::new(
        Box::new(queue.clone()),
        Box::new(StaticDividends::with_events(vec![])),
        Box::new(ScriptedBars::default()),
        Box::new(notifier.clone()),
        &test_config(),
    );

    worker.run().await.unwrap();
    assert_eq!(
        *queue.acknowledged.lock().unwrap(),
        vec!["receipt-A".to_string(), "receipt-B".to_string()]
    );
}
