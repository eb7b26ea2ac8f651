//! Notification sink: fire-and-forget publish of a plain-text alert.
//!
//! Delivery failures are surfaced to the caller but must never fail the
//! request that produced the alert; the worker logs and moves on.

use async_trait::async_trait;
use snafu::{Backtrace, ResultExt, Snafu, ensure};

/// Errors raised while publishing a notification.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum NotifyError {
    /// Transport failure reaching the notification endpoint.
    #[snafu(display("Failed to publish notification: {source}"))]
    Publish {
        /// Underlying HTTP error.
        source: reqwest::Error,
        /// Captured backtrace.
        backtrace: Backtrace,
    },

    /// The sink answered with a non-success status.
    #[snafu(display("Notification sink rejected message: {message}"))]
    Rejected {
        /// Status description from the sink.
        message: String,
        /// Captured backtrace.
        backtrace: Backtrace,
    },
}

/// Outbound notification channel.
#[async_trait]
pub trait Notifier {
    /// Publishes one plain-text message. No delivery confirmation beyond
    /// the transport status.
    async fn publish(&self, text: &str) -> Result<(), NotifyError>;
}

/// Notifier that POSTs the message body to a webhook URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Creates a notifier targeting `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn publish(&self, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .body(text.to_string())
            .send()
            .await
            .context(PublishSnafu)?;

        ensure!(
            response.status().is_success(),
            RejectedSnafu {
                message: format!("status {}", response.status()),
            }
        );
        Ok(())
    }
}
