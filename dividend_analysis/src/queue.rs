//! Work-queue boundary: at most one job in flight, deleted only after the
//! full pipeline has run for it.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors from the work-queue boundary.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Transport failure talking to the queue endpoint.
    #[error("queue request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The queue returned a non-success status.
    #[error("queue error: {0}")]
    Service(String),

    /// The job body was not valid JSON for the expected schema.
    #[error("malformed job body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

/// The unit of work: one ticker plus the dividend yield quoted by the
/// requester.
///
/// The wire field is spelled `yeild`; that is the established message
/// schema of the external system producing these jobs, mirrored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Ticker symbol to analyze.
    pub ticker: String,

    /// Dividend yield as a fraction; arrives as a string or a number.
    #[serde(rename = "yeild", deserialize_with = "string_or_f64")]
    pub yield_: f64,
}

fn string_or_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid yield: {text}"))),
    }
}

/// One received job: the parsed request plus the receipt needed to delete
/// it from the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    /// Parsed analysis request.
    pub request: AnalysisRequest,
    /// Opaque receipt handle used to acknowledge the job.
    pub receipt: String,
}

/// Narrow queue contract: receive at most one job, delete it when fully
/// processed. A job is acknowledged after success, partial success, or the
/// insufficient-history outcome, and never after a fatal fetch error, so a
/// fatal error leaves it for the queue's own redelivery.
#[async_trait]
pub trait WorkQueue {
    /// Receives at most one job; `None` means the queue is empty.
    async fn receive_one(&self) -> Result<Option<Job>, QueueError>;

    /// Deletes a fully-processed job from the queue.
    async fn acknowledge(&self, job: &Job) -> Result<(), QueueError>;
}

/// Wire shape of one received queue message.
#[derive(Debug, Deserialize)]
struct ReceiveResponse {
    body: String,
    receipt_handle: String,
}

/// Queue client speaking the HTTP receive/delete contract: `POST /receive`
/// answers `204` when empty or a JSON `{body, receipt_handle}` message, and
/// `POST /delete` acknowledges by receipt handle.
pub struct HttpQueue {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpQueue {
    /// Creates a queue client for `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl WorkQueue for HttpQueue {
    async fn receive_one(&self) -> Result<Option<Job>, QueueError> {
        let response = self
            .client
            .post(format!("{}/receive", self.endpoint))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(QueueError::Service(format!(
                "receive returned {}",
                response.status()
            )));
        }

        let received: ReceiveResponse = response.json().await?;
        let request: AnalysisRequest = serde_json::from_str(&received.body)?;
        Ok(Some(Job {
            request,
            receipt: received.receipt_handle,
        }))
    }

    async fn acknowledge(&self, job: &Job) -> Result<(), QueueError> {
        let response = self
            .client
            .post(format!("{}/delete", self.endpoint))
            .json(&serde_json::json!({ "receipt_handle": job.receipt }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QueueError::Service(format!(
                "delete returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
