//! Generic submit/poll client for remote asynchronous-task APIs.
//!
//! The solving service follows a two-phase protocol: `createTask` returns a
//! task id, then `getTaskResult` is queried until the task reaches a terminal
//! status. [`TaskPoller`] drives that protocol with a bounded retry policy on
//! submission, a fixed polling interval, a hard wall-clock timeout, and
//! cooperative cancellation between iterations.
//!
//! The wire calls sit behind the [`TaskTransport`] trait so tests can swap in
//! scripted transports and run the loop under Tokio's paused clock.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{PollError, SubmissionError, TransportError};
use crate::models::{CreateTaskResponse, TaskStatus, TaskStatusResponse};

/// Configuration for one poller invocation.
///
/// Passed explicitly rather than held as process-wide state, so concurrent
/// pollers with different keys or budgets never interfere.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Base URL of the solving service API
    pub base_url: String,
    /// API key sent as `clientKey` on every call
    pub client_key: String,
    /// Delay between consecutive status queries
    pub poll_interval: Duration,
    /// Hard wall-clock budget for the whole poll loop
    pub timeout: Duration,
    /// Additional submission attempts after the first one fails
    pub max_submit_retries: u32,
    /// Base delay for exponential submission backoff
    pub backoff_base: Duration,
}

impl PollerConfig {
    /// Config with default timing for the given service endpoint and key.
    pub fn new(base_url: impl Into<String>, client_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client_key: client_key.into(),
            poll_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(120),
            max_submit_retries: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

/// Opaque identifier correlating a submitted task with its status queries.
///
/// Valid only as long as the remote service retains the task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskHandle(String);

impl TaskHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal result of a poll loop.
///
/// Exactly one outcome is produced per handle; a result payload only ever
/// appears behind `Ready`, so nothing can be fabricated on the other exits.
#[derive(Debug)]
pub enum PollOutcome {
    /// The service reported the task solved; payload passed through unmodified
    Ready(serde_json::Value),
    /// The service reported the task failed. Never retried.
    Failed { reason: String },
    /// The local wall-clock budget elapsed first
    Timeout { elapsed: Duration },
    /// The caller's cancellation token fired between iterations
    Cancelled,
}

impl PollOutcome {
    /// Convert into a `Result`, mapping the non-ready exits to [`PollError`].
    pub fn into_result(self) -> Result<serde_json::Value, PollError> {
        match self {
            PollOutcome::Ready(solution) => Ok(solution),
            PollOutcome::Failed { reason } => Err(PollError::Failed { reason }),
            PollOutcome::Timeout { elapsed } => Err(PollError::Timeout { elapsed }),
            PollOutcome::Cancelled => Err(PollError::Cancelled),
        }
    }
}

/// Wire calls of the two-phase task protocol.
pub trait TaskTransport {
    /// Submit a task payload to the creation endpoint.
    fn create_task(
        &self,
        task: &serde_json::Value,
    ) -> impl Future<Output = Result<CreateTaskResponse, TransportError>> + Send;

    /// Query the status endpoint for a previously created task.
    fn task_status(
        &self,
        handle: &TaskHandle,
    ) -> impl Future<Output = Result<TaskStatusResponse, TransportError>> + Send;
}

/// HTTP transport over a shared `rquest` client.
///
/// The client's connection pool tolerates concurrent poll loops; every
/// request is independently addressed by its own handle.
#[derive(Clone)]
pub struct HttpTransport {
    client: rquest::Client,
    base_url: String,
    client_key: String,
}

impl HttpTransport {
    pub fn new(client: rquest::Client, base_url: impl Into<String>, client_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            client_key: client_key.into(),
        }
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, TransportError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        Ok(response.json::<T>().await?)
    }
}

impl TaskTransport for HttpTransport {
    async fn create_task(
        &self,
        task: &serde_json::Value,
    ) -> Result<CreateTaskResponse, TransportError> {
        let body = serde_json::json!({
            "clientKey": self.client_key,
            "task": task,
        });
        self.post_json("createTask", &body).await
    }

    async fn task_status(
        &self,
        handle: &TaskHandle,
    ) -> Result<TaskStatusResponse, TransportError> {
        let body = serde_json::json!({
            "clientKey": self.client_key,
            "taskId": handle.as_str(),
        });
        self.post_json("getTaskResult", &body).await
    }
}

/// Submit/poll driver for a remote asynchronous-task service.
///
/// # Example
/// ```ignore
/// use gatepass::poller::{PollerConfig, TaskPoller};
/// use tokio_util::sync::CancellationToken;
///
/// let config = PollerConfig::new("https://api.capsolver.com", "key");
/// let poller = TaskPoller::http(rquest::Client::new(), config);
///
/// let handle = poller.submit(&task_payload).await?;
/// let outcome = poller.poll_until_terminal(&handle, &CancellationToken::new()).await;
/// ```
pub struct TaskPoller<T> {
    transport: T,
    config: PollerConfig,
}

impl TaskPoller<HttpTransport> {
    /// Poller speaking HTTP to the endpoint named in `config`.
    pub fn http(client: rquest::Client, config: PollerConfig) -> Self {
        let transport = HttpTransport::new(client, config.base_url.clone(), config.client_key.clone());
        Self::with_transport(transport, config)
    }
}

impl<T: TaskTransport> TaskPoller<T> {
    /// Poller over a caller-supplied transport.
    pub fn with_transport(transport: T, config: PollerConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Submit a task and return its handle.
    ///
    /// Transport failures and non-success status codes are retried up to
    /// `max_submit_retries` more times with exponential backoff. A response
    /// that positively rejects the task is surfaced immediately and never
    /// retried, as is a success response with no usable handle.
    pub async fn submit(&self, task: &serde_json::Value) -> Result<TaskHandle, SubmissionError> {
        let attempts = self.config.max_submit_retries + 1;
        let mut last: Option<TransportError> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let backoff = self.config.backoff_base * 2u32.saturating_pow(attempt - 1);
                tracing::debug!(attempt, ?backoff, "retrying task submission");
                tokio::time::sleep(backoff).await;
            }

            match self.transport.create_task(task).await {
                Ok(response) => return Self::parse_submission(response),
                Err(err) => {
                    tracing::debug!(attempt, error = %err, "task submission attempt failed");
                    last = Some(err);
                }
            }
        }

        Err(SubmissionError::RetriesExhausted {
            attempts,
            last: last.unwrap_or_else(|| TransportError::Other("no attempt recorded".into())),
        })
    }

    fn parse_submission(response: CreateTaskResponse) -> Result<TaskHandle, SubmissionError> {
        if response.error_id != 0 {
            return Err(SubmissionError::Rejected(
                response
                    .error_description
                    .unwrap_or_else(|| "unknown service error".into()),
            ));
        }

        match response.task_id {
            Some(id) if !id.is_empty() => {
                tracing::debug!(task_id = %id, "task created");
                Ok(TaskHandle::new(id))
            }
            _ => Err(SubmissionError::MalformedResponse(
                "creation response missing taskId".into(),
            )),
        }
    }

    /// Poll a handle until the service reports a terminal status, the local
    /// timeout elapses, or the caller cancels.
    ///
    /// Single-query transport failures are transient: they are never surfaced
    /// individually, only counted against the wall-clock budget. Cancellation
    /// is honored between iterations, never mid-request. The final sleep is
    /// clamped so the last status query lands on the deadline rather than
    /// overshooting it.
    pub async fn poll_until_terminal(
        &self,
        handle: &TaskHandle,
        cancel: &CancellationToken,
    ) -> PollOutcome {
        let start = Instant::now();
        let deadline = start + self.config.timeout;

        loop {
            if cancel.is_cancelled() {
                tracing::debug!(handle = %handle, "polling cancelled");
                return PollOutcome::Cancelled;
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::debug!(handle = %handle, elapsed = ?(now - start), "polling timed out");
                return PollOutcome::Timeout { elapsed: now - start };
            }

            let wait = self.config.poll_interval.min(deadline - now);
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(handle = %handle, "polling cancelled");
                    return PollOutcome::Cancelled;
                }
                _ = tokio::time::sleep(wait) => {}
            }

            let response = match self.transport.task_status(handle).await {
                Ok(response) => response,
                Err(err) => {
                    // Transient: retried on the next tick, within the budget.
                    tracing::debug!(handle = %handle, error = %err, "status query failed");
                    continue;
                }
            };

            if response.error_id != 0 {
                return PollOutcome::Failed {
                    reason: response.error_reason(),
                };
            }

            match response.status {
                Some(TaskStatus::Ready) => {
                    return match response.solution {
                        Some(solution) => {
                            tracing::debug!(handle = %handle, "task ready");
                            PollOutcome::Ready(solution)
                        }
                        // Missing payload is a malformed response, not an
                        // empty success.
                        None => PollOutcome::Failed {
                            reason: "ready response missing solution payload".into(),
                        },
                    };
                }
                Some(TaskStatus::Failed) => {
                    return PollOutcome::Failed {
                        reason: response.error_reason(),
                    };
                }
                Some(status) => {
                    tracing::debug!(handle = %handle, %status, "task not yet terminal");
                }
                None => {
                    tracing::debug!(handle = %handle, "status response missing status field");
                }
            }
        }
    }
}
