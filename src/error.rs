//! Error types for the gatepass library.

use thiserror::Error;

/// A single failed wire call, before any retry classification.
///
/// Transport errors are transient by definition: the poller retries them
/// until its own budget (submit retries or the wall-clock timeout) runs out.
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request failed at the connection level
    #[error("HTTP request failed: {0}")]
    Http(#[from] rquest::Error),

    /// Non-success HTTP status code
    #[error("unexpected status code: {0}")]
    Status(u16),

    /// Response body could not be decoded
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Injected failure from a test transport
    #[error("{0}")]
    Other(String),
}

/// Failure to obtain a task handle from the creation endpoint.
///
/// Submission failure is fatal for the invocation; the poller never
/// re-submits on its own after retries are exhausted.
#[derive(Error, Debug)]
pub enum SubmissionError {
    /// Every attempt failed at the transport level
    #[error("task submission failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: TransportError,
    },

    /// The service answered but rejected the task outright. Not retried.
    #[error("task rejected by service: {0}")]
    Rejected(String),

    /// Success status but no usable handle in the body
    #[error("malformed submission response: {0}")]
    MalformedResponse(String),
}

/// Terminal poll failure, for callers that want a `Result` instead of
/// matching on [`PollOutcome`](crate::poller::PollOutcome).
#[derive(Error, Debug)]
pub enum PollError {
    /// Wall-clock budget elapsed before a terminal status was observed
    #[error("task did not reach a terminal status within {elapsed:?}")]
    Timeout { elapsed: std::time::Duration },

    /// The service reported the task as failed
    #[error("task failed: {reason}")]
    Failed { reason: String },

    /// The caller's cancellation token fired between poll iterations
    #[error("polling cancelled")]
    Cancelled,
}

/// Main error type for the gatepass library.
#[derive(Error, Debug)]
pub enum GatepassError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] rquest::Error),

    /// Task submission failed
    #[error("submission failed: {0}")]
    Submission(#[from] SubmissionError),

    /// Poll loop ended without a result
    #[error("polling failed: {0}")]
    Poll(#[from] PollError),

    /// Gatekeeper endpoint refused to issue a token
    #[error("gatekeeper rejected token request: {message}")]
    GatekeeperRejected { message: String },

    /// Cart endpoint refused the add
    #[error("cart addition failed: {message}")]
    CartRejected { message: String },

    /// Invalid response from server
    #[error("invalid server response: {0}")]
    InvalidResponse(String),

    /// Builder was missing a required value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for gatepass operations.
pub type Result<T> = std::result::Result<T, GatepassError>;
