//! Turnstile solving via a remote captcha-solving service.
//!
//! Thin client over [`TaskPoller`]: builds the service's Turnstile task
//! payload, drives the submit/poll protocol, and extracts the solved token
//! from the otherwise opaque solution payload.

use tokio_util::sync::CancellationToken;

use crate::error::{GatepassError, Result};
use crate::models::TurnstileTask;
use crate::poller::{HttpTransport, PollerConfig, TaskPoller, TaskTransport};

/// Solver for Cloudflare Turnstile challenges.
pub struct TurnstileSolver<T = HttpTransport> {
    poller: TaskPoller<T>,
}

impl TurnstileSolver<HttpTransport> {
    /// Solver speaking HTTP to the service named in `config`.
    pub fn new(client: rquest::Client, config: PollerConfig) -> Self {
        Self {
            poller: TaskPoller::http(client, config),
        }
    }
}

impl<T: TaskTransport> TurnstileSolver<T> {
    /// Solver over a caller-supplied transport.
    pub fn with_poller(poller: TaskPoller<T>) -> Self {
        Self { poller }
    }

    /// Solve the Turnstile challenge protecting `website_url`.
    ///
    /// Returns the solved token ready to be forwarded to the protected site.
    /// The token's contents are opaque; nothing is derived from it locally.
    pub async fn solve(
        &self,
        website_url: &str,
        website_key: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let task = TurnstileTask::proxyless(website_url, website_key);
        let payload = serde_json::to_value(&task)?;

        tracing::debug!(website_url, website_key, "submitting turnstile task");
        let handle = self.poller.submit(&payload).await?;

        let solution = self
            .poller
            .poll_until_terminal(&handle, cancel)
            .await
            .into_result()?;

        match solution.get("token").and_then(|t| t.as_str()) {
            Some(token) if !token.is_empty() => {
                tracing::debug!(handle = %handle, "turnstile solved");
                Ok(token.to_string())
            }
            _ => Err(GatepassError::InvalidResponse(
                "solution missing turnstile token".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PollError, TransportError};
    use crate::models::{CreateTaskResponse, TaskStatus, TaskStatusResponse};
    use crate::poller::TaskHandle;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct ScriptedTransport {
        statuses: Arc<Mutex<Vec<TaskStatusResponse>>>,
        last_task: Arc<Mutex<Option<serde_json::Value>>>,
    }

    impl ScriptedTransport {
        fn new(statuses: Vec<TaskStatusResponse>) -> Self {
            Self {
                statuses: Arc::new(Mutex::new(statuses)),
                last_task: Arc::new(Mutex::new(None)),
            }
        }
    }

    impl TaskTransport for ScriptedTransport {
        async fn create_task(
            &self,
            task: &serde_json::Value,
        ) -> std::result::Result<CreateTaskResponse, TransportError> {
            *self.last_task.lock().unwrap() = Some(task.clone());
            Ok(CreateTaskResponse {
                error_id: 0,
                error_description: None,
                task_id: Some("t-1".into()),
            })
        }

        async fn task_status(
            &self,
            _handle: &TaskHandle,
        ) -> std::result::Result<TaskStatusResponse, TransportError> {
            Ok(self.statuses.lock().unwrap().remove(0))
        }
    }

    fn ready_with(solution: serde_json::Value) -> TaskStatusResponse {
        TaskStatusResponse {
            error_id: 0,
            error_description: None,
            status: Some(TaskStatus::Ready),
            solution: Some(solution),
        }
    }

    fn solver(transport: ScriptedTransport) -> TurnstileSolver<ScriptedTransport> {
        let config = PollerConfig::new("http://mock", "key");
        TurnstileSolver::with_poller(TaskPoller::with_transport(transport, config))
    }

    #[tokio::test(start_paused = true)]
    async fn test_solve_extracts_token_and_sends_task_schema() {
        let transport = ScriptedTransport::new(vec![ready_with(serde_json::json!({
            "token": "0.solved-token",
            "userAgent": "Mozilla/5.0",
        }))]);

        let token = solver(transport.clone())
            .solve("https://shop.example/", "0x4AAAAAAB", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(token, "0.solved-token");

        let sent = transport.last_task.lock().unwrap().clone().unwrap();
        assert_eq!(sent["type"], "AntiTurnstileTaskProxyLess");
        assert_eq!(sent["websiteURL"], "https://shop.example/");
        assert_eq!(sent["websiteKey"], "0x4AAAAAAB");
    }

    #[tokio::test(start_paused = true)]
    async fn test_solution_without_token_is_invalid_response() {
        let transport =
            ScriptedTransport::new(vec![ready_with(serde_json::json!({"userAgent": "x"}))]);

        let err = solver(transport)
            .solve("https://shop.example/", "key", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, GatepassError::InvalidResponse(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_service_failure_surfaces_as_poll_error() {
        let transport = ScriptedTransport::new(vec![TaskStatusResponse {
            error_id: 0,
            error_description: Some("unsolvable".into()),
            status: Some(TaskStatus::Failed),
            solution: None,
        }]);

        let err = solver(transport)
            .solve("https://shop.example/", "key", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GatepassError::Poll(PollError::Failed { .. })
        ));
    }
}
