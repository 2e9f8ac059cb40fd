//! Wire models for the solving service and the gatekeeper API.

use serde::{Deserialize, Serialize};

/// Status of a remote task as reported by the solving service.
///
/// Transitions are driven entirely by the service; the poller never infers
/// one locally except by its own timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Queued, not yet picked up by a worker
    #[serde(alias = "idle")]
    Pending,
    /// A worker is solving the task
    Processing,
    /// Solved; the solution payload is attached
    Ready,
    /// The service gave up on the task
    Failed,
}

impl TaskStatus {
    /// Returns the string representation used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Ready => "ready",
            TaskStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response from the task creation endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskResponse {
    #[serde(default)]
    pub error_id: i64,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Response from the task status endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusResponse {
    #[serde(default)]
    pub error_id: i64,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Opaque solution payload, present once status is `ready`
    #[serde(default)]
    pub solution: Option<serde_json::Value>,
}

impl TaskStatusResponse {
    pub fn error_reason(&self) -> String {
        self.error_description
            .clone()
            .unwrap_or_else(|| "unknown service error".into())
    }
}

/// Turnstile solving task in the service's `createTask` schema.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnstileTask {
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    pub website_key: String,
}

impl TurnstileTask {
    /// Proxyless Turnstile task for the given site.
    pub fn proxyless(website_url: impl Into<String>, website_key: impl Into<String>) -> Self {
        Self {
            task_type: "AntiTurnstileTaskProxyLess".into(),
            website_url: website_url.into(),
            website_key: website_key.into(),
        }
    }
}

/// Request body for the gatekeeper token endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatekeeperRequest {
    pub shop_domain: String,
    pub ttl_minutes: u32,
    pub turnstile_token: String,
    pub fingerprint: String,
    pub variant_id: String,
}

/// Grant returned by the gatekeeper endpoint.
///
/// The token carries a server-side signature; it is opaque to this crate and
/// only ever forwarded verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatekeeperGrant {
    #[serde(default)]
    pub success: bool,
    pub gatekeeper_token: String,
    #[serde(default)]
    pub cart_token: Option<String>,
    #[serde(default)]
    pub ttl_minutes: Option<u32>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub release_id: Option<String>,
}

/// Request body for the storefront cart-add endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CartAddRequest {
    pub id: String,
    pub quantity: u32,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub gatekeeper_token: String,
}

/// Cart state after a successful add.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSummary {
    pub items: Vec<serde_json::Value>,
    #[serde(default)]
    pub total_price: Option<i64>,
}
