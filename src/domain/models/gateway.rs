use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::Attachment;
use super::WorkflowMode;

/// One outgoing interaction with the workflow backend. Identifiers and text
/// travel as form fields, attachments as named binary parts.
pub struct WorkflowRequest {
    pub user_id: String,
    pub session_id: String,
    pub user_text: String,
    pub attachments: Vec<Attachment>,
    pub mode: WorkflowMode,
}

impl WorkflowRequest {
    pub fn new(user_id: &str, session_id: &str, user_text: &str, mode: WorkflowMode) -> WorkflowRequest {
        return WorkflowRequest {
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            user_text: user_text.to_string(),
            attachments: vec![],
            mode,
        };
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> WorkflowRequest {
        self.attachments = attachments;
        return self;
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Request to the backend timed out")]
    Timeout,
    #[error("Backend error: {0}")]
    Transport(String),
    #[error("Backend returned HTTP status {0}")]
    Http(u16),
    #[error("Error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CleanupResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub deleted_files: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

pub type GatewayBox = Box<dyn Gateway + Send + Sync>;

#[async_trait]
pub trait Gateway {
    /// Sends user text plus attachments to the endpoint selected by the
    /// request mode and returns the raw response payload. A response body
    /// that is not valid JSON yields `Value::Null`; the normalizer turns
    /// that into its fallback block.
    async fn send(&self, request: WorkflowRequest) -> Result<Value, GatewayError>;

    /// Session file/status info. Short timeout, no side effects.
    async fn status(&self, user_id: &str, session_id: &str) -> Result<Value, GatewayError>;

    /// Removes server-side session files, returning what was deleted.
    async fn cleanup(&self, user_id: &str, session_id: &str) -> Result<CleanupResult, GatewayError>;

    /// True iff a lightweight GET to the service root succeeds within the
    /// health-check timeout. Drives the connectivity indicator only.
    async fn health_check(&self) -> bool;
}
