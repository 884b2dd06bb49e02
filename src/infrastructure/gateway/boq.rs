#[cfg(test)]
#[path = "boq_test.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde_json::Value;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::CleanupResult;
use crate::domain::models::Gateway;
use crate::domain::models::GatewayError;
use crate::domain::models::WorkflowMode;
use crate::domain::models::WorkflowRequest;

/// Substituted when BOQ generation is requested with empty text, so the
/// backend always receives non-empty intent text.
pub const DEFAULT_BOQ_INSTRUCTION: &str = "Generate BOQ for uploaded files";

// Status and cleanup are short, best-effort reads.
const STATUS_TIMEOUT_SECS: u64 = 10;

pub struct BoqGateway {
    url: String,
    request_timeout: String,
    health_check_timeout: String,
}

impl Default for BoqGateway {
    fn default() -> BoqGateway {
        return BoqGateway {
            url: Config::get(ConfigKey::BaseApiUrl),
            request_timeout: Config::get(ConfigKey::RequestTimeout),
            health_check_timeout: Config::get(ConfigKey::HealthCheckTimeout),
        };
    }
}

fn convert_err(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        return GatewayError::Timeout;
    }

    return GatewayError::Transport(err.to_string());
}

impl BoqGateway {
    fn endpoint(&self, mode: WorkflowMode) -> String {
        let url = &self.url;
        match mode {
            WorkflowMode::Auto => return format!("{url}/api/v1/boq/workflow"),
            WorkflowMode::Analyze => return format!("{url}/api/v1/boq/analyze-only"),
            WorkflowMode::Boq => return format!("{url}/api/v1/boq/generate-boq"),
            WorkflowMode::Chat => return format!("{url}/api/v1/boq/chat"),
        }
    }

    fn build_form(&self, request: &WorkflowRequest) -> Result<multipart::Form, GatewayError> {
        let mut form = multipart::Form::new()
            .text("user_id", request.user_id.to_string())
            .text("session_id", request.session_id.to_string());

        let mut user_text = request.user_text.to_string();
        if request.mode == WorkflowMode::Boq && user_text.trim().is_empty() {
            user_text = DEFAULT_BOQ_INSTRUCTION.to_string();
        }

        // Chat and auto always carry the text field; analyze only when the
        // user typed something; boq always after substitution.
        if request.mode != WorkflowMode::Analyze || !user_text.is_empty() {
            form = form.text("user_input", user_text);
        }

        if request.mode.allows_attachments() {
            for attachment in &request.attachments {
                let part = multipart::Part::bytes(attachment.bytes.to_vec())
                    .file_name(attachment.filename.to_string())
                    .mime_str(&attachment.mime_type)
                    .map_err(|err| {
                        return GatewayError::Transport(err.to_string());
                    })?;
                form = form.part("files", part);
            }
        }

        return Ok(form);
    }
}

#[async_trait]
impl Gateway for BoqGateway {
    async fn send(&self, request: WorkflowRequest) -> Result<Value, GatewayError> {
        let endpoint = self.endpoint(request.mode);
        let timeout = Duration::from_secs(self.request_timeout.parse::<u64>().unwrap_or(300));
        let form = self.build_form(&request)?;

        tracing::debug!(
            endpoint = endpoint.as_str(),
            mode = %request.mode,
            attachments = request.attachments.len(),
            "Dispatching workflow request"
        );

        let res = reqwest::Client::new()
            .post(endpoint)
            .multipart(form)
            .timeout(timeout)
            .send()
            .await
            .map_err(convert_err)?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Workflow request failed");
            return Err(GatewayError::Http(res.status().as_u16()));
        }

        // A malformed body is not an error. The normalizer turns Null into
        // its fallback block.
        let payload = res.json::<Value>().await.unwrap_or(Value::Null);

        if payload.get("success").and_then(|success| {
            return success.as_bool();
        }) == Some(false)
        {
            let message = payload
                .get("error")
                .and_then(|error| {
                    return error.as_str();
                })
                .unwrap_or("Unknown error");
            return Err(GatewayError::Backend(message.to_string()));
        }

        return Ok(payload);
    }

    async fn status(&self, user_id: &str, session_id: &str) -> Result<Value, GatewayError> {
        let url = format!("{}/api/v1/boq/status/{user_id}/{session_id}", self.url);

        let res = reqwest::Client::new()
            .get(url)
            .timeout(Duration::from_secs(STATUS_TIMEOUT_SECS))
            .send()
            .await
            .map_err(convert_err)?;

        if !res.status().is_success() {
            return Err(GatewayError::Http(res.status().as_u16()));
        }

        let payload = res.json::<Value>().await.map_err(convert_err)?;
        return Ok(payload);
    }

    async fn cleanup(&self, user_id: &str, session_id: &str) -> Result<CleanupResult, GatewayError> {
        let url = format!("{}/api/v1/boq/cleanup/{user_id}/{session_id}", self.url);

        let res = reqwest::Client::new()
            .delete(url)
            .timeout(Duration::from_secs(STATUS_TIMEOUT_SECS))
            .send()
            .await
            .map_err(convert_err)?;

        if !res.status().is_success() {
            return Err(GatewayError::Http(res.status().as_u16()));
        }

        let result = res.json::<CleanupResult>().await.map_err(convert_err)?;
        if !result.success {
            let message = result.error.unwrap_or_else(|| {
                return "Unknown error".to_string();
            });
            return Err(GatewayError::Backend(message));
        }

        return Ok(result);
    }

    async fn health_check(&self) -> bool {
        let timeout = self.health_check_timeout.parse::<u64>().unwrap_or(5000);

        let res = reqwest::Client::new()
            .get(format!("{}/", self.url))
            .timeout(Duration::from_millis(timeout))
            .send()
            .await;

        match res {
            Ok(res) => return res.status().is_success(),
            Err(err) => {
                tracing::debug!(error = ?err, "Backend health check failed");
                return false;
            }
        }
    }
}
