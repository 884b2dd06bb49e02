#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

use anyhow::Result;
use serde_json::Value;

use super::export_pdf;
use super::normalize;
use super::Identity;
use super::Transcript;
use crate::domain::models::Attachment;
use crate::domain::models::Author;
use crate::domain::models::GatewayBox;
use crate::domain::models::GatewayError;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::WorkflowMode;
use crate::domain::models::WorkflowRequest;

/// Sent when files are uploaded without an accompanying message.
pub const DEFAULT_UPLOAD_MESSAGE: &str = "Please analyze these uploaded files";

/// Owns the session state (identifiers, transcript, staged files, mode) and
/// mutates it only through the documented operations. One user action maps
/// to at most one outstanding gateway call.
pub struct SessionController {
    gateway: GatewayBox,
    pub identity: Identity,
    pub transcript: Transcript,
    pub staged: Vec<Attachment>,
    pub mode: WorkflowMode,
}

impl SessionController {
    pub fn new(gateway: GatewayBox, mode: WorkflowMode) -> SessionController {
        return SessionController {
            gateway,
            identity: Identity::default(),
            transcript: Transcript::default(),
            staged: vec![],
            mode,
        };
    }

    /// Sends user text (plus staged attachments outside chat mode) and
    /// appends the normalized response, or an inline error entry, to the
    /// transcript. Returns the appended message and how many files were
    /// sent. Prior transcript history is never lost on failure.
    pub async fn submit(&mut self, text: &str, record_user: bool) -> (Message, usize) {
        if record_user {
            self.transcript.append(Message::new(Author::User, text));
        }

        let (user_id, session_id) = self.identity.resolve("", "");

        let attachments = if self.mode.allows_attachments() {
            self.staged.drain(..).collect::<Vec<Attachment>>()
        } else {
            vec![]
        };
        let sent_count = attachments.len();

        let request = WorkflowRequest::new(&user_id, &session_id, text, self.mode)
            .with_attachments(attachments);

        let message = match self.gateway.send(request).await {
            Ok(payload) => {
                let blocks = normalize(&payload);
                Message::new(Author::Assistant, &blocks.join("\n\n"))
            }
            Err(err) => Message::new_with_type(Author::Boqterm, MessageType::Error, &err.to_string()),
        };

        self.transcript.append(message.clone());
        return (message, sent_count);
    }

    /// Explicit file upload without a typed message. No user entry is
    /// recorded, matching the upload button behavior.
    pub async fn upload(&mut self) -> Option<(Message, usize)> {
        if self.staged.is_empty() {
            return None;
        }

        return Some(self.submit(DEFAULT_UPLOAD_MESSAGE, false).await);
    }

    pub fn stage(&mut self, attachment: Attachment) -> usize {
        self.staged.push(attachment);
        return self.staged.len();
    }

    pub fn clear_staged(&mut self) {
        self.staged.clear();
    }

    pub fn new_session(&mut self) -> String {
        let session_id = self.identity.new_session();
        self.transcript.clear();
        return session_id;
    }

    pub async fn status(&mut self) -> Result<Value, GatewayError> {
        let (user_id, session_id) = self.identity.resolve("", "");
        return self.gateway.status(&user_id, &session_id).await;
    }

    /// On success the transcript is cleared and the number of deleted
    /// server-side files is returned.
    pub async fn cleanup(&mut self) -> Result<usize, GatewayError> {
        let (user_id, session_id) = self.identity.resolve("", "");
        let result = self.gateway.cleanup(&user_id, &session_id).await?;
        self.transcript.clear();
        return Ok(result.deleted_files.len());
    }

    /// Exports the most recent plan in the transcript as PDF bytes, or
    /// `None` when no transcript entry parses as a plan.
    pub fn export_plan(&self) -> Option<Result<Vec<u8>>> {
        let plan = self.transcript.latest_plan()?;
        return Some(export_pdf(&plan));
    }

    pub async fn health_check(&self) -> bool {
        return self.gateway.health_check().await;
    }
}
