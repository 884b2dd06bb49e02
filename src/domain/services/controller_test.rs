use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use serde_json::Value;

use super::SessionController;
use super::DEFAULT_UPLOAD_MESSAGE;
use crate::domain::models::Attachment;
use crate::domain::models::Author;
use crate::domain::models::CleanupResult;
use crate::domain::models::Gateway;
use crate::domain::models::GatewayError;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::WorkflowMode;
use crate::domain::models::WorkflowRequest;

#[derive(Clone)]
struct CapturedRequest {
    user_text: String,
    attachment_count: usize,
    mode: WorkflowMode,
}

struct StubGateway {
    response: Result<Value, GatewayError>,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubGateway {
    fn new(response: Result<Value, GatewayError>) -> (StubGateway, Arc<Mutex<Vec<CapturedRequest>>>) {
        let captured = Arc::new(Mutex::new(vec![]));
        let gateway = StubGateway {
            response,
            captured: captured.clone(),
        };
        return (gateway, captured);
    }
}

#[async_trait]
impl Gateway for StubGateway {
    async fn send(&self, request: WorkflowRequest) -> Result<Value, GatewayError> {
        self.captured.lock().unwrap().push(CapturedRequest {
            user_text: request.user_text.to_string(),
            attachment_count: request.attachments.len(),
            mode: request.mode,
        });

        match &self.response {
            Ok(value) => return Ok(value.clone()),
            Err(GatewayError::Timeout) => return Err(GatewayError::Timeout),
            Err(err) => return Err(GatewayError::Transport(err.to_string())),
        }
    }

    async fn status(&self, _user_id: &str, _session_id: &str) -> Result<Value, GatewayError> {
        return Ok(json!({"success": true}));
    }

    async fn cleanup(&self, _user_id: &str, _session_id: &str) -> Result<CleanupResult, GatewayError> {
        return Ok(CleanupResult {
            success: true,
            deleted_files: vec!["a.pdf".to_string(), "b.pdf".to_string()],
            error: None,
        });
    }

    async fn health_check(&self) -> bool {
        return true;
    }
}

fn attachment() -> Attachment {
    return Attachment::new("plan.pdf", b"%PDF".to_vec(), "application/pdf");
}

#[tokio::test]
async fn it_appends_the_normalized_response() {
    let (gateway, _) = StubGateway::new(Ok(json!({
        "success": true,
        "workflow_responses": [{"content": "Found 3 rooms"}]
    })));
    let mut controller = SessionController::new(Box::new(gateway), WorkflowMode::Auto);

    let (message, _) = controller.submit("analyze the plan", true).await;

    assert_eq!(message.author, Author::Assistant);
    assert_eq!(message.text, "Found 3 rooms");
    assert_eq!(controller.transcript.messages().len(), 2);
    assert_eq!(controller.transcript.messages()[0].author, Author::User);
}

#[tokio::test]
async fn it_keeps_history_and_appends_an_error_entry_on_failure() {
    let (gateway, _) = StubGateway::new(Err(GatewayError::Timeout));
    let mut controller = SessionController::new(Box::new(gateway), WorkflowMode::Auto);
    controller.transcript.append(Message::new(Author::Assistant, "earlier answer"));

    let (message, _) = controller.submit("hello", true).await;

    assert_eq!(message.message_type(), MessageType::Error);
    assert_eq!(controller.transcript.messages().len(), 3);
    assert_eq!(controller.transcript.messages()[0].text, "earlier answer");
}

#[tokio::test]
async fn it_drops_attachments_in_chat_mode() {
    let (gateway, captured) = StubGateway::new(Ok(json!({"success": true})));
    let mut controller = SessionController::new(Box::new(gateway), WorkflowMode::Chat);
    controller.stage(attachment());

    let _ = controller.submit("just chatting", true).await;

    let requests = captured.lock().unwrap();
    assert_eq!(requests[0].attachment_count, 0);
    // Staged files stay put for a later non-chat send.
    assert_eq!(controller.staged.len(), 1);
}

#[tokio::test]
async fn it_sends_and_clears_staged_attachments() {
    let (gateway, captured) = StubGateway::new(Ok(json!({"success": true})));
    let mut controller = SessionController::new(Box::new(gateway), WorkflowMode::Auto);
    controller.stage(attachment());
    controller.stage(Attachment::new("site.png", b"png".to_vec(), "image/png"));

    let (_, sent_count) = controller.submit("analyze these", true).await;

    assert_eq!(sent_count, 2);
    assert_eq!(captured.lock().unwrap()[0].attachment_count, 2);
    assert!(controller.staged.is_empty());
}

#[tokio::test]
async fn it_uploads_with_the_default_message() {
    let (gateway, captured) = StubGateway::new(Ok(json!({"success": true})));
    let mut controller = SessionController::new(Box::new(gateway), WorkflowMode::Auto);
    controller.stage(attachment());

    let res = controller.upload().await;
    assert!(res.is_some());

    let requests = captured.lock().unwrap();
    assert_eq!(requests[0].user_text, DEFAULT_UPLOAD_MESSAGE);
    // Upload records no user entry, only the assistant response.
    assert_eq!(controller.transcript.messages().len(), 1);
    assert_eq!(controller.transcript.messages()[0].author, Author::Assistant);
}

#[tokio::test]
async fn it_skips_upload_without_staged_files() {
    let (gateway, captured) = StubGateway::new(Ok(json!({"success": true})));
    let mut controller = SessionController::new(Box::new(gateway), WorkflowMode::Auto);

    assert!(controller.upload().await.is_none());
    assert!(captured.lock().unwrap().is_empty());
}

#[tokio::test]
async fn it_clears_the_transcript_on_new_session_but_keeps_the_user() {
    let (gateway, _) = StubGateway::new(Ok(json!({"success": true})));
    let mut controller = SessionController::new(Box::new(gateway), WorkflowMode::Auto);
    let (user_before, session_before) = controller.identity.resolve("", "");
    controller.transcript.append(Message::new(Author::User, "hi"));

    let new_session = controller.new_session();

    assert!(controller.transcript.messages().is_empty());
    assert_ne!(new_session, session_before);
    let (user_after, _) = controller.identity.resolve("", "");
    assert_eq!(user_before, user_after);
}

#[tokio::test]
async fn it_clears_the_transcript_on_cleanup() {
    let (gateway, _) = StubGateway::new(Ok(json!({"success": true})));
    let mut controller = SessionController::new(Box::new(gateway), WorkflowMode::Auto);
    controller.transcript.append(Message::new(Author::User, "hi"));

    let deleted = controller.cleanup().await.unwrap();

    assert_eq!(deleted, 2);
    assert!(controller.transcript.messages().is_empty());
}

#[tokio::test]
async fn it_exports_the_latest_plan() {
    let (gateway, _) = StubGateway::new(Ok(json!({"success": true})));
    let mut controller = SessionController::new(Box::new(gateway), WorkflowMode::Auto);

    assert!(controller.export_plan().is_none());

    controller.transcript.append(Message::new(
        Author::Assistant,
        "{\"plan_summary\": {\"total_rooms\": 4}}",
    ));

    let bytes = controller.export_plan().unwrap().unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
