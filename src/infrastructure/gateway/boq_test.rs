use anyhow::Result;
use mockito::Matcher;
use serde_json::json;
use serde_json::Value;

use super::BoqGateway;
use super::DEFAULT_BOQ_INSTRUCTION;
use crate::domain::models::Attachment;
use crate::domain::models::Gateway;
use crate::domain::models::GatewayError;
use crate::domain::models::WorkflowMode;
use crate::domain::models::WorkflowRequest;

impl BoqGateway {
    fn with_url(url: String) -> BoqGateway {
        return BoqGateway {
            url,
            request_timeout: "30".to_string(),
            health_check_timeout: "200".to_string(),
        };
    }
}

#[tokio::test]
async fn it_successfully_health_checks() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/").with_status(200).create();

    let gateway = BoqGateway::with_url(server.url());
    assert!(gateway.health_check().await);
    mock.assert();
}

#[tokio::test]
async fn it_fails_health_checks() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/").with_status(500).create();

    let gateway = BoqGateway::with_url(server.url());
    assert!(!gateway.health_check().await);
    mock.assert();
}

#[tokio::test]
async fn it_routes_chat_requests_to_the_chat_endpoint() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v1/boq/chat")
        .match_body(Matcher::Regex("(?s).*user-1.*".to_string()))
        .with_status(200)
        .with_body("{\"success\": true, \"chat_responses\": [{\"content\": \"Hello\"}]}")
        .create();

    let gateway = BoqGateway::with_url(server.url());
    let request = WorkflowRequest::new("user-1", "session-1", "hi there", WorkflowMode::Chat);
    let payload = gateway.send(request).await?;

    mock.assert();
    assert_eq!(payload["chat_responses"][0]["content"], json!("Hello"));

    return Ok(());
}

#[tokio::test]
async fn it_substitutes_the_default_boq_instruction_for_empty_text() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v1/boq/generate-boq")
        .match_body(Matcher::Regex(format!("(?s).*{DEFAULT_BOQ_INSTRUCTION}.*")))
        .with_status(200)
        .with_body("{\"success\": true, \"boq_results\": []}")
        .create();

    let gateway = BoqGateway::with_url(server.url());
    let request = WorkflowRequest::new("user-1", "session-1", "  ", WorkflowMode::Boq);
    gateway.send(request).await?;

    mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_sends_attachments_with_filename_and_mime_type() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v1/boq/workflow")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("(?s).*filename=\"ground-floor.pdf\".*".to_string()),
            Matcher::Regex("(?s).*application/pdf.*".to_string()),
            Matcher::Regex("(?s).*analyze this.*".to_string()),
        ]))
        .with_status(200)
        .with_body("{\"success\": true, \"workflow_responses\": []}")
        .create();

    let gateway = BoqGateway::with_url(server.url());
    let attachment = Attachment::new("ground-floor.pdf", b"%PDF-1.4".to_vec(), "application/pdf");
    let request = WorkflowRequest::new("user-1", "session-1", "analyze this", WorkflowMode::Auto)
        .with_attachments(vec![attachment]);
    gateway.send(request).await?;

    mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_surfaces_backend_reported_errors_verbatim() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v1/boq/workflow")
        .with_status(200)
        .with_body("{\"success\": false, \"error\": \"file too large\"}")
        .create();

    let gateway = BoqGateway::with_url(server.url());
    let request = WorkflowRequest::new("user-1", "session-1", "hi", WorkflowMode::Auto);
    let err = gateway.send(request).await.unwrap_err();

    mock.assert();
    match err {
        GatewayError::Backend(message) => assert_eq!(message, "file too large"),
        other => panic!("Expected a backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn it_falls_back_to_unknown_error_without_a_message() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v1/boq/chat")
        .with_status(200)
        .with_body("{\"success\": false}")
        .create();

    let gateway = BoqGateway::with_url(server.url());
    let request = WorkflowRequest::new("user-1", "session-1", "hi", WorkflowMode::Chat);
    let err = gateway.send(request).await.unwrap_err();

    mock.assert();
    match err {
        GatewayError::Backend(message) => assert_eq!(message, "Unknown error"),
        other => panic!("Expected a backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn it_maps_http_failures() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v1/boq/workflow")
        .with_status(500)
        .create();

    let gateway = BoqGateway::with_url(server.url());
    let request = WorkflowRequest::new("user-1", "session-1", "hi", WorkflowMode::Auto);
    let err = gateway.send(request).await.unwrap_err();

    mock.assert();
    match err {
        GatewayError::Http(status) => assert_eq!(status, 500),
        other => panic!("Expected an HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn it_yields_null_for_malformed_response_bodies() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v1/boq/workflow")
        .with_status(200)
        .with_body("not json at all")
        .create();

    let gateway = BoqGateway::with_url(server.url());
    let request = WorkflowRequest::new("user-1", "session-1", "hi", WorkflowMode::Auto);
    let payload = gateway.send(request).await?;

    mock.assert();
    assert_eq!(payload, Value::Null);

    return Ok(());
}

#[tokio::test]
async fn it_fetches_session_status() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/v1/boq/status/user-1/session-1")
        .with_status(200)
        .with_body("{\"success\": true, \"files\": [\"plan.pdf\"]}")
        .create();

    let gateway = BoqGateway::with_url(server.url());
    let payload = gateway.status("user-1", "session-1").await?;

    mock.assert();
    assert_eq!(payload["files"][0], json!("plan.pdf"));

    return Ok(());
}

#[tokio::test]
async fn it_cleans_up_sessions() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("DELETE", "/api/v1/boq/cleanup/user-1/session-1")
        .with_status(200)
        .with_body("{\"success\": true, \"deleted_files\": [\"a.pdf\", \"b.pdf\"]}")
        .create();

    let gateway = BoqGateway::with_url(server.url());
    let result = gateway.cleanup("user-1", "session-1").await?;

    mock.assert();
    assert_eq!(result.deleted_files.len(), 2);

    return Ok(());
}

#[tokio::test]
async fn it_surfaces_cleanup_failures() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("DELETE", "/api/v1/boq/cleanup/user-1/session-1")
        .with_status(200)
        .with_body("{\"success\": false, \"error\": \"session not found\"}")
        .create();

    let gateway = BoqGateway::with_url(server.url());
    let err = gateway.cleanup("user-1", "session-1").await.unwrap_err();

    mock.assert();
    match err {
        GatewayError::Backend(message) => assert_eq!(message, "session not found"),
        other => panic!("Expected a backend error, got {other:?}"),
    }
}
