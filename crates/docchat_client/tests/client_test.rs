//! Integration tests for DocChatClient against a mock service

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use docchat_client::{ApiError, ChatRequest, Config, DocChatApi, DocChatClient};
use docchat_core::{DocumentId, FileCandidate, Source};
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> DocChatClient {
    let mut config = Config::default();
    config.api_base = server.uri();
    DocChatClient::new(config).expect("client")
}

fn report_pdf() -> FileCandidate {
    FileCandidate::new("report.pdf", "application/pdf", b"%PDF-1.7 test".to_vec())
}

#[tokio::test]
async fn test_upload_sends_multipart_file_field() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"report.pdf\""))
        .and(body_string_contains("%PDF-1.7 test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documentId": "doc_123",
            "message": "File processed successfully"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let receipt = client_for(&mock_server).upload(&report_pdf()).await.unwrap();
    assert_eq!(receipt.document_id.as_str(), "doc_123");
    assert_eq!(receipt.message.as_deref(), Some("File processed successfully"));
}

#[tokio::test]
async fn test_upload_without_document_id_is_protocol_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "ok" })),
        )
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).upload(&report_pdf()).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingField("documentId")));
    assert!(err.is_protocol());
}

#[tokio::test]
async fn test_upload_server_error_is_transport_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": "Only PDF files are allowed"
        })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).upload(&report_pdf()).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
}

#[tokio::test]
async fn test_chat_round_trip() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(serde_json::json!({
            "message": "What is the refund policy?",
            "documentId": "doc_123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Refunds are allowed within 30 days.",
            "sources": [{ "text": "Section 4.2", "page": 12 }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = ChatRequest::new("What is the refund policy?", DocumentId::parse("doc_123"));
    let reply = client_for(&mock_server).chat(&request).await.unwrap();
    assert_eq!(reply.message, "Refunds are allowed within 30 days.");
    assert_eq!(
        reply.sources,
        vec![Source::new("Section 4.2", NonZeroU32::new(12).unwrap())]
    );
}

#[tokio::test]
async fn test_chat_without_sources_defaults_to_empty() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "Hello" })),
        )
        .mount(&mock_server)
        .await;

    let reply = client_for(&mock_server)
        .chat(&ChatRequest::new("hi", None))
        .await
        .unwrap();
    assert_eq!(reply.message, "Hello");
    assert!(reply.sources.is_empty());
}

#[tokio::test]
async fn test_chat_missing_message_is_protocol_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sources": []
        })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .chat(&ChatRequest::new("hi", None))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

/// Chat requests are retried on transient failures when retries are enabled
#[tokio::test]
async fn test_chat_retry_on_server_error() {
    let mock_server = MockServer::start().await;
    let request_count = Arc::new(AtomicUsize::new(0));
    let counter = request_count.clone();

    // Mock that fails twice then succeeds
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(move |_req: &wiremock::Request| {
            let count = counter.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                ResponseTemplate::new(503)
            } else {
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "message": "Hello!" }))
            }
        })
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.api_base = mock_server.uri();
    config.max_retries = 2;
    let client = DocChatClient::new(config).unwrap();

    let reply = client.chat(&ChatRequest::new("hi", None)).await.unwrap();
    assert_eq!(reply.message, "Hello!");
    assert_eq!(request_count.load(Ordering::SeqCst), 3);
}

/// With the default configuration failures surface immediately
#[tokio::test]
async fn test_no_retry_by_default() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .chat(&ChatRequest::new("hi", None))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { .. }));
}

#[tokio::test]
async fn test_list_and_delete_documents() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "doc_123", "name": "doc_123.pdf", "created_at": 1700000000.0 }
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/documents/doc_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Document deleted successfully"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/documents/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let documents = client.list_documents().await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, "doc_123");

    client
        .delete_document(&DocumentId::parse("doc_123").unwrap())
        .await
        .unwrap();
    let err = client
        .delete_document(&DocumentId::parse("missing").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let mut config = Config::default();
    config.api_base = "http://127.0.0.1:1".to_string();
    let client = DocChatClient::new(config).unwrap();

    let err = client.chat(&ChatRequest::new("hi", None)).await.unwrap_err();
    assert!(err.is_transport());
}
