//! Client behaviour that the vectors do not cover: exact wire bodies,
//! transport failures, and when configuration is checked.

mod common;

use std::error::Error as _;

use common::{client_with, RecordingTransport, API_KEY, BASE_URL};
use gracer_core::{ApiError, ChatMessage, ClientConfig, FileUpload, GracerClient, HttpMethod};

#[tokio::test]
async fn chat_sends_exact_body_and_bearer() {
    let transport = RecordingTransport::new();
    transport.reply(200, r#"{"text":"Hello"}"#);
    let client = client_with(&transport);

    client.ai().chat(&[ChatMessage::user("Hi")], None).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.url, "https://test.com/api/ai");
    assert_eq!(req.header("Authorization"), Some("Bearer test-api-key"));
    assert_eq!(
        req.body.as_ref().unwrap().as_json(),
        Some(r#"{"messages":[{"role":"user","content":"Hi"}]}"#)
    );
}

#[tokio::test]
async fn transport_failure_message_is_unchanged() {
    let transport = RecordingTransport::new();
    transport.fail("Network error");
    let client = client_with(&transport);

    let err = client
        .ai()
        .chat(&[ChatMessage::user("Hi")], None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Network error");
    assert_eq!(err.status(), None);
    assert!(matches!(err, ApiError::Request { source: Some(_), .. }));
    assert_eq!(err.source().unwrap().to_string(), "Network error");
}

#[tokio::test]
async fn missing_credential_fails_before_transport() {
    let transport = RecordingTransport::new();
    let client = GracerClient::builder()
        .base_address(BASE_URL)
        .shared_transport(transport.clone())
        .build();

    let err = client.ai().status().await.unwrap_err();
    assert!(err.is_configuration());
    let err = client.user().get_profile("test").await.unwrap_err();
    assert!(err.is_configuration());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn missing_base_address_fails_before_transport() {
    let transport = RecordingTransport::new();
    let client = GracerClient::builder()
        .credential(API_KEY)
        .shared_transport(transport.clone())
        .build();

    let err = client.file_manager().share_file("a.txt").await.unwrap_err();
    assert!(err.is_configuration());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn validation_is_reported_before_configuration() {
    let transport = RecordingTransport::new();
    let client = GracerClient::builder()
        .shared_transport(transport.clone())
        .build();

    let err = client.user().get_profile("").await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn default_origin_is_used_for_requests() {
    let transport = RecordingTransport::new();
    transport.reply(200, "{}");
    let client = GracerClient::builder()
        .config(ClientConfig::default().with_credential(API_KEY))
        .default_origin("http://localhost:8080")
        .shared_transport(transport.clone())
        .build();

    client.ai().status().await.unwrap();
    assert_eq!(transport.requests()[0].url, "http://localhost:8080/api/ai");
}

#[test]
fn unconfigured_client_has_empty_credential_and_supplied_origin() {
    let client = GracerClient::builder().default_origin("http://origin.test").build();
    assert_eq!(client.credential(), "");
    assert_eq!(client.base_address(), "http://origin.test");
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let transport = RecordingTransport::new();
    transport.reply(200, r#"{"n":1}"#);
    transport.reply(200, r#"{"n":2}"#);
    let client = client_with(&transport);

    let ai = client.ai();
    let user = client.user();
    let (a, b) = tokio::join!(ai.status(), user.get_profile("test"));
    let mut ns = vec![a.unwrap()["n"].as_u64().unwrap(), b.unwrap()["n"].as_u64().unwrap()];
    ns.sort();
    assert_eq!(ns, vec![1, 2]);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn upload_from_disk_sends_file_name_and_bytes() {
    let path = std::env::temp_dir().join(format!("gracer-client-{}.txt", std::process::id()));
    tokio::fs::write(&path, b"on disk").await.unwrap();
    let file = FileUpload::from_path(&path).await.unwrap();
    tokio::fs::remove_file(&path).await.unwrap();

    let transport = RecordingTransport::new();
    transport.reply(201, r#"{"message":"File uploaded successfully"}"#);
    let client = client_with(&transport);

    client
        .file_manager()
        .upload_file("test", file, Some("/docs"))
        .await
        .unwrap();

    let requests = transport.requests();
    let form = requests[0].body.as_ref().unwrap().as_multipart().unwrap();
    assert_eq!(form.file.bytes, b"on disk");
    assert_eq!(form.field("path"), Some("/docs"));
    assert_eq!(form.field("username"), Some("test"));
    assert_eq!(requests[0].header("Content-Type"), None);
}
