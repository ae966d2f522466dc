use axum::http::StatusCode;
use axum_test::TestServer;
use moments::email::{EmailConfig, EmailProviderConfig, LogConfig};
use moments::storage::MemoryStore;
use moments::{AppState, Config, ContactConfig, build_router};
use serde_json::{Value, json};
use std::sync::Arc;

fn server(contact: Option<ContactConfig>) -> TestServer {
    let mut config = Config::default();
    config.gallery.load_delay_ms = 0;
    config.contact = contact;
    let state = AppState::with_store(config, Arc::new(MemoryStore::new())).unwrap();
    TestServer::new(build_router(state)).unwrap()
}

fn contact_config() -> ContactConfig {
    ContactConfig {
        recipient: "events@example.com".to_string(),
        email: EmailConfig {
            from_address: "noreply@example.com".to_string(),
            from_name: Some("Majestic Moments".to_string()),
            provider: EmailProviderConfig::Log(LogConfig::default()),
        },
    }
}

#[tokio::test]
async fn test_valid_enquiry_is_accepted() {
    let server = server(Some(contact_config()));

    let response = server
        .post("/api/contact")
        .json(&json!({
            "name": "Ravi",
            "email": "ravi@example.com",
            "phone": "555-0100",
            "eventType": "birthday",
            "eventDate": "2025-02-14",
            "message": "A surprise party for 40 guests."
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_invalid_enquiry_lists_every_field() {
    let server = server(Some(contact_config()));

    let response = server
        .post("/api/contact")
        .json(&json!({ "name": " ", "email": "ravi-at-example", "message": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|error| error["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "message"]);
    assert_eq!(body["errors"][1]["code"], "invalid-email");
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() {
    let server = server(Some(contact_config()));

    server
        .post("/api/contact")
        .json(&json!({ "name": "Ravi", "email": "ravi@example.com", "eventType": "gala" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unconfigured_contact_is_unavailable() {
    let server = server(None);

    server
        .post("/api/contact")
        .json(&json!({ "name": "Ravi", "email": "ravi@example.com", "message": "Hi" }))
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_delivery_failure_is_bad_gateway() {
    let mut config = contact_config();
    config.recipient = String::new();
    let server = server(Some(config));

    let response = server
        .post("/api/contact")
        .json(&json!({ "name": "Ravi", "email": "ravi@example.com", "message": "Hi" }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
}
