//! Shared test helpers for calendar adapter integration tests
//!
//! Provides wiremock-based mock server setup for the provider's event API.
//! Helpers return the mock server together with a configured provider and
//! its in-memory credential store, so tests can assert invalidation.

use std::sync::Arc;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use praxis_calendar::{CalendarClient, CalendarProvider, MemoryCredentialProvider};

pub const TEST_TOKEN: &str = "test-access-token";

/// Builds a provider against a fresh mock server with a stored token.
pub async fn setup_provider() -> (MockServer, CalendarProvider, Arc<MemoryCredentialProvider>) {
    // A non-pooled server so dropping it actually closes the socket,
    // which the network-failure test relies on.
    let server = MockServer::builder().start().await;
    let credentials = Arc::new(MemoryCredentialProvider::with_token(TEST_TOKEN));
    let provider = CalendarProvider::new(CalendarClient::new(server.uri()), credentials.clone());
    (server, provider, credentials)
}

/// A timed event body in the provider's wire format.
pub fn event_body(id: &str, start: &str, end: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "summary": "Session with Ana",
        "status": "confirmed",
        "start": {"dateTime": start},
        "end": {"dateTime": end},
        "updated": "2025-03-01T12:00:00Z",
        "htmlLink": format!("https://calendar.example.com/{id}")
    })
}

/// Mounts `GET /events` returning the given items, requiring bearer auth.
pub async fn mount_listing(server: &MockServer, items: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": items
        })))
        .mount(server)
        .await;
}
