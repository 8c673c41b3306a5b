//! Listing-window tests: happy path, query parameters, and error mapping

use chrono::{TimeZone, Utc};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use praxis_core::ports::calendar_provider::{ICalendarProvider, ProviderError};

use crate::common::{event_body, mount_listing, setup_provider};

fn window() -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    let min = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    (min, min + chrono::Duration::days(30))
}

#[tokio::test]
async fn lists_events_in_window() {
    let (server, provider, _) = setup_provider().await;
    mount_listing(
        &server,
        serde_json::json!([
            event_body("evt_1", "2025-03-10T09:00:00Z", "2025-03-10T10:00:00Z"),
            event_body("evt_2", "2025-03-11T14:00:00Z", "2025-03-11T15:00:00Z"),
        ]),
    )
    .await;

    let (min, max) = window();
    let events = provider.list_events(min, max).await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id.as_str(), "evt_1");
    assert_eq!(events[1].id.as_str(), "evt_2");
    assert_eq!(events[0].title, "Session with Ana");
}

#[tokio::test]
async fn listing_requests_expanded_ordered_occurrences() {
    let (server, provider, _) = setup_provider().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("singleEvents", "true"))
        .and(query_param("orderBy", "startTime"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (min, max) = window();
    let events = provider.list_events(min, max).await.unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn empty_listing_body_tolerated() {
    let (server, provider, _) = setup_provider().await;

    // Some providers omit `items` entirely when the window is empty
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let (min, max) = window();
    assert!(provider.list_events(min, max).await.unwrap().is_empty());
}

#[tokio::test]
async fn server_error_maps_to_transient() {
    let (server, provider, _) = setup_provider().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (min, max) = window();
    let err = provider.list_events(min, max).await.unwrap_err();
    assert!(matches!(err, ProviderError::Transient(_)));
}

#[tokio::test]
async fn network_failure_maps_to_transient() {
    let (server, provider, _) = setup_provider().await;
    // Shutting the server down turns the next call into a connection error
    drop(server);

    let (min, max) = window();
    let err = provider.list_events(min, max).await.unwrap_err();
    assert!(matches!(err, ProviderError::Transient(_)));
}
