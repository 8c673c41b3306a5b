//! Single-event fetch/create/update tests

use chrono::{TimeZone, Utc};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use praxis_core::domain::event::EventTime;
use praxis_core::domain::newtypes::EventId;
use praxis_core::ports::calendar_provider::{EventDraft, ICalendarProvider, ProviderError};

use crate::common::{event_body, setup_provider};

fn draft(title: &str) -> EventDraft {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    EventDraft {
        title: title.to_string(),
        description: Some("weekly check-in".to_string()),
        start: EventTime::At(start),
        end: EventTime::At(start + chrono::Duration::hours(1)),
        location: Some("Room 2".to_string()),
        attendees: vec![],
    }
}

#[tokio::test]
async fn fetches_single_event() {
    let (server, provider, _) = setup_provider().await;

    Mock::given(method("GET"))
        .and(path("/events/evt_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_body(
            "evt_1",
            "2025-03-10T09:00:00Z",
            "2025-03-10T10:00:00Z",
        )))
        .mount(&server)
        .await;

    let event = provider
        .get_event(&EventId::new("evt_1").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.id.as_str(), "evt_1");
}

#[tokio::test]
async fn upstream_deletion_yields_none() {
    let (server, provider, _) = setup_provider().await;

    Mock::given(method("GET"))
        .and(path("/events/evt_gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = provider
        .get_event(&EventId::new("evt_gone").unwrap())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn creates_event_from_draft() {
    let (server, provider, _) = setup_provider().await;

    Mock::given(method("POST"))
        .and(path("/events"))
        .and(body_partial_json(serde_json::json!({
            "summary": "Session with Ana",
            "location": "Room 2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_body(
            "evt_new",
            "2025-03-10T09:00:00Z",
            "2025-03-10T10:00:00Z",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let created = provider.create_event(&draft("Session with Ana")).await.unwrap();
    assert_eq!(created.id.as_str(), "evt_new");
}

#[tokio::test]
async fn updates_existing_event() {
    let (server, provider, _) = setup_provider().await;

    Mock::given(method("PUT"))
        .and(path("/events/evt_1"))
        .and(body_partial_json(serde_json::json!({
            "summary": "Session with Ana (moved)"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_body(
            "evt_1",
            "2025-03-10T10:00:00Z",
            "2025-03-10T11:00:00Z",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let updated = provider
        .update_event(&EventId::new("evt_1").unwrap(), &draft("Session with Ana (moved)"))
        .await
        .unwrap();
    assert_eq!(updated.id.as_str(), "evt_1");
}

#[tokio::test]
async fn update_of_deleted_event_maps_to_not_found() {
    let (server, provider, _) = setup_provider().await;

    Mock::given(method("PUT"))
        .and(path("/events/evt_gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = provider
        .update_event(&EventId::new("evt_gone").unwrap(), &draft("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::NotFound(id) if id.as_str() == "evt_gone"));
}
