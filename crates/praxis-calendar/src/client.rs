//! External calendar HTTP client
//!
//! Typed `reqwest` client for the provider's event API. Handles bearer
//! authentication, endpoint construction, JSON (de)serialization of the wire
//! format, and mapping of HTTP outcomes into the [`ProviderError`] taxonomy.
//!
//! The client is deliberately retry-free: every operation is attempted once
//! per call, and batch callers iterate sequentially (see the port docs).

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use praxis_core::domain::event::{Attendee, EventStatus, EventTime, ExternalEvent};
use praxis_core::domain::newtypes::{Email, EventId, RecurrenceId};
use praxis_core::ports::calendar_provider::{EventDraft, ProviderError};

// ============================================================================
// Wire format
// ============================================================================

/// Event listing response: `GET /events`
#[derive(Debug, Deserialize)]
struct ListEventsResponse {
    #[serde(default)]
    items: Vec<WireEvent>,
}

/// An event as the provider serializes it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    id: String,
    summary: Option<String>,
    description: Option<String>,
    status: Option<String>,
    start: Option<WireTime>,
    end: Option<WireTime>,
    location: Option<String>,
    #[serde(default)]
    attendees: Vec<WireAttendee>,
    #[serde(default)]
    recurrence: Vec<String>,
    recurring_event_id: Option<String>,
    updated: Option<DateTime<Utc>>,
    html_link: Option<String>,
}

/// Start/end boundary: exactly one of `dateTime` (timed) or `date` (all-day)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAttendee {
    display_name: Option<String>,
    email: Option<String>,
}

/// The body sent on create/update: only the fields this engine publishes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireEventWrite {
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    start: WireTime,
    end: WireTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attendees: Vec<WireAttendee>,
}

impl From<&EventTime> for WireTime {
    fn from(value: &EventTime) -> Self {
        match value {
            EventTime::At(instant) => WireTime {
                date_time: Some(*instant),
                date: None,
            },
            EventTime::AllDay(date) => WireTime {
                date_time: None,
                date: Some(*date),
            },
        }
    }
}

impl TryFrom<&WireTime> for EventTime {
    type Error = ProviderError;

    fn try_from(value: &WireTime) -> Result<Self, Self::Error> {
        match (value.date_time, value.date) {
            (Some(instant), _) => Ok(EventTime::At(instant)),
            (None, Some(date)) => Ok(EventTime::AllDay(date)),
            (None, None) => Err(ProviderError::InvalidResponse(
                "event boundary has neither dateTime nor date".to_string(),
            )),
        }
    }
}

impl From<&EventDraft> for WireEventWrite {
    fn from(draft: &EventDraft) -> Self {
        Self {
            summary: draft.title.clone(),
            description: draft.description.clone(),
            start: (&draft.start).into(),
            end: (&draft.end).into(),
            location: draft.location.clone(),
            attendees: draft
                .attendees
                .iter()
                .map(|a| WireAttendee {
                    display_name: a.name.clone(),
                    email: a.email.as_ref().map(|e| e.as_str().to_string()),
                })
                .collect(),
        }
    }
}

impl TryFrom<WireEvent> for ExternalEvent {
    type Error = ProviderError;

    fn try_from(wire: WireEvent) -> Result<Self, Self::Error> {
        let id = EventId::new(wire.id)
            .map_err(|e| ProviderError::InvalidResponse(format!("bad event id: {e}")))?;

        let start = wire
            .start
            .as_ref()
            .ok_or_else(|| {
                ProviderError::InvalidResponse(format!("event {id} has no start"))
            })
            .and_then(EventTime::try_from)?;
        // Cancelled instances may come back without an end; fall back to start
        let end = match wire.end.as_ref() {
            Some(wire_end) => EventTime::try_from(wire_end)?,
            None => start,
        };

        let attendees = wire
            .attendees
            .into_iter()
            .map(|a| {
                // A malformed attendee email loses the address, not the event
                let email = a.email.and_then(|raw| match Email::new(&raw) {
                    Ok(email) => Some(email),
                    Err(_) => {
                        warn!(email = %raw, "Dropping unparseable attendee email");
                        None
                    }
                });
                Attendee::new(a.display_name, email)
            })
            .collect();

        let recurring_event_id = wire
            .recurring_event_id
            .filter(|s| !s.trim().is_empty())
            .map(RecurrenceId::new)
            .transpose()
            .map_err(|e| ProviderError::InvalidResponse(format!("bad recurrence id: {e}")))?;

        let status = match wire.status.as_deref() {
            Some("cancelled") => EventStatus::Cancelled,
            Some("tentative") => EventStatus::Tentative,
            _ => EventStatus::Confirmed,
        };

        Ok(ExternalEvent {
            id,
            title: wire.summary.unwrap_or_default(),
            description: wire.description,
            start,
            end,
            location: wire.location,
            attendees,
            recurrence: wire.recurrence,
            recurring_event_id,
            updated: wire.updated.unwrap_or_else(Utc::now),
            status,
            html_link: wire.html_link,
        })
    }
}

// ============================================================================
// CalendarClient
// ============================================================================

/// HTTP client for the external calendar API
///
/// Stateless with respect to credentials: every method takes the bearer
/// token as an argument, so the caller decides where tokens come from (see
/// [`CalendarProvider`](crate::provider::CalendarProvider)).
pub struct CalendarClient {
    client: Client,
    base_url: String,
}

impl CalendarClient {
    /// Creates a client against the given API base URL
    ///
    /// The base URL comes from configuration in production and from the mock
    /// server in tests.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the base URL this client targets
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url).bearer_auth(token)
    }

    /// Lists events whose start falls within the window
    ///
    /// Single occurrences are expanded and ordered by start time by the
    /// provider (`singleEvents=true&orderBy=startTime`).
    pub async fn list_events(
        &self,
        token: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<ExternalEvent>, ProviderError> {
        debug!(%time_min, %time_max, "Listing calendar events");

        let response = self
            .request(Method::GET, "/events", token)
            .query(&[
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response, None)?;
        let listing: ListEventsResponse = parse_json(response).await?;

        let mut events = Vec::with_capacity(listing.items.len());
        for wire in listing.items {
            events.push(ExternalEvent::try_from(wire)?);
        }
        debug!(count = events.len(), "Listed calendar events");
        Ok(events)
    }

    /// Fetches a single event; `Ok(None)` when it was deleted upstream
    pub async fn get_event(
        &self,
        token: &str,
        id: &EventId,
    ) -> Result<Option<ExternalEvent>, ProviderError> {
        let path = format!("/events/{}", id.as_str());
        debug!(event_id = %id, "Fetching calendar event");

        let response = self
            .request(Method::GET, &path, token)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(event_id = %id, "Event deleted upstream");
            return Ok(None);
        }

        let response = check_status(response, Some(id))?;
        let wire: WireEvent = parse_json(response).await?;
        Ok(Some(ExternalEvent::try_from(wire)?))
    }

    /// Creates an event and returns the provider's view of it
    pub async fn create_event(
        &self,
        token: &str,
        draft: &EventDraft,
    ) -> Result<ExternalEvent, ProviderError> {
        debug!(title = %draft.title, "Creating calendar event");

        let response = self
            .request(Method::POST, "/events", token)
            .json(&WireEventWrite::from(draft))
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response, None)?;
        let wire: WireEvent = parse_json(response).await?;
        ExternalEvent::try_from(wire)
    }

    /// Updates an event and returns the provider's view of it
    pub async fn update_event(
        &self,
        token: &str,
        id: &EventId,
        draft: &EventDraft,
    ) -> Result<ExternalEvent, ProviderError> {
        let path = format!("/events/{}", id.as_str());
        debug!(event_id = %id, "Updating calendar event");

        let response = self
            .request(Method::PUT, &path, token)
            .json(&WireEventWrite::from(draft))
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response, Some(id))?;
        let wire: WireEvent = parse_json(response).await?;
        ExternalEvent::try_from(wire)
    }

    /// Cheap read used to confirm the token is still accepted
    ///
    /// Returns `Err(AuthExpired)` on 401; the provider wrapper translates
    /// that into credential invalidation plus a `false` result.
    pub async fn probe(&self, token: &str) -> Result<(), ProviderError> {
        let response = self
            .request(Method::GET, "/events", token)
            .query(&[("maxResults", "1")])
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response, None)?;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    ProviderError::Transient(format!("transport failure: {err}"))
}

/// Maps non-success statuses into the provider error taxonomy
fn check_status(
    response: Response,
    event_id: Option<&EventId>,
) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::UNAUTHORIZED => Err(ProviderError::AuthExpired),
        StatusCode::NOT_FOUND => match event_id {
            Some(id) => Err(ProviderError::NotFound(id.clone())),
            None => Err(ProviderError::InvalidResponse(
                "unexpected 404 from collection endpoint".to_string(),
            )),
        },
        s if s.is_server_error() => Err(ProviderError::Transient(format!(
            "calendar service returned {s}"
        ))),
        s => Err(ProviderError::InvalidResponse(format!(
            "calendar service returned {s}"
        ))),
    }
}

async fn parse_json<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, ProviderError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::InvalidResponse(format!("malformed body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_event_deserialization() {
        let json = r#"{
            "id": "evt_1",
            "summary": "Session with Ana",
            "status": "confirmed",
            "start": {"dateTime": "2025-03-10T09:00:00Z"},
            "end": {"dateTime": "2025-03-10T10:00:00Z"},
            "attendees": [{"displayName": "Ana", "email": "ana@example.com"}],
            "recurringEventId": "master_1",
            "updated": "2025-03-01T12:00:00Z",
            "htmlLink": "https://calendar.example.com/evt_1"
        }"#;

        let wire: WireEvent = serde_json::from_str(json).unwrap();
        let event = ExternalEvent::try_from(wire).unwrap();

        assert_eq!(event.id.as_str(), "evt_1");
        assert_eq!(event.title, "Session with Ana");
        assert_eq!(event.status, EventStatus::Confirmed);
        assert_eq!(
            event.recurring_event_id.as_ref().unwrap().as_str(),
            "master_1"
        );
        assert_eq!(
            event.attendees[0].email.as_ref().unwrap().as_str(),
            "ana@example.com"
        );
        assert!(!event.start.is_all_day());
    }

    #[test]
    fn test_all_day_event_deserialization() {
        let json = r#"{
            "id": "evt_2",
            "summary": "Workshop",
            "start": {"date": "2025-03-15"},
            "end": {"date": "2025-03-16"}
        }"#;

        let wire: WireEvent = serde_json::from_str(json).unwrap();
        let event = ExternalEvent::try_from(wire).unwrap();
        assert!(event.start.is_all_day());
        assert_eq!(
            event.start.date(),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_event_without_start_is_invalid() {
        let json = r#"{"id": "evt_3", "summary": "broken"}"#;
        let wire: WireEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(
            ExternalEvent::try_from(wire),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_bad_attendee_email_is_dropped_not_fatal() {
        let json = r#"{
            "id": "evt_4",
            "start": {"dateTime": "2025-03-10T09:00:00Z"},
            "end": {"dateTime": "2025-03-10T10:00:00Z"},
            "attendees": [{"displayName": "Room 2", "email": "not-an-email"}]
        }"#;

        let wire: WireEvent = serde_json::from_str(json).unwrap();
        let event = ExternalEvent::try_from(wire).unwrap();
        assert_eq!(event.attendees.len(), 1);
        assert!(event.attendees[0].email.is_none());
    }

    #[test]
    fn test_cancelled_status_parsed() {
        let json = r#"{
            "id": "evt_5",
            "status": "cancelled",
            "start": {"dateTime": "2025-03-10T09:00:00Z"}
        }"#;

        let wire: WireEvent = serde_json::from_str(json).unwrap();
        let event = ExternalEvent::try_from(wire).unwrap();
        assert!(event.is_cancelled());
        // Missing end falls back to start
        assert_eq!(event.end, event.start);
    }

    #[test]
    fn test_draft_serialization_skips_empty_fields() {
        let draft = EventDraft {
            title: "Session".to_string(),
            description: None,
            start: EventTime::At("2025-03-10T09:00:00Z".parse().unwrap()),
            end: EventTime::At("2025-03-10T10:00:00Z".parse().unwrap()),
            location: None,
            attendees: vec![],
        };

        let json = serde_json::to_value(WireEventWrite::from(&draft)).unwrap();
        assert_eq!(json["summary"], "Session");
        assert!(json.get("description").is_none());
        assert!(json.get("location").is_none());
        assert!(json.get("attendees").is_none());
        assert_eq!(json["start"]["dateTime"], "2025-03-10T09:00:00Z");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CalendarClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
