//! Calendar provider port (driven/secondary port)
//!
//! Interface for the external calendar service. The primary implementation
//! wraps the provider's REST API over HTTPS (see `praxis-calendar`), but the
//! trait is provider-agnostic.
//!
//! ## Design Notes
//!
//! - Errors carry a small closed taxonomy ([`ProviderError`]) because the
//!   engine branches on them: 401 forces re-authentication, 404 on fetch
//!   drives cancellation detection, everything transient is surfaced to the
//!   user without retry.
//! - `get_event` returns `Ok(None)` for an upstream deletion instead of an
//!   error; that outcome is expected and meaningful, not a failure.
//! - No retry/backoff is implemented behind this port: every operation is
//!   attempted exactly once per call. Batch callers iterate sequentially to
//!   stay inside the provider's implicit per-minute rate limits and to keep
//!   per-item error attribution unambiguous.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::event::{Attendee, EventTime, ExternalEvent};
use crate::domain::newtypes::EventId;

/// Failures surfaced by calendar provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The access credential was rejected (HTTP 401). The adapter has
    /// already invalidated the stored credential; the caller must prompt
    /// the user to reconnect, and batch callers abandon remaining items.
    #[error("Calendar credential expired or revoked")]
    AuthExpired,

    /// The event does not exist upstream (HTTP 404)
    #[error("Event {0} not found in the external calendar")]
    NotFound(EventId),

    /// Network failure or provider-side 5xx; the operation may be retried
    /// later by the user, never automatically
    #[error("Calendar service unavailable: {0}")]
    Transient(String),

    /// The provider answered with a payload this client cannot interpret
    #[error("Unexpected calendar response: {0}")]
    InvalidResponse(String),
}

/// Fields written when creating or updating an external event
///
/// This is a port-level DTO: it carries exactly what the engine publishes,
/// never the provider's full event shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub location: Option<String>,
    pub attendees: Vec<Attendee>,
}

/// Port trait for external calendar operations
///
/// ## Implementation Notes
///
/// - Implementations read the access token lazily through the injected
///   [`ICredentialProvider`](crate::ports::credentials::ICredentialProvider)
///   and must call `invalidate` on it before returning
///   [`ProviderError::AuthExpired`].
/// - `list_events` returns single occurrences expanded and ordered by start
///   time, as served by the provider.
#[async_trait::async_trait]
pub trait ICalendarProvider: Send + Sync {
    /// Lists events whose start falls within `[time_min, time_max]`
    ///
    /// The engine's default window is today through +30 days.
    async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<ExternalEvent>, ProviderError>;

    /// Fetches a single event by id
    ///
    /// Returns `Ok(None)` when the event was deleted upstream (HTTP 404);
    /// the cancellation sweep relies on this signal.
    async fn get_event(&self, id: &EventId) -> Result<Option<ExternalEvent>, ProviderError>;

    /// Creates an event and returns the provider's view of it
    async fn create_event(&self, draft: &EventDraft) -> Result<ExternalEvent, ProviderError>;

    /// Updates an existing event and returns the provider's view of it
    async fn update_event(
        &self,
        id: &EventId,
        draft: &EventDraft,
    ) -> Result<ExternalEvent, ProviderError>;

    /// Performs a cheap read to confirm the current credential is accepted
    ///
    /// Returns `false` (after invalidating the stored credential) when the
    /// provider rejects it; the caller should prompt for reconnection.
    async fn validate_credential(&self) -> Result<bool, ProviderError>;
}
