//! Conflict resolution executor
//!
//! Applies resolution strategies by performing the actual store and calendar
//! operations:
//! - `KeepLocal`: push the session's values over the external event
//! - `KeepExternal`: overwrite the session with the event's values
//! - `Merge`: apply chosen field values locally, pushing externally only
//!   when the schedule changed
//! - `Dismiss`: no operation here; the caller drops its in-memory entry
//!
//! The event is re-fetched at resolution time so the push or pull works from
//! the current upstream state, not the snapshot detection saw.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::{debug, info, warn};

use praxis_core::domain::conflict::{MergedFields, Resolution, SyncConflict};
use praxis_core::domain::event::{EventTime, ExternalEvent};
use praxis_core::domain::newtypes::SessionId;
use praxis_core::domain::session::{Session, SyncType};
use praxis_core::ports::calendar_provider::{EventDraft, ICalendarProvider, ProviderError};
use praxis_core::ports::session_store::ISessionStore;

use crate::error::ConflictError;

/// Result of a batch resolution operation
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub resolved: u32,
    pub failed: u32,
    /// Session ids whose conflicts were successfully resolved
    pub resolved_ids: Vec<SessionId>,
    /// Upstream event states fetched or rewritten while resolving, so the
    /// caller can refresh its loaded window without another listing
    pub updated_events: Vec<ExternalEvent>,
    pub errors: Vec<String>,
    /// True when the batch stopped early on credential expiry
    pub aborted: bool,
}

/// Session and upstream event state after a resolution was applied
#[derive(Debug, Clone)]
pub struct AppliedResolution {
    pub session: Session,
    /// The event's current upstream state, when the resolution fetched or
    /// rewrote it. `None` for dismissal and for merges that stayed local.
    pub event: Option<ExternalEvent>,
}

/// Applies conflict resolutions through the calendar and store ports
pub struct ConflictResolver {
    provider: Arc<dyn ICalendarProvider>,
    sessions: Arc<dyn ISessionStore>,
    /// Fallback event duration when the external side carries no timed span
    default_session_minutes: u32,
}

impl ConflictResolver {
    pub fn new(
        provider: Arc<dyn ICalendarProvider>,
        sessions: Arc<dyn ISessionStore>,
        default_session_minutes: u32,
    ) -> Self {
        Self {
            provider,
            sessions,
            default_session_minutes,
        }
    }

    /// Applies a resolution to a detected conflict
    ///
    /// Returns the updated session together with the event's upstream state
    /// where the resolution touched it. `Dismiss` performs no operation and
    /// returns the session unchanged.
    pub async fn apply(
        &self,
        conflict: &SyncConflict,
        resolution: Resolution,
    ) -> Result<AppliedResolution, ConflictError> {
        info!(
            conflict_id = %conflict.id(),
            session_id = %conflict.session_id(),
            resolution = %resolution,
            "Applying conflict resolution"
        );

        let mut session = self
            .sessions
            .get(conflict.session_id())
            .await
            .map_err(|e| ConflictError::Store(e.to_string()))?
            .ok_or(ConflictError::SessionNotFound(conflict.session_id()))?;

        if session.sync_type() != SyncType::Mirrored {
            return Err(ConflictError::NotMirrored(session.id()));
        }

        let event = match resolution {
            Resolution::KeepLocal => {
                let event = self.fetch_current(conflict).await?;
                let pushed = self.push_session(&session, &event).await?;
                session.touch_synced(pushed.updated);
                self.save(&session).await?;
                Some(pushed)
            }
            Resolution::KeepExternal => {
                let event = self.fetch_current(conflict).await?;
                session.apply_event_fields(&event, event.updated);
                self.save(&session).await?;
                Some(event)
            }
            Resolution::Merge(fields) => {
                self.apply_merge(&mut session, conflict, fields).await?
            }
            Resolution::Dismiss => {
                debug!(conflict_id = %conflict.id(), "Conflict dismissed without changes");
                None
            }
        };

        Ok(AppliedResolution { session, event })
    }

    /// Resolves many conflicts with one strategy
    ///
    /// Only `KeepLocal` and `KeepExternal` are accepted; a merge needs
    /// per-conflict field choices and dismissal is an in-memory drop the
    /// caller performs itself. Items are processed sequentially; a failed
    /// item is recorded and the batch continues, except credential expiry,
    /// which abandons the remaining items.
    pub async fn resolve_batch(
        &self,
        conflicts: &[SyncConflict],
        resolution: Resolution,
    ) -> Result<BatchResult, ConflictError> {
        if !matches!(resolution, Resolution::KeepLocal | Resolution::KeepExternal) {
            return Err(ConflictError::BulkMergeUnsupported);
        }

        let mut result = BatchResult::default();
        for conflict in conflicts {
            match self.apply(conflict, resolution.clone()).await {
                Ok(applied) => {
                    result.resolved += 1;
                    result.resolved_ids.push(conflict.session_id());
                    if let Some(event) = applied.event {
                        result.updated_events.push(event);
                    }
                }
                Err(e) => {
                    warn!(
                        conflict_id = %conflict.id(),
                        error = %e,
                        "Batch resolution failed for conflict"
                    );
                    result.failed += 1;
                    result.errors.push(e.to_string());
                    if matches!(e, ConflictError::Provider(ProviderError::AuthExpired)) {
                        result.aborted = true;
                        break;
                    }
                }
            }
        }
        Ok(result)
    }

    /// Re-fetches the conflicting event; its absence makes the conflict stale
    async fn fetch_current(&self, conflict: &SyncConflict) -> Result<ExternalEvent, ConflictError> {
        self.provider
            .get_event(conflict.event_id())
            .await?
            .ok_or_else(|| ConflictError::StaleConflict(conflict.event_id().clone()))
    }

    /// Pushes the session's tracked fields over the external event
    ///
    /// The event keeps its own title; the duration is preserved from its
    /// current timed span, falling back to the configured default.
    async fn push_session(
        &self,
        session: &Session,
        event: &ExternalEvent,
    ) -> Result<ExternalEvent, ConflictError> {
        let start = session_start(session);
        let draft = EventDraft {
            title: event.title.clone(),
            description: session.notes().map(str::to_string),
            start: EventTime::At(start),
            end: EventTime::At(start + self.event_duration(event)),
            location: session.location().map(str::to_string),
            attendees: session.attendees().to_vec(),
        };
        Ok(self.provider.update_event(&event.id, &draft).await?)
    }

    async fn apply_merge(
        &self,
        session: &mut Session,
        conflict: &SyncConflict,
        fields: MergedFields,
    ) -> Result<Option<ExternalEvent>, ConflictError> {
        let schedule_changed = fields.changes_schedule();
        let date = fields.date.unwrap_or_else(|| session.date());
        let time = fields.time.unwrap_or_else(|| session.time());
        session.set_schedule(date, time);
        if let Some(description) = fields.description {
            session.set_notes(Some(description));
        }
        if let Some(location) = fields.location {
            session.set_location(Some(location));
        }

        let pushed = if schedule_changed {
            let event = self.fetch_current(conflict).await?;
            let pushed = self.push_session(session, &event).await?;
            session.touch_synced(pushed.updated);
            Some(pushed)
        } else {
            session.touch_synced(Utc::now());
            None
        };
        self.save(session).await?;
        Ok(pushed)
    }

    async fn save(&self, session: &Session) -> Result<(), ConflictError> {
        self.sessions
            .update(session)
            .await
            .map_err(|e| ConflictError::Store(e.to_string()))
    }

    fn event_duration(&self, event: &ExternalEvent) -> Duration {
        match (event.start, event.end) {
            (EventTime::At(start), EventTime::At(end)) if end > start => end - start,
            _ => Duration::minutes(i64::from(self.default_session_minutes)),
        }
    }
}

fn session_start(session: &Session) -> DateTime<Utc> {
    Utc.from_utc_datetime(&session.date().and_time(session.time()))
}
