//! Session domain entity
//!
//! A `Session` is a practice appointment owned by the platform. It may be
//! linked to at most one event in the external calendar service; the
//! [`SyncType`] state machine encodes that relationship.
//!
//! ## State Machine
//!
//! ```text
//!            import (read-only)
//!    ┌────────────────────────────► Imported ──────┐
//!    │                                  │          │
//!    │           mirror                 │ mirror   │ sweep
//!  None ────────────────────────────► Mirrored ────┤ (404 or external
//!    │                                             │  status=cancelled)
//!    │           send                              │
//!    └────────────────────────────►  Sent ─────────┤
//!                                                  ▼
//!                                              Cancelled (terminal)
//! ```
//!
//! "Import as independent copy" intentionally has no edge: the copy never
//! receives a sync type and stays invisible to the engine.
//!
//! Invariant: any sync type other than `None` requires a linked external
//! event id. Cancellation retains the id for traceability.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::DomainError;
use super::event::{Attendee, EventTime, ExternalEvent};
use super::newtypes::{ClientId, EventId, PackageId, RecurrenceId, SessionId};

// ============================================================================
// SyncType state machine
// ============================================================================

/// The synchronization relationship between a session and its external event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncType {
    /// Purely local session; the engine never touches it
    None,
    /// Created from an external event, read-only from the platform side
    /// except for payment metadata
    Imported,
    /// Kept in two-way sync; divergence is reconciled or flagged as conflict
    Mirrored,
    /// Published one-way from the platform to the external calendar
    Sent,
    /// The external counterpart was deleted or cancelled upstream; terminal
    Cancelled,
}

impl SyncType {
    /// Returns true if the transition from `self` to `to` is declared
    ///
    /// Self-transitions are always allowed so that synced-field refreshes can
    /// rewrite a session without special-casing. `Imported -> Mirrored` is
    /// the upgrade path taken when a user mirrors an already-imported
    /// session. `Cancelled` is terminal for this engine; reactivation is a
    /// CRUD action outside it.
    #[must_use]
    pub fn can_transition_to(self, to: SyncType) -> bool {
        use SyncType::*;
        if self == to {
            return true;
        }
        matches!(
            (self, to),
            (None, Imported)
                | (None, Mirrored)
                | (None, Sent)
                | (Imported, Mirrored)
                | (Imported, Cancelled)
                | (Mirrored, Cancelled)
                | (Sent, Cancelled)
        )
    }

    /// Stable lower-case name, matching the serde representation
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SyncType::None => "none",
            SyncType::Imported => "imported",
            SyncType::Mirrored => "mirrored",
            SyncType::Sent => "sent",
            SyncType::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SyncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The session's own business status, distinct from its sync relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

// ============================================================================
// Session entity
// ============================================================================

/// A practice appointment owned by the platform
///
/// Fields are private; all mutation goes through methods that enforce the
/// sync-type transition table and the linking invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    client_id: ClientId,
    date: NaiveDate,
    time: NaiveTime,
    status: SessionStatus,
    /// Monetary value in integer cents
    value_cents: i64,
    notes: Option<String>,
    package_id: Option<PackageId>,
    sync_type: SyncType,
    event_id: Option<EventId>,
    event_url: Option<String>,
    /// Snapshot of the external event's attendee list at last sync
    attendees: Vec<Attendee>,
    /// Snapshot of the external event's location at last sync
    location: Option<String>,
    recurrence_id: Option<RecurrenceId>,
    last_synced: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a purely local session (sync type `None`)
    pub fn new(client_id: ClientId, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            id: SessionId::new(),
            client_id,
            date,
            time,
            status: SessionStatus::Scheduled,
            value_cents: 0,
            notes: None,
            package_id: None,
            sync_type: SyncType::None,
            event_id: None,
            event_url: None,
            attendees: Vec::new(),
            location: None,
            recurrence_id: None,
            last_synced: None,
            created_at: Utc::now(),
        }
    }

    /// Creates a session imported (read-only) from an external event
    ///
    /// Copies the schedule, description, attendee/location snapshots and the
    /// provider link, sets `sync_type = imported`, and stamps `last_synced`.
    /// For timed events the session time is the event's start at minute
    /// granularity; all-day events default to midnight.
    pub fn imported_from(client_id: ClientId, event: &ExternalEvent, now: DateTime<Utc>) -> Self {
        let mut session = Self::copied_from(client_id, event);
        session.sync_type = SyncType::Imported;
        session.event_id = Some(event.id.clone());
        session.event_url = event.html_link.clone();
        session.attendees = event.attendees.clone();
        session.location = event.location.clone();
        session.recurrence_id = event.series_master_id();
        session.last_synced = Some(now);
        session
    }

    /// Creates an independent local copy of an external event
    ///
    /// No sync field is set: the result is indistinguishable from a session
    /// created by hand and will never again be touched by sync operations.
    pub fn copied_from(client_id: ClientId, event: &ExternalEvent) -> Self {
        let mut session = Self::new(client_id, event.start.date(), event_start_time(&event.start));
        session.notes = event.description.clone();
        session
    }

    // --- accessors ---

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn value_cents(&self) -> i64 {
        self.value_cents
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn package_id(&self) -> Option<PackageId> {
        self.package_id
    }

    pub fn sync_type(&self) -> SyncType {
        self.sync_type
    }

    pub fn event_id(&self) -> Option<&EventId> {
        self.event_id.as_ref()
    }

    pub fn event_url(&self) -> Option<&str> {
        self.event_url.as_deref()
    }

    pub fn attendees(&self) -> &[Attendee] {
        &self.attendees
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn recurrence_id(&self) -> Option<&RecurrenceId> {
        self.recurrence_id.as_ref()
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether this session is linked to an external event
    pub fn is_linked(&self) -> bool {
        self.event_id.is_some()
    }

    /// Whether the cancellation sweep should check this session
    pub fn sweep_eligible(&self) -> bool {
        self.event_id.is_some()
            && matches!(
                self.sync_type,
                SyncType::Imported | SyncType::Mirrored | SyncType::Sent
            )
    }

    // --- local edits (CRUD surface used by merge application) ---

    pub fn set_schedule(&mut self, date: NaiveDate, time: NaiveTime) {
        self.date = date;
        self.time = time;
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.location = location;
    }

    pub fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }

    pub fn set_value_cents(&mut self, cents: i64) {
        self.value_cents = cents;
    }

    pub fn set_package_id(&mut self, package_id: Option<PackageId>) {
        self.package_id = package_id;
    }

    pub fn set_recurrence_id(&mut self, recurrence_id: Option<RecurrenceId>) {
        self.recurrence_id = recurrence_id;
    }

    // --- sync mutations ---

    /// Links this session to an external event under the given sync type
    ///
    /// Used after `create_event` succeeds for mirror and send operations, and
    /// for the imported-to-mirrored upgrade.
    ///
    /// # Errors
    /// `DomainError::InvalidTransition` if the transition is not declared,
    /// `DomainError::AlreadyLinked` when the session is already linked to a
    /// different event.
    pub fn link(
        &mut self,
        sync_type: SyncType,
        event_id: EventId,
        event_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if matches!(sync_type, SyncType::None) {
            return Err(DomainError::ValidationFailed(
                "cannot link a session with sync type none".to_string(),
            ));
        }
        if let Some(existing) = &self.event_id {
            if *existing != event_id {
                return Err(DomainError::AlreadyLinked(existing.to_string()));
            }
        }
        self.transition_to(sync_type)?;
        self.event_id = Some(event_id);
        self.event_url = event_url;
        self.last_synced = Some(now);
        Ok(())
    }

    /// Marks the external counterpart as cancelled upstream
    ///
    /// The event id is retained for traceability; only `sync_type` and
    /// `last_synced` change.
    ///
    /// # Errors
    /// `DomainError::InvalidTransition` when the session is not in a synced
    /// state, `DomainError::MissingEventId` when it has no link.
    pub fn mark_sync_cancelled(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.event_id.is_none() {
            return Err(DomainError::MissingEventId(
                SyncType::Cancelled.name().to_string(),
            ));
        }
        self.transition_to(SyncType::Cancelled)?;
        self.last_synced = Some(now);
        Ok(())
    }

    /// Copies the tracked fields of an external event into this session
    ///
    /// Used when the external side wins: the reconciliation pull and the
    /// keep-external conflict resolution. All-day events leave the session
    /// time untouched. Stamps `last_synced` with the given instant.
    pub fn apply_event_fields(&mut self, event: &ExternalEvent, synced_at: DateTime<Utc>) {
        self.date = event.start.date();
        if let Some(time) = event.start.time_of_day() {
            self.time = time;
        }
        self.notes = event.description.clone();
        self.location = event.location.clone();
        self.attendees = event.attendees.clone();
        self.last_synced = Some(synced_at);
    }

    /// Refreshes the last-synced stamp without changing any other field
    pub fn touch_synced(&mut self, now: DateTime<Utc>) {
        self.last_synced = Some(now);
    }

    fn transition_to(&mut self, to: SyncType) -> Result<(), DomainError> {
        if !self.sync_type.can_transition_to(to) {
            return Err(DomainError::InvalidTransition {
                from: self.sync_type.name().to_string(),
                to: to.name().to_string(),
            });
        }
        self.sync_type = to;
        Ok(())
    }
}

fn event_start_time(start: &EventTime) -> NaiveTime {
    start
        .time_of_day()
        .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).expect("midnight is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventStatus;
    use chrono::TimeZone;

    fn event(id: &str) -> ExternalEvent {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        ExternalEvent {
            id: EventId::new(id).unwrap(),
            title: "Session".to_string(),
            description: Some("intake".to_string()),
            start: EventTime::At(start),
            end: EventTime::At(start + chrono::Duration::hours(1)),
            location: Some("Room 2".to_string()),
            attendees: vec![],
            recurrence: vec![],
            recurring_event_id: None,
            updated: start,
            status: EventStatus::Confirmed,
            html_link: Some("https://calendar.example.com/evt".to_string()),
        }
    }

    #[test]
    fn test_transition_table() {
        use SyncType::*;
        assert!(None.can_transition_to(Imported));
        assert!(None.can_transition_to(Mirrored));
        assert!(None.can_transition_to(Sent));
        assert!(Imported.can_transition_to(Mirrored));
        assert!(Imported.can_transition_to(Cancelled));
        assert!(Mirrored.can_transition_to(Cancelled));
        assert!(Sent.can_transition_to(Cancelled));
        // Self-transitions for field refresh
        assert!(Mirrored.can_transition_to(Mirrored));
        // Cancelled is terminal
        assert!(!Cancelled.can_transition_to(Mirrored));
        assert!(!Cancelled.can_transition_to(Imported));
        // No lateral moves
        assert!(!Sent.can_transition_to(Mirrored));
        assert!(!Mirrored.can_transition_to(Sent));
        assert!(!Imported.can_transition_to(Sent));
    }

    #[test]
    fn test_new_session_is_local() {
        let session = Session::new(
            ClientId::new(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        assert_eq!(session.sync_type(), SyncType::None);
        assert!(!session.is_linked());
        assert!(session.last_synced().is_none());
    }

    #[test]
    fn test_imported_from_copies_snapshots() {
        let now = Utc::now();
        let session = Session::imported_from(ClientId::new(), &event("evt_1"), now);
        assert_eq!(session.sync_type(), SyncType::Imported);
        assert_eq!(session.event_id().unwrap().as_str(), "evt_1");
        assert_eq!(session.location(), Some("Room 2"));
        assert_eq!(session.notes(), Some("intake"));
        assert_eq!(session.last_synced(), Some(now));
        assert_eq!(
            session.time(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_copied_from_has_no_sync_fields() {
        let session = Session::copied_from(ClientId::new(), &event("evt_1"));
        assert_eq!(session.sync_type(), SyncType::None);
        assert!(session.event_id().is_none());
        assert!(session.event_url().is_none());
        assert!(session.location().is_none());
        assert!(session.last_synced().is_none());
        // Schedule and description still carry over
        assert_eq!(session.notes(), Some("intake"));
        assert_eq!(
            session.date(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
    }

    #[test]
    fn test_link_rejects_undeclared_transition() {
        let now = Utc::now();
        let mut session = Session::imported_from(ClientId::new(), &event("evt_1"), now);
        session.mark_sync_cancelled(now).unwrap();

        let err = session
            .link(SyncType::Mirrored, EventId::new("evt_1").unwrap(), None, now)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[test]
    fn test_link_rejects_different_event_id() {
        let now = Utc::now();
        let mut session = Session::imported_from(ClientId::new(), &event("evt_1"), now);

        let err = session
            .link(SyncType::Mirrored, EventId::new("evt_2").unwrap(), None, now)
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyLinked(_)));
        // The failed link left the session untouched
        assert_eq!(session.sync_type(), SyncType::Imported);
        assert_eq!(session.event_id().unwrap().as_str(), "evt_1");
    }

    #[test]
    fn test_imported_upgrades_to_mirrored() {
        let now = Utc::now();
        let mut session = Session::imported_from(ClientId::new(), &event("evt_1"), now);
        session
            .link(
                SyncType::Mirrored,
                EventId::new("evt_1").unwrap(),
                None,
                now,
            )
            .unwrap();
        assert_eq!(session.sync_type(), SyncType::Mirrored);
    }

    #[test]
    fn test_cancellation_retains_event_id() {
        let now = Utc::now();
        let mut session = Session::imported_from(ClientId::new(), &event("evt_1"), now);
        let date = session.date();
        let notes = session.notes().map(str::to_string);

        let later = now + chrono::Duration::minutes(5);
        session.mark_sync_cancelled(later).unwrap();

        assert_eq!(session.sync_type(), SyncType::Cancelled);
        assert_eq!(session.event_id().unwrap().as_str(), "evt_1");
        assert_eq!(session.last_synced(), Some(later));
        // No other field changed
        assert_eq!(session.date(), date);
        assert_eq!(session.notes().map(str::to_string), notes);
    }

    #[test]
    fn test_cancellation_requires_link() {
        let mut session = Session::new(
            ClientId::new(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        let err = session.mark_sync_cancelled(Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::MissingEventId(_)));
    }

    #[test]
    fn test_apply_event_fields_all_day_keeps_time() {
        let now = Utc::now();
        let mut session = Session::imported_from(ClientId::new(), &event("evt_1"), now);
        let mut remote = event("evt_1");
        remote.start = EventTime::AllDay(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        remote.end = EventTime::AllDay(NaiveDate::from_ymd_opt(2025, 4, 2).unwrap());

        session.apply_event_fields(&remote, now);

        assert_eq!(session.date(), NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(session.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }
}
