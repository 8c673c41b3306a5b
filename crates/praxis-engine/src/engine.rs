//! Sync orchestration facade
//!
//! The [`SyncEngine`] coordinates the calendar provider, the session and
//! client stores, the conflict subsystem, the ignore list, and the
//! notification sink.
//!
//! ## Sync Flow
//!
//! 1. **Refresh** (pull): list the event window, regroup series, recompute
//!    the pending list, rerun conflict detection when mirrored sessions exist
//! 2. **Actions**: import / copy / series import / mirror / send / ignore,
//!    singly or in sequential batches
//! 3. **Sweeps**: cancellation sweep (upstream deletions) and mirrored
//!    reconciliation (pull newer external edits, flag the rest as conflicts)
//!
//! ## Error Policy
//!
//! No retry or backoff: each external call is attempted once and failures
//! surface through the notification sink. Batch loops tolerate per-item
//! failures and abandon only on credential expiry. In-memory state (loaded
//! window, series map, conflict map) is held in concurrent maps so the
//! caller can read listings while an operation runs.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use dashmap::DashMap;
use tracing::{debug, info, warn};

use praxis_conflict::diff::schedule_differences;
use praxis_conflict::resolver::ConflictResolver;
use praxis_conflict::ConflictDetector;
use praxis_core::config::Config;
use praxis_core::domain::conflict::{Resolution, SyncConflict};
use praxis_core::domain::event::{EventTime, ExternalEvent};
use praxis_core::domain::newtypes::{ClientId, ConflictId, EventId, RecurrenceId, SessionId};
use praxis_core::domain::series::{group_series, RecurringSeries};
use praxis_core::domain::session::{Session, SyncType};
use praxis_core::ports::calendar_provider::{EventDraft, ICalendarProvider, ProviderError};
use praxis_core::ports::client_store::{ClientRecord, IClientStore};
use praxis_core::ports::ignore_list::IIgnoreList;
use praxis_core::ports::notification::{INotificationSink, Notification};
use praxis_core::ports::session_store::{ISessionStore, SessionFilter};

use crate::error::EngineError;
use crate::report::{BatchOutcome, ReconcileSummary, RefreshSummary, SweepSummary};

/// Bidirectional synchronization engine
///
/// ## Dependencies
///
/// - `provider`: external calendar operations (list, fetch, create, update)
/// - `sessions` / `clients`: the host application's record stores
/// - `ignore_list`: device-local set of hidden external event ids
/// - `notifications`: user-visible outcome delivery
pub struct SyncEngine {
    provider: Arc<dyn ICalendarProvider>,
    sessions: Arc<dyn ISessionStore>,
    clients: Arc<dyn IClientStore>,
    ignore_list: Arc<dyn IIgnoreList>,
    notifications: Arc<dyn INotificationSink>,
    detector: ConflictDetector,
    resolver: ConflictResolver,
    lookahead_days: u32,
    default_session_minutes: u32,
    notifications_enabled: bool,
    /// Events of the currently loaded listing window, keyed by event id
    events: DashMap<EventId, ExternalEvent>,
    /// Recurring series grouped from the loaded window
    series: DashMap<RecurrenceId, RecurringSeries>,
    /// Currently detected conflicts, at most one per mirrored session
    conflicts: DashMap<SessionId, SyncConflict>,
}

impl SyncEngine {
    pub fn new(
        provider: Arc<dyn ICalendarProvider>,
        sessions: Arc<dyn ISessionStore>,
        clients: Arc<dyn IClientStore>,
        ignore_list: Arc<dyn IIgnoreList>,
        notifications: Arc<dyn INotificationSink>,
        config: &Config,
    ) -> Self {
        let resolver = ConflictResolver::new(
            Arc::clone(&provider),
            Arc::clone(&sessions),
            config.sync.default_session_minutes,
        );
        Self {
            provider,
            sessions,
            clients,
            ignore_list,
            notifications,
            detector: ConflictDetector::new(),
            resolver,
            lookahead_days: config.sync.lookahead_days,
            default_session_minutes: config.sync.default_session_minutes,
            notifications_enabled: config.notifications.enabled,
            events: DashMap::new(),
            series: DashMap::new(),
            conflicts: DashMap::new(),
        }
    }

    // ========================================================================
    // Refresh and listings
    // ========================================================================

    /// Reloads the event window and recomputes the derived views
    ///
    /// Lists events for `[now, now + lookahead_days]`, regroups recurring
    /// series, recomputes the pending list, and reruns conflict detection
    /// when at least one mirrored session exists.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self, now: DateTime<Utc>) -> Result<RefreshSummary, EngineError> {
        let window_end = now + Duration::days(i64::from(self.lookahead_days));
        let listing = match self.provider.list_events(now, window_end).await {
            Ok(listing) => listing,
            Err(e) => {
                self.notify_provider_failure("Calendar refresh failed", &e)
                    .await;
                return Err(e.into());
            }
        };

        self.events.clear();
        for event in &listing {
            self.events.insert(event.id.clone(), event.clone());
        }

        self.series.clear();
        for (master_id, series) in group_series(&listing) {
            self.series.insert(master_id, series);
        }

        let pending = self.pending_events().await?.len();

        let mirrored = self
            .sessions
            .query(&SessionFilter::new().with_sync_types([SyncType::Mirrored]))
            .await
            .map_err(store_err)?;
        let conflicts = if mirrored.is_empty() {
            self.conflicts.clear();
            0
        } else {
            self.run_detection(&mirrored).await.len()
        };

        let summary = RefreshSummary {
            events: listing.len(),
            series: self.series.len(),
            pending,
            conflicts,
        };
        info!(
            events = summary.events,
            series = summary.series,
            pending = summary.pending,
            conflicts = summary.conflicts,
            "Calendar window refreshed"
        );
        Ok(summary)
    }

    /// The importable events of the loaded window
    ///
    /// Excludes ignored ids, ids already linked to a session, and events the
    /// provider reports as cancelled. Ordered by start.
    pub async fn pending_events(&self) -> Result<Vec<ExternalEvent>, EngineError> {
        let linked = self
            .sessions
            .query(&SessionFilter::new().with_linked(true))
            .await
            .map_err(store_err)?;
        let linked_ids: HashSet<EventId> = linked
            .iter()
            .filter_map(|s| s.event_id().cloned())
            .collect();
        let ignored: HashSet<EventId> = self
            .ignore_list
            .all()
            .await
            .map_err(store_err)?
            .into_iter()
            .collect();

        let mut pending: Vec<ExternalEvent> = self
            .events
            .iter()
            .filter(|entry| {
                let event = entry.value();
                !event.is_cancelled()
                    && !linked_ids.contains(&event.id)
                    && !ignored.contains(&event.id)
            })
            .map(|entry| entry.value().clone())
            .collect();
        pending.sort_by_key(|e| (e.start.date(), e.start.time_of_day()));
        Ok(pending)
    }

    /// The recurring series grouped from the loaded window
    pub fn loaded_series(&self) -> Vec<RecurringSeries> {
        self.series.iter().map(|e| e.value().clone()).collect()
    }

    // ========================================================================
    // Single-item operations
    // ========================================================================

    /// Imports an event as a read-only session
    ///
    /// Resolves or creates the client from the first attendee carrying an
    /// email, falling back to a placeholder named from the event title.
    pub async fn import_event(&self, event_id: &EventId) -> Result<Session, EngineError> {
        let event = self.loaded_event(event_id)?;
        let client_id = self.resolve_client(&event).await?;
        let session = Session::imported_from(client_id, &event, Utc::now());
        self.sessions.insert(&session).await.map_err(store_err)?;

        debug!(session_id = %session.id(), event_id = %event_id.as_str(), "Event imported");
        self.notify(Notification::success(
            "Event imported",
            format!("\"{}\" was imported as a session", event.title),
        ))
        .await;
        Ok(session)
    }

    /// Imports an event as an independent local copy
    ///
    /// The resulting session carries no sync fields and is never again
    /// touched by sync operations.
    pub async fn import_copy(&self, event_id: &EventId) -> Result<Session, EngineError> {
        let event = self.loaded_event(event_id)?;
        let client_id = self.resolve_client(&event).await?;
        let session = Session::copied_from(client_id, &event);
        self.sessions.insert(&session).await.map_err(store_err)?;

        self.notify(Notification::success(
            "Copy created",
            format!("\"{}\" was copied as an independent session", event.title),
        ))
        .await;
        Ok(session)
    }

    /// Imports every instance of a recurring series
    ///
    /// The client is resolved once from the first instance; every member
    /// session shares it and the series master id. A single-member series
    /// degenerates to a plain import.
    pub async fn import_series(&self, master_id: &RecurrenceId) -> Result<Vec<Session>, EngineError> {
        let series = self
            .series
            .get(master_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| EngineError::SeriesNotLoaded(master_id.as_str().to_string()))?;
        let first = series
            .first()
            .ok_or_else(|| EngineError::Validation("recurring series has no instances".into()))?;
        let client_id = self.resolve_client(first).await?;

        let now = Utc::now();
        let mut created = Vec::with_capacity(series.len());
        for event in &series.instances {
            let mut session = Session::imported_from(client_id, event, now);
            session.set_recurrence_id(Some(series.master_id.clone()));
            self.sessions.insert(&session).await.map_err(store_err)?;
            created.push(session);
        }

        info!(
            master_id = master_id.as_str(),
            sessions = created.len(),
            "Recurring series imported"
        );
        self.notify(Notification::success(
            "Series imported",
            format!("{} sessions created from \"{}\"", created.len(), series.title),
        ))
        .await;
        Ok(created)
    }

    /// Puts a session into two-way sync with the external calendar
    ///
    /// Creates the external counterpart only when none is linked; an
    /// already-imported session is upgraded in place without a network call.
    pub async fn mirror_session(&self, session_id: SessionId) -> Result<Session, EngineError> {
        let mut session = self.load_session(session_id).await?;
        let now = Utc::now();

        if let Some(event_id) = session.event_id().cloned() {
            let url = session.event_url().map(str::to_string);
            session.link(SyncType::Mirrored, event_id, url, now)?;
        } else {
            let draft = self.draft_from_session(&session).await;
            let created = match self.provider.create_event(&draft).await {
                Ok(created) => created,
                Err(e) => {
                    self.notify_provider_failure("Mirroring failed", &e).await;
                    return Err(e.into());
                }
            };
            session.link(
                SyncType::Mirrored,
                created.id.clone(),
                created.html_link.clone(),
                now,
            )?;
            self.events.insert(created.id.clone(), created);
        }

        self.sessions.update(&session).await.map_err(store_err)?;
        self.notify(Notification::success(
            "Session mirrored",
            "The session is now kept in two-way sync with your calendar",
        ))
        .await;
        Ok(session)
    }

    /// Publishes a session one-way to the external calendar
    ///
    /// Rejected before any external call when the session already carries an
    /// external link; no duplicate event is ever created.
    pub async fn send_session(&self, session_id: SessionId) -> Result<Session, EngineError> {
        let mut session = self.load_session(session_id).await?;
        if session.is_linked() {
            self.notify(Notification::warning(
                "Already synchronized",
                "This session is already linked to a calendar event",
            ))
            .await;
            return Err(EngineError::AlreadySynchronized(session_id));
        }

        let draft = self.draft_from_session(&session).await;
        let created = match self.provider.create_event(&draft).await {
            Ok(created) => created,
            Err(e) => {
                self.notify_provider_failure("Sending failed", &e).await;
                return Err(e.into());
            }
        };
        session.link(
            SyncType::Sent,
            created.id.clone(),
            created.html_link.clone(),
            Utc::now(),
        )?;
        self.events.insert(created.id.clone(), created);

        self.sessions.update(&session).await.map_err(store_err)?;
        self.notify(Notification::success(
            "Session sent",
            "The session was published to your calendar",
        ))
        .await;
        Ok(session)
    }

    /// Hides an external event from future pending listings
    ///
    /// Device-local only; the external service is not touched.
    pub async fn ignore_event(&self, event_id: &EventId) -> Result<(), EngineError> {
        self.ignore_list.add(event_id).await.map_err(store_err)?;
        debug!(event_id = event_id.as_str(), "Event ignored");
        self.notify(Notification::info(
            "Event ignored",
            "The event will no longer appear in the import list on this device",
        ))
        .await;
        Ok(())
    }

    /// Creates a client for every event attendee without one
    ///
    /// Returns the number of clients created. A failed individual insert is
    /// skipped and excluded from the count, never failing the operation.
    pub async fn mark_attendees_as_clients(&self, event_id: &EventId) -> Result<u32, EngineError> {
        let event = self.loaded_event(event_id)?;
        let mut created = 0u32;
        for attendee in &event.attendees {
            let Some(email) = &attendee.email else {
                continue;
            };
            match self.clients.find_by_email(email).await {
                Ok(Some(_)) => continue,
                Ok(None) => {
                    let name = attendee
                        .name
                        .clone()
                        .unwrap_or_else(|| email.as_str().to_string());
                    let record = ClientRecord::new(name, Some(email.clone()));
                    match self.clients.insert(&record).await {
                        Ok(()) => created += 1,
                        Err(e) => {
                            warn!(email = email.as_str(), error = %e, "Skipping attendee: insert failed");
                        }
                    }
                }
                Err(e) => {
                    warn!(email = email.as_str(), error = %e, "Skipping attendee: lookup failed");
                }
            }
        }

        self.notify(Notification::success(
            "Clients created",
            format!("{created} new clients created from attendees"),
        ))
        .await;
        Ok(created)
    }

    // ========================================================================
    // Batch operations
    // ========================================================================

    /// Imports a set of events sequentially
    ///
    /// A failed item is skipped; credential expiry abandons the rest.
    pub async fn batch_import(&self, event_ids: &[EventId]) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            requested: event_ids.len() as u32,
            ..Default::default()
        };
        for event_id in event_ids {
            match self.import_event(event_id).await {
                Ok(_) => outcome.succeeded += 1,
                Err(e) => {
                    warn!(event_id = event_id.as_str(), error = %e, "Batch import item failed");
                    if e.is_auth_expired() {
                        outcome.aborted = true;
                        break;
                    }
                }
            }
        }
        info!(
            requested = outcome.requested,
            succeeded = outcome.succeeded,
            aborted = outcome.aborted,
            "Batch import finished"
        );
        outcome
    }

    /// Sends a set of sessions sequentially
    pub async fn batch_send(&self, session_ids: &[SessionId]) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            requested: session_ids.len() as u32,
            ..Default::default()
        };
        for session_id in session_ids {
            match self.send_session(*session_id).await {
                Ok(_) => outcome.succeeded += 1,
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "Batch send item failed");
                    if e.is_auth_expired() {
                        outcome.aborted = true;
                        break;
                    }
                }
            }
        }
        info!(
            requested = outcome.requested,
            succeeded = outcome.succeeded,
            aborted = outcome.aborted,
            "Batch send finished"
        );
        outcome
    }

    // ========================================================================
    // Sweeps
    // ========================================================================

    /// Detects upstream deletions and cancellations
    ///
    /// Fetches the external event of every linked session in a synced state.
    /// An upstream 404 or a cancelled status transitions the session to the
    /// cancelled sync state, leaving every other field untouched.
    #[tracing::instrument(skip(self))]
    pub async fn cancellation_sweep(&self) -> Result<SweepSummary, EngineError> {
        let candidates = self
            .sessions
            .query(
                &SessionFilter::new()
                    .with_sync_types([SyncType::Imported, SyncType::Mirrored, SyncType::Sent])
                    .with_linked(true),
            )
            .await
            .map_err(store_err)?;

        let mut summary = SweepSummary::default();
        for mut session in candidates {
            let Some(event_id) = session.event_id().cloned() else {
                continue;
            };
            summary.checked += 1;

            let gone = match self.provider.get_event(&event_id).await {
                Ok(None) => true,
                Ok(Some(event)) => event.is_cancelled(),
                Err(ProviderError::AuthExpired) => {
                    self.notify_reconnect().await;
                    summary.aborted = true;
                    break;
                }
                Err(e) => {
                    summary
                        .errors
                        .push(format!("{}: {e}", event_id.as_str()));
                    continue;
                }
            };
            if !gone {
                continue;
            }

            if let Err(e) = session.mark_sync_cancelled(Utc::now()) {
                summary
                    .errors
                    .push(format!("{}: {e}", event_id.as_str()));
                continue;
            }
            self.sessions.update(&session).await.map_err(store_err)?;
            summary.cancelled += 1;
            debug!(session_id = %session.id(), "Session marked cancelled (external side gone)");
        }

        if summary.cancelled > 0 {
            self.notify(Notification::warning(
                "Cancellations detected",
                format!(
                    "{} sessions were cancelled on the calendar side",
                    summary.cancelled
                ),
            ))
            .await;
        }
        info!(
            checked = summary.checked,
            cancelled = summary.cancelled,
            errors = summary.errors.len(),
            "Cancellation sweep finished"
        );
        Ok(summary)
    }

    /// Pulls newer external edits into mirrored sessions
    ///
    /// For each mirrored session the external event is fetched and the
    /// schedule (date and time) compared. When it diverges and the event's
    /// last-modified stamp is newer than the session's `last_synced`, the
    /// external side wins and its fields are copied in. When it diverges but
    /// the external side is not newer, the divergence is flagged as a
    /// conflict rather than silently overwritten. When the schedule agrees,
    /// only the `last_synced` stamp is refreshed; content-field divergence
    /// is left to the detection pass.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile_mirrored(&self) -> Result<ReconcileSummary, EngineError> {
        let mirrored = self
            .sessions
            .query(
                &SessionFilter::new()
                    .with_sync_types([SyncType::Mirrored])
                    .with_linked(true),
            )
            .await
            .map_err(store_err)?;

        let mut summary = ReconcileSummary::default();
        for mut session in mirrored {
            let Some(event_id) = session.event_id().cloned() else {
                continue;
            };
            summary.checked += 1;

            let event = match self.provider.get_event(&event_id).await {
                Ok(Some(event)) => event,
                // Upstream deletion is the cancellation sweep's concern
                Ok(None) => continue,
                Err(ProviderError::AuthExpired) => {
                    self.notify_reconnect().await;
                    summary.aborted = true;
                    break;
                }
                Err(e) => {
                    summary
                        .errors
                        .push(format!("{}: {e}", event_id.as_str()));
                    continue;
                }
            };

            let diffs = schedule_differences(&session, &event);
            if diffs.is_empty() {
                session.touch_synced(Utc::now());
                self.sessions.update(&session).await.map_err(store_err)?;
            } else if session.last_synced().map_or(true, |ls| event.updated > ls) {
                session.apply_event_fields(&event, event.updated);
                self.sessions.update(&session).await.map_err(store_err)?;
                summary.pulled += 1;
                debug!(session_id = %session.id(), "External edit pulled into session");
            } else if let Some(conflict) = self.detector.detect(&session, &event) {
                self.conflicts.insert(session.id(), conflict);
                summary.conflicts += 1;
            }
            self.events.insert(event.id.clone(), event);
        }

        if summary.conflicts > 0 {
            self.notify(Notification::warning(
                "Sync conflicts",
                format!("{} mirrored sessions need a manual decision", summary.conflicts),
            ))
            .await;
        }
        info!(
            checked = summary.checked,
            pulled = summary.pulled,
            conflicts = summary.conflicts,
            errors = summary.errors.len(),
            "Reconciliation pass finished"
        );
        Ok(summary)
    }

    // ========================================================================
    // Conflicts
    // ========================================================================

    /// Reruns conflict detection over the loaded window
    pub async fn detect_conflicts(&self) -> Result<Vec<SyncConflict>, EngineError> {
        let mirrored = self
            .sessions
            .query(&SessionFilter::new().with_sync_types([SyncType::Mirrored]))
            .await
            .map_err(store_err)?;
        Ok(self.run_detection(&mirrored).await)
    }

    /// The currently detected conflicts
    pub fn conflicts(&self) -> Vec<SyncConflict> {
        self.conflicts.iter().map(|e| e.value().clone()).collect()
    }

    /// Applies a resolution to a detected conflict
    ///
    /// The conflict entry is dropped on success. Dismissal drops the entry
    /// without mutating either side; the divergence reappears on the next
    /// detection pass unless resolved elsewhere.
    pub async fn resolve_conflict(
        &self,
        conflict_id: ConflictId,
        resolution: Resolution,
    ) -> Result<(), EngineError> {
        let conflict = self
            .conflicts
            .iter()
            .find(|entry| entry.value().id() == conflict_id)
            .map(|entry| entry.value().clone())
            .ok_or(EngineError::ConflictNotFound(conflict_id))?;

        if matches!(resolution, Resolution::Dismiss) {
            self.conflicts.remove(&conflict.session_id());
            debug!(conflict_id = %conflict_id, "Conflict dismissed");
            return Ok(());
        }

        let applied = self.resolver.apply(&conflict, resolution).await?;
        // Keep the loaded window current for an immediate detection pass
        if let Some(event) = applied.event {
            self.events.insert(event.id.clone(), event);
        }
        self.conflicts.remove(&conflict.session_id());
        self.notify(Notification::success(
            "Conflict resolved",
            "The session and the calendar event agree again",
        ))
        .await;
        Ok(())
    }

    /// Applies one strategy to every currently detected conflict
    ///
    /// Only keep-local and keep-external are accepted in bulk; a merge needs
    /// per-field input and dismissal is a per-conflict decision. Returns the
    /// count resolved.
    pub async fn resolve_all_conflicts(&self, resolution: Resolution) -> Result<u32, EngineError> {
        if !matches!(resolution, Resolution::KeepLocal | Resolution::KeepExternal) {
            return Err(EngineError::Validation(
                "bulk resolution supports keep_local and keep_external only".into(),
            ));
        }
        let current = self.conflicts();
        if current.is_empty() {
            return Ok(0);
        }

        let result = self.resolver.resolve_batch(&current, resolution).await?;
        for session_id in &result.resolved_ids {
            self.conflicts.remove(session_id);
        }
        for event in result.updated_events {
            self.events.insert(event.id.clone(), event);
        }
        if result.aborted {
            self.notify_reconnect().await;
        }
        self.notify(Notification::success(
            "Conflicts resolved",
            format!("{} of {} conflicts resolved", result.resolved, current.len()),
        ))
        .await;
        Ok(result.resolved)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn run_detection(&self, mirrored: &[Session]) -> Vec<SyncConflict> {
        let events: HashMap<EventId, ExternalEvent> = self
            .events
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let found = self.detector.detect_all(mirrored, &events);

        self.conflicts.clear();
        for conflict in &found {
            self.conflicts.insert(conflict.session_id(), conflict.clone());
        }
        if !found.is_empty() {
            self.notify(Notification::warning(
                "Sync conflicts",
                format!("{} mirrored sessions diverge from the calendar", found.len()),
            ))
            .await;
        }
        found
    }

    /// Resolves the client a session for this event belongs to
    ///
    /// First attendee with an email wins: looked up by email, created when
    /// absent. With no usable attendee a placeholder client named from the
    /// event title is created.
    async fn resolve_client(&self, event: &ExternalEvent) -> Result<ClientId, EngineError> {
        if let Some(attendee) = event.primary_attendee() {
            if let Some(email) = &attendee.email {
                if let Some(existing) = self
                    .clients
                    .find_by_email(email)
                    .await
                    .map_err(store_err)?
                {
                    return Ok(existing.id);
                }
                let name = attendee
                    .name
                    .clone()
                    .unwrap_or_else(|| email.as_str().to_string());
                let record = ClientRecord::new(name, Some(email.clone()));
                self.clients.insert(&record).await.map_err(store_err)?;
                return Ok(record.id);
            }
        }

        let title = event.title.trim();
        let name = if title.is_empty() { "Calendar client" } else { title };
        let record = ClientRecord::new(name, None);
        self.clients.insert(&record).await.map_err(store_err)?;
        debug!(event_id = event.id.as_str(), "Placeholder client created for import");
        Ok(record.id)
    }

    /// Builds the external draft for a session being mirrored or sent
    ///
    /// Titled from the linked client's name, falling back to a generic label
    /// when the lookup fails; the session entity carries no title of its own.
    async fn draft_from_session(&self, session: &Session) -> EventDraft {
        let title = match self.clients.get(session.client_id()).await {
            Ok(Some(client)) => format!("Session with {}", client.name),
            Ok(None) => "Session".to_string(),
            Err(e) => {
                warn!(client_id = %session.client_id(), error = %e, "Client lookup failed");
                "Session".to_string()
            }
        };
        let start = Utc.from_utc_datetime(&session.date().and_time(session.time()));
        EventDraft {
            title,
            description: session.notes().map(str::to_string),
            start: EventTime::At(start),
            end: EventTime::At(start + Duration::minutes(i64::from(self.default_session_minutes))),
            location: session.location().map(str::to_string),
            attendees: session.attendees().to_vec(),
        }
    }

    fn loaded_event(&self, event_id: &EventId) -> Result<ExternalEvent, EngineError> {
        self.events
            .get(event_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| EngineError::EventNotLoaded(event_id.clone()))
    }

    async fn load_session(&self, session_id: SessionId) -> Result<Session, EngineError> {
        self.sessions
            .get(session_id)
            .await
            .map_err(store_err)?
            .ok_or(EngineError::SessionNotFound(session_id))
    }

    async fn notify(&self, notification: Notification) {
        if !self.notifications_enabled {
            return;
        }
        if let Err(e) = self.notifications.notify(&notification).await {
            warn!(title = %notification.title, error = %e, "Notification delivery failed");
        }
    }

    async fn notify_provider_failure(&self, title: &str, error: &ProviderError) {
        match error {
            ProviderError::AuthExpired => self.notify_reconnect().await,
            _ => {
                self.notify(Notification::error(title, error.to_string()))
                    .await;
            }
        }
    }

    async fn notify_reconnect(&self) {
        self.notify(Notification::error(
            "Calendar disconnected",
            "Your calendar connection expired. Please reconnect to continue syncing.",
        ))
        .await;
    }
}

fn store_err(e: anyhow::Error) -> EngineError {
    EngineError::Store(e.to_string())
}
