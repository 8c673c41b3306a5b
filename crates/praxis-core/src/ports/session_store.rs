//! Session store port (driven/secondary port)
//!
//! The session-record store is owned by the host application (its relational
//! CRUD layer); this engine consumes the narrow projection below: read,
//! insert, update-by-id, plus the sync-field lookups the engine needs.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific and
//!   don't need domain-level classification.
//! - Every query is implicitly scoped to the authenticated user's own rows;
//!   the store adapter carries that scoping, not this interface.
//! - `update` is the unit of atomicity. Two sync operations racing on the
//!   same session id is an accepted last-write-wins inconsistency.

use crate::domain::newtypes::{EventId, SessionId};
use crate::domain::session::{Session, SyncType};

/// Filter criteria for querying sessions
///
/// All fields are optional; when `None`, no filtering is applied for that
/// field. Multiple filters combine with AND logic.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Restrict to sessions in any of these sync types
    pub sync_types: Option<Vec<SyncType>>,
    /// Restrict to sessions with (true) or without (false) an external link
    pub linked: Option<bool>,
}

impl SessionFilter {
    /// Creates an empty filter (matches all sessions)
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to the given sync types
    pub fn with_sync_types(mut self, sync_types: impl Into<Vec<SyncType>>) -> Self {
        self.sync_types = Some(sync_types.into());
        self
    }

    /// Restricts to linked (or unlinked) sessions
    pub fn with_linked(mut self, linked: bool) -> Self {
        self.linked = Some(linked);
        self
    }

    /// Returns true if the session matches this filter
    pub fn matches(&self, session: &Session) -> bool {
        if let Some(types) = &self.sync_types {
            if !types.contains(&session.sync_type()) {
                return false;
            }
        }
        if let Some(linked) = self.linked {
            if session.is_linked() != linked {
                return false;
            }
        }
        true
    }
}

/// Port trait for the host application's session records
#[async_trait::async_trait]
pub trait ISessionStore: Send + Sync {
    /// Inserts a new session
    async fn insert(&self, session: &Session) -> anyhow::Result<()>;

    /// Updates an existing session by id
    async fn update(&self, session: &Session) -> anyhow::Result<()>;

    /// Retrieves a session by id
    async fn get(&self, id: SessionId) -> anyhow::Result<Option<Session>>;

    /// Retrieves the session linked to a given external event, if any
    async fn find_by_event_id(&self, event_id: &EventId) -> anyhow::Result<Option<Session>>;

    /// Queries sessions matching the given filter
    async fn query(&self, filter: &SessionFilter) -> anyhow::Result<Vec<Session>>;
}
