//! Conflict detection
//!
//! Pure comparison of mirrored sessions against the already-loaded event
//! window. Detection never fetches and never persists: a conflict is a
//! derived value, recomputed on every pass, and disappears on its own once
//! the sides agree again.
//!
//! ## Design Notes
//!
//! - Only mirrored sessions are examined. Imported sessions are pulled by
//!   the reconciliation pass, sent sessions are one-way by contract, and
//!   local sessions have no external counterpart.
//! - A session whose event is absent from the window produces no conflict;
//!   upstream deletion is the cancellation sweep's concern, not this one's.

use std::collections::HashMap;

use tracing::debug;

use praxis_core::domain::conflict::SyncConflict;
use praxis_core::domain::event::ExternalEvent;
use praxis_core::domain::newtypes::EventId;
use praxis_core::domain::session::{Session, SyncType};

use crate::diff::compute_differences;

/// Stateless detector over loaded sessions and events
#[derive(Debug, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    pub fn new() -> Self {
        Self
    }

    /// Compares one session against its external event
    ///
    /// Returns a conflict when the session is mirrored and at least one
    /// tracked field diverges.
    #[must_use]
    pub fn detect(&self, session: &Session, event: &ExternalEvent) -> Option<SyncConflict> {
        if session.sync_type() != SyncType::Mirrored {
            return None;
        }
        let differences = compute_differences(session, event);
        if differences.is_empty() {
            return None;
        }
        debug!(
            session_id = %session.id(),
            event_id = %event.id.as_str(),
            fields = differences.len(),
            "Divergence detected"
        );
        Some(SyncConflict::new(
            session.id(),
            event.id.clone(),
            differences,
        ))
    }

    /// Runs detection across a loaded window
    ///
    /// `events` is keyed by event id, typically built from one `list_events`
    /// call. Sessions without a counterpart in the map are skipped.
    #[must_use]
    pub fn detect_all(
        &self,
        sessions: &[Session],
        events: &HashMap<EventId, ExternalEvent>,
    ) -> Vec<SyncConflict> {
        sessions
            .iter()
            .filter_map(|session| {
                let event_id = session.event_id()?;
                let event = events.get(event_id)?;
                self.detect(session, event)
            })
            .collect()
    }
}
