//! Sync conflict domain types
//!
//! Types for tracking field-level divergence between a mirrored session and
//! its external calendar event. A conflict is a derived, in-memory value:
//! it is recomputed on every detection pass and never persisted. Lasting
//! state lives only in the session's synced fields after resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::newtypes::{ConflictId, EventId, SessionId};

/// The fields compared between a mirrored session and its external event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictField {
    Date,
    Time,
    Description,
    Location,
    Attendees,
}

impl ConflictField {
    /// Stable lower-case name, matching the serde representation
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ConflictField::Date => "date",
            ConflictField::Time => "time",
            ConflictField::Description => "description",
            ConflictField::Location => "location",
            ConflictField::Attendees => "attendees",
        }
    }

    /// Whether a divergence in this field breaks the schedule itself
    #[must_use]
    pub fn is_scheduling(&self) -> bool {
        matches!(self, ConflictField::Date | ConflictField::Time)
    }
}

impl fmt::Display for ConflictField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single field-level divergence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field: ConflictField,
    /// The session's (platform-side) normalized value
    pub platform_value: String,
    /// The external event's normalized value
    pub external_value: String,
}

/// How urgently a conflict needs user attention
///
/// Ordering: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Classifies a set of differing fields
    ///
    /// High when date or time diverge (scheduling-breaking), medium when
    /// description or location diverge, low otherwise (attendee list only).
    #[must_use]
    pub fn classify(diffs: &[FieldDiff]) -> Self {
        if diffs.iter().any(|d| d.field.is_scheduling()) {
            Severity::High
        } else if diffs
            .iter()
            .any(|d| matches!(d.field, ConflictField::Description | ConflictField::Location))
        {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        write!(f, "{}", s)
    }
}

/// A detected, unresolved divergence between a mirrored session and its
/// external event
///
/// Keyed by session id: one mirrored session yields at most one current
/// conflict. Holds the external snapshot it was computed from so a
/// resolution can be applied without another fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConflict {
    id: ConflictId,
    session_id: SessionId,
    event_id: EventId,
    severity: Severity,
    differences: Vec<FieldDiff>,
    detected_at: DateTime<Utc>,
}

impl SyncConflict {
    /// Creates a conflict from a non-empty difference list
    ///
    /// Severity is derived from the differing fields. Callers must not
    /// construct a conflict from an empty list; detection passes simply
    /// produce no entry in that case.
    pub fn new(session_id: SessionId, event_id: EventId, differences: Vec<FieldDiff>) -> Self {
        debug_assert!(!differences.is_empty(), "conflict with no differences");
        Self {
            id: ConflictId::new(),
            session_id,
            event_id,
            severity: Severity::classify(&differences),
            differences,
            detected_at: Utc::now(),
        }
    }

    pub fn id(&self) -> ConflictId {
        self.id
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn differences(&self) -> &[FieldDiff] {
        &self.differences
    }

    pub fn detected_at(&self) -> DateTime<Utc> {
        self.detected_at
    }

    /// The difference entry for a specific field, if that field diverges
    #[must_use]
    pub fn difference_for(&self, field: ConflictField) -> Option<&FieldDiff> {
        self.differences.iter().find(|d| d.field == field)
    }
}

/// A user decision for a detected conflict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Push the session's current values to the external event
    KeepLocal,
    /// Overwrite the session with the external event's values
    KeepExternal,
    /// Apply explicitly chosen values per differing field
    Merge(MergedFields),
    /// Drop the in-memory entry; the divergence is recomputed on the next
    /// detection pass unless resolved elsewhere
    Dismiss,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resolution::KeepLocal => "keep_local",
            Resolution::KeepExternal => "keep_external",
            Resolution::Merge(_) => "merge",
            Resolution::Dismiss => "dismiss",
        };
        write!(f, "{}", s)
    }
}

/// Per-field values chosen for a manual merge
///
/// Each field is optional: `None` leaves the session's current value in
/// place. Values may come from either side of the conflict or be free-form
/// replacements typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedFields {
    pub date: Option<chrono::NaiveDate>,
    pub time: Option<chrono::NaiveTime>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl MergedFields {
    /// Whether the merge touches the schedule (date or time)
    ///
    /// A schedule-changing merge must also be pushed to the external event.
    #[must_use]
    pub fn changes_schedule(&self) -> bool {
        self.date.is_some() || self.time.is_some()
    }
}
