//! External calendar event types
//!
//! [`ExternalEvent`] is the in-memory representation of an event owned by the
//! external calendar service. Events are never persisted by this engine
//! beyond the currently loaded listing window; they are re-fetched on every
//! refresh.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::{Email, EventId, RecurrenceId};

/// An attendee on an external calendar event
///
/// The email is optional because some providers emit resource attendees
/// (rooms, video links) without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// Display name, if the provider supplied one
    pub name: Option<String>,
    /// Email address, used to match attendees against client records
    pub email: Option<Email>,
}

impl Attendee {
    /// Creates an attendee with a name and a validated email
    pub fn new(name: Option<String>, email: Option<Email>) -> Self {
        Self { name, email }
    }
}

/// The provider-side status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Confirmed,
    Tentative,
    /// The event was cancelled on the provider side. Together with an HTTP
    /// 404 on fetch, this is what the cancellation sweep looks for.
    Cancelled,
}

/// Start or end of an event: either a precise instant or an all-day date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    /// A timed event boundary
    At(DateTime<Utc>),
    /// An all-day event boundary (no time-of-day)
    AllDay(NaiveDate),
}

impl EventTime {
    /// The calendar date of this boundary
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::At(instant) => instant.date_naive(),
            EventTime::AllDay(date) => *date,
        }
    }

    /// The time-of-day of this boundary, truncated to minute granularity
    ///
    /// Returns `None` for all-day boundaries; an all-day event cannot take
    /// part in a time comparison.
    #[must_use]
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        match self {
            EventTime::At(instant) => {
                let t = instant.time();
                NaiveTime::from_hms_opt(t.hour(), t.minute(), 0)
            }
            EventTime::AllDay(_) => None,
        }
    }

    /// Whether this boundary is all-day
    #[must_use]
    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::AllDay(_))
    }
}

/// An event owned by the external calendar service
///
/// Read (or written) through the calendar provider port. Kept in memory only
/// for the duration of the current listing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalEvent {
    /// Provider-assigned event identifier
    pub id: EventId,
    /// Event title (summary line)
    pub title: String,
    /// Free-text description
    pub description: Option<String>,
    /// Start of the event
    pub start: EventTime,
    /// End of the event
    pub end: EventTime,
    /// Location string, if any
    pub location: Option<String>,
    /// Attendee list (name/email pairs)
    pub attendees: Vec<Attendee>,
    /// Recurrence rule list (RRULE strings); non-empty only on series masters
    pub recurrence: Vec<String>,
    /// Back-reference to the recurrence master; present only on expanded
    /// instances of a recurring series
    pub recurring_event_id: Option<RecurrenceId>,
    /// Provider-side last-modified timestamp
    pub updated: DateTime<Utc>,
    /// Provider-side status
    pub status: EventStatus,
    /// Hyperlink to the event in the provider's own UI
    pub html_link: Option<String>,
}

impl ExternalEvent {
    /// The recurrence master this event belongs to, if any
    ///
    /// A master event (it carries a recurrence rule) belongs to its own id;
    /// an expanded instance belongs to its back-referenced master. Events
    /// with neither are not part of a series.
    #[must_use]
    pub fn series_master_id(&self) -> Option<RecurrenceId> {
        if let Some(master) = &self.recurring_event_id {
            return Some(master.clone());
        }
        if !self.recurrence.is_empty() {
            return Some(self.id.clone().into());
        }
        None
    }

    /// The first attendee carrying an email address
    ///
    /// Import operations resolve the session's client from this attendee.
    #[must_use]
    pub fn primary_attendee(&self) -> Option<&Attendee> {
        self.attendees.iter().find(|a| a.email.is_some())
    }

    /// Whether the provider reports this event as cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }
}
