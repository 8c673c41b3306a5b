//! Field-level difference computation
//!
//! Normalized comparison of the tracked fields between a session and its
//! external event: date, time, description, location, attendees. A field is
//! a difference iff its normalized values are not equal. Strings are
//! compared trimmed; times at minute granularity; attendee lists as
//! case-insensitive identity sets.

use chrono::{NaiveTime, Timelike};

use praxis_core::domain::conflict::{ConflictField, FieldDiff};
use praxis_core::domain::event::{Attendee, ExternalEvent};
use praxis_core::domain::session::Session;

/// Computes every tracked-field difference between a session and an event
///
/// All-day events carry no time-of-day, so the time field cannot diverge
/// for them; their date remains fully comparable.
#[must_use]
pub fn compute_differences(session: &Session, event: &ExternalEvent) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();

    let session_date = session.date().format("%Y-%m-%d").to_string();
    let event_date = event.start.date().format("%Y-%m-%d").to_string();
    if session_date != event_date {
        diffs.push(FieldDiff {
            field: ConflictField::Date,
            platform_value: session_date,
            external_value: event_date,
        });
    }

    if let Some(event_time) = event.start.time_of_day() {
        let session_time = truncate_to_minute(session.time());
        if session_time != event_time {
            diffs.push(FieldDiff {
                field: ConflictField::Time,
                platform_value: session_time.format("%H:%M").to_string(),
                external_value: event_time.format("%H:%M").to_string(),
            });
        }
    }

    let session_notes = normalize(session.notes());
    let event_description = normalize(event.description.as_deref());
    if session_notes != event_description {
        diffs.push(FieldDiff {
            field: ConflictField::Description,
            platform_value: session_notes,
            external_value: event_description,
        });
    }

    let session_location = normalize(session.location());
    let event_location = normalize(event.location.as_deref());
    if session_location != event_location {
        diffs.push(FieldDiff {
            field: ConflictField::Location,
            platform_value: session_location,
            external_value: event_location,
        });
    }

    let session_attendees = attendee_key(session.attendees());
    let event_attendees = attendee_key(&event.attendees);
    if session_attendees != event_attendees {
        diffs.push(FieldDiff {
            field: ConflictField::Attendees,
            platform_value: session_attendees,
            external_value: event_attendees,
        });
    }

    diffs
}

/// The schedule divergence between a session and its event
///
/// The reconciliation pass pulls or flags date and time only; description,
/// location and attendee divergence is surfaced through conflict detection.
#[must_use]
pub fn schedule_differences(session: &Session, event: &ExternalEvent) -> Vec<FieldDiff> {
    compute_differences(session, event)
        .into_iter()
        .filter(|d| d.field.is_scheduling())
        .collect()
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

fn normalize(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}

/// Canonical, order-insensitive identity of an attendee list
///
/// Attendees are identified by email where present (already lower-cased by
/// construction), by trimmed lower-cased name otherwise.
fn attendee_key(attendees: &[Attendee]) -> String {
    let mut keys: Vec<String> = attendees
        .iter()
        .filter_map(|a| {
            a.email
                .as_ref()
                .map(|e| e.as_str().to_string())
                .or_else(|| a.name.as_ref().map(|n| n.trim().to_lowercase()))
        })
        .collect();
    keys.sort();
    keys.dedup();
    keys.join(", ")
}
