//! Recurring series grouping
//!
//! Groups the expanded instances of a recurring external event into ordered
//! series. Grouping is a pure function over the currently loaded event
//! window and is recomputed on every successful listing; nothing here is
//! persisted or cached. Full recomputation is cheap at the expected scale
//! (a few hundred events per 30-day window).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::event::ExternalEvent;
use super::newtypes::{EventId, RecurrenceId};

/// A recurring series derived from the loaded event window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringSeries {
    /// The shared recurrence master id
    pub master_id: RecurrenceId,
    /// Representative title (taken from the first instance)
    pub title: String,
    /// Member instances, sorted ascending by start
    pub instances: Vec<ExternalEvent>,
    /// The recurrence rule of the first member that carries one, if any
    pub rule: Option<String>,
}

impl RecurringSeries {
    /// Number of instances inside the loaded window
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The earliest instance in the window
    #[must_use]
    pub fn first(&self) -> Option<&ExternalEvent> {
        self.instances.first()
    }

    /// The latest instance in the window
    #[must_use]
    pub fn last(&self) -> Option<&ExternalEvent> {
        self.instances.last()
    }

    /// Zero-based position of an event within the series, if it is a member
    #[must_use]
    pub fn position_of(&self, event_id: &EventId) -> Option<usize> {
        self.instances.iter().position(|e| &e.id == event_id)
    }
}

/// Groups events that share a recurrence master into ordered series
///
/// An event belongs to a series iff it resolves a master id: its own id when
/// it carries a recurrence rule, or the back-reference to its master when it
/// is an expanded instance. Events without either are ignored. Instances are
/// sorted ascending by start after grouping; the sort is stable, so equal
/// starts keep their listing order.
#[must_use]
pub fn group_series(events: &[ExternalEvent]) -> HashMap<RecurrenceId, RecurringSeries> {
    let mut series: HashMap<RecurrenceId, RecurringSeries> = HashMap::new();

    for event in events {
        let Some(master_id) = event.series_master_id() else {
            continue;
        };
        series
            .entry(master_id.clone())
            .or_insert_with(|| RecurringSeries {
                master_id,
                title: event.title.clone(),
                instances: Vec::new(),
                rule: None,
            })
            .instances
            .push(event.clone());
    }

    for entry in series.values_mut() {
        entry
            .instances
            .sort_by_key(|e| (e.start.date(), e.start.time_of_day()));
        entry.rule = entry
            .instances
            .iter()
            .find_map(|e| e.recurrence.first().cloned());
        if let Some(first) = entry.instances.first() {
            entry.title = first.title.clone();
        }
    }

    series
}
