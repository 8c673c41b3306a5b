//! Typed operation results
//!
//! Small summary structs returned by the engine's sweep and batch
//! operations. Callers infer partial failure from the counters rather than
//! from an error: batch operations never abort on a single item.

use serde::Serialize;

/// Summary of a completed refresh (window reload)
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshSummary {
    /// Events in the loaded window
    pub events: usize,
    /// Recurring series grouped from the window
    pub series: usize,
    /// Events importable after filtering ignored and already-linked ids
    pub pending: usize,
    /// Conflicts currently detected for mirrored sessions
    pub conflicts: usize,
}

/// Outcome of a sequential batch operation
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub requested: u32,
    pub succeeded: u32,
    /// True when credential expiry abandoned the remaining items
    pub aborted: bool,
}

impl BatchOutcome {
    /// Items that did not succeed, whether failed or abandoned
    #[must_use]
    pub fn failed(&self) -> u32 {
        self.requested.saturating_sub(self.succeeded)
    }
}

/// Summary of a cancellation sweep
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepSummary {
    /// Linked sessions examined
    pub checked: u32,
    /// Sessions transitioned to the cancelled sync state
    pub cancelled: u32,
    /// Per-item errors that did not stop the sweep
    pub errors: Vec<String>,
    pub aborted: bool,
}

/// Summary of a mirrored reconciliation pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileSummary {
    /// Mirrored sessions examined
    pub checked: u32,
    /// Sessions overwritten with newer external fields
    pub pulled: u32,
    /// Divergences flagged as conflicts instead of overwritten
    pub conflicts: u32,
    pub errors: Vec<String>,
    pub aborted: bool,
}
