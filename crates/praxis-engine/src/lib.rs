//! Praxis Engine - Sync orchestration facade
//!
//! Coordinates the calendar provider, the session and client stores, the
//! conflict subsystem, and the notification sink into the single-item and
//! batch operations the application surface calls: refresh, import, mirror,
//! send, ignore, cancellation sweep, reconciliation, conflict handling.

pub mod engine;
pub mod error;
pub mod report;

pub use engine::SyncEngine;
pub use error::EngineError;
pub use report::{BatchOutcome, ReconcileSummary, RefreshSummary, SweepSummary};
