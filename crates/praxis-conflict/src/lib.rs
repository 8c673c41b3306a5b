//! Praxis Conflict - Conflict detection and resolution
//!
//! Provides:
//! - Field-level divergence computation between a mirrored session and its
//!   external calendar event
//! - Pure, recomputed-on-demand conflict detection with severity
//! - Resolution execution (keep local, keep external, field-level merge,
//!   dismiss) through the calendar and store ports

pub mod detector;
pub mod diff;
pub mod error;
pub mod resolver;

pub use detector::ConflictDetector;
pub use error::ConflictError;
pub use resolver::{AppliedResolution, BatchResult, ConflictResolver};
