//! Domain entities and business logic
//!
//! Core domain types for the calendar sync engine:
//! - Newtypes for type-safe identifiers and validated values
//! - The `Session` entity and its `SyncType` state machine
//! - External calendar event types (in-memory only)
//! - Recurring series grouping
//! - Conflict types and severity classification
//! - Domain-specific error types

pub mod conflict;
pub mod errors;
pub mod event;
pub mod newtypes;
pub mod series;
pub mod session;

// Re-export commonly used types
pub use conflict::{
    ConflictField, FieldDiff, MergedFields, Resolution, Severity, SyncConflict,
};
pub use errors::DomainError;
pub use event::{Attendee, EventStatus, EventTime, ExternalEvent};
pub use newtypes::*;
pub use series::{group_series, RecurringSeries};
pub use session::{Session, SessionStatus, SyncType};
