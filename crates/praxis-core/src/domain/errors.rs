//! Domain error types
//!
//! Error types specific to domain operations: validation failures, invalid
//! sync-state transitions, and malformed identifiers.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid email address format
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Invalid sync-type transition attempt
    #[error("Invalid sync transition from {from} to {to}")]
    InvalidTransition {
        /// The current sync type
        from: String,
        /// The attempted target sync type
        to: String,
    },

    /// A linking operation without the external event id it requires
    #[error("Sync type {0} requires a linked external event id")]
    MissingEventId(String),

    /// The session is already linked to an external event
    #[error("Session is already synchronized with external event {0}")]
    AlreadyLinked(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
