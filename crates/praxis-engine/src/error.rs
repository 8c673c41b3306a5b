//! Engine-level errors

use thiserror::Error;

use praxis_conflict::ConflictError;
use praxis_core::domain::errors::DomainError;
use praxis_core::domain::newtypes::{ConflictId, EventId, SessionId};
use praxis_core::ports::calendar_provider::ProviderError;

/// Failures surfaced by sync orchestration operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    /// The event id is not in the currently loaded listing window
    #[error("Event {0} is not in the loaded calendar window")]
    EventNotLoaded(EventId),

    #[error("No recurring series with master id {0} in the loaded window")]
    SeriesNotLoaded(String),

    #[error("No detected conflict with id {0}")]
    ConflictNotFound(ConflictId),

    /// Rejected before any external call is made
    #[error("Session {0} is already synchronized with an external event")]
    AlreadySynchronized(SessionId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error("Store operation failed: {0}")]
    Store(String),
}

impl EngineError {
    /// Whether this error is a rejected credential
    ///
    /// Batch loops abandon their remaining items on this signal.
    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            EngineError::Provider(ProviderError::AuthExpired)
                | EngineError::Conflict(ConflictError::Provider(ProviderError::AuthExpired))
        )
    }
}
