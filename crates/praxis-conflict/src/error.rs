//! Conflict subsystem errors

use thiserror::Error;

use praxis_core::domain::newtypes::{EventId, SessionId};
use praxis_core::ports::calendar_provider::ProviderError;

/// Failures raised while resolving conflicts
#[derive(Debug, Error)]
pub enum ConflictError {
    #[error("Session {0} no longer exists")]
    SessionNotFound(SessionId),

    /// The conflicting event disappeared upstream between detection and
    /// resolution; the cancellation sweep will pick the session up.
    #[error("Event {0} was deleted upstream; the conflict is stale")]
    StaleConflict(EventId),

    #[error("Session {0} is not mirrored; nothing to resolve")]
    NotMirrored(SessionId),

    /// Merge carries per-conflict field choices and cannot be applied in bulk
    #[error("Merge resolutions must be applied one conflict at a time")]
    BulkMergeUnsupported,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Failed to persist resolution: {0}")]
    Store(String),
}
