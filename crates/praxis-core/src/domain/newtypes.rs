//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for domain identifiers and values. Identifiers
//! owned by the platform (sessions, clients, conflicts) are UUID-backed;
//! identifiers owned by the external calendar service (events, recurrence
//! masters) are opaque non-empty strings in whatever format the provider
//! uses. Each newtype ensures validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// UUID-based ID types
// ============================================================================

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random id
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an id from an existing UUID
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID value
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| DomainError::InvalidId(format!(
                        concat!("Invalid ", stringify!($name), ": {}"), e
                    )))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_id!(
    /// Identifier for Session entities
    SessionId
);

uuid_id!(
    /// Identifier for Client records
    ClientId
);

uuid_id!(
    /// Identifier for detected SyncConflict entries
    ConflictId
);

uuid_id!(
    /// Identifier for session packages (pre-paid bundles)
    PackageId
);

// ============================================================================
// External (provider-owned) ID types
// ============================================================================

/// Identifier of an event in the external calendar service
///
/// Opaque, provider-assigned, and never generated by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Create an EventId from a provider-assigned string
    ///
    /// # Errors
    /// Returns `DomainError::InvalidId` if the string is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidId("EventId must not be empty".into()));
        }
        Ok(Self(id))
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Identifier of the recurrence master that a series of expanded event
/// instances shares
///
/// For a master event this is its own [`EventId`]; for an expanded instance
/// it is the back-reference the provider attaches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecurrenceId(String);

impl RecurrenceId {
    /// Create a RecurrenceId from a provider-assigned string
    ///
    /// # Errors
    /// Returns `DomainError::InvalidId` if the string is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidId(
                "RecurrenceId must not be empty".into(),
            ));
        }
        Ok(Self(id))
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecurrenceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EventId> for RecurrenceId {
    fn from(id: EventId) -> Self {
        Self(id.0)
    }
}

// ============================================================================
// Validated value types
// ============================================================================

/// A validated, lower-cased email address
///
/// Used to match calendar attendees against client records. Comparison is
/// case-insensitive by construction: the address is lower-cased on creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Create a validated email address
    ///
    /// # Errors
    /// Returns `DomainError::InvalidEmail` if the address has no local part,
    /// no domain, or no `@` separator.
    pub fn new(address: impl Into<String>) -> Result<Self, DomainError> {
        let address = address.into().trim().to_lowercase();
        let Some((local, domain)) = address.split_once('@') else {
            return Err(DomainError::InvalidEmail(address));
        };
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return Err(DomainError::InvalidEmail(address));
        }
        Ok(Self(address))
    }

    /// Returns the address as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Email {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_roundtrip() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_session_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_event_id_rejects_empty() {
        assert!(EventId::new("").is_err());
        assert!(EventId::new("   ").is_err());
        assert!(EventId::new("evt_123").is_ok());
    }

    #[test]
    fn test_recurrence_id_from_event_id() {
        let event_id = EventId::new("master_1").unwrap();
        let rec: RecurrenceId = event_id.into();
        assert_eq!(rec.as_str(), "master_1");
    }

    #[test]
    fn test_email_validation() {
        assert!(Email::new("ana@example.com").is_ok());
        assert!(Email::new("no-at-sign").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("ana@").is_err());
        assert!(Email::new("ana@localhost").is_err());
    }

    #[test]
    fn test_email_lowercased() {
        let email = Email::new("Ana@Example.COM").unwrap();
        assert_eq!(email.as_str(), "ana@example.com");
    }

    #[test]
    fn test_email_serde_transparent() {
        let email = Email::new("ana@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"ana@example.com\"");
    }
}
