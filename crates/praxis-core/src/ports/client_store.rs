//! Client store port (driven/secondary port)
//!
//! Narrow contract over the host application's client records: lookup by
//! email, lookup by id, insert. Used when importing events to resolve or
//! create the client a session belongs to, and by the "mark attendees as
//! clients" operation.

use serde::{Deserialize, Serialize};

use crate::domain::newtypes::{ClientId, Email};

/// A client record as seen by the sync engine
///
/// The host application stores far more (contact details, billing, referral
/// state); the engine only reads what it needs to link sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: ClientId,
    pub name: String,
    pub email: Option<Email>,
}

impl ClientRecord {
    /// Creates a new client record with a fresh id
    pub fn new(name: impl Into<String>, email: Option<Email>) -> Self {
        Self {
            id: ClientId::new(),
            name: name.into(),
            email,
        }
    }
}

/// Port trait for the host application's client records
#[async_trait::async_trait]
pub trait IClientStore: Send + Sync {
    /// Retrieves a client by id
    async fn get(&self, id: ClientId) -> anyhow::Result<Option<ClientRecord>>;

    /// Retrieves a client by email address (case-insensitive by `Email`
    /// construction)
    async fn find_by_email(&self, email: &Email) -> anyhow::Result<Option<ClientRecord>>;

    /// Inserts a new client record
    async fn insert(&self, client: &ClientRecord) -> anyhow::Result<()>;
}
