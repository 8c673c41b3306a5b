//! In-memory reference adapters for the store ports
//!
//! [`MemoryIgnoreList`] is the production implementation of the device-local
//! ignore set. The session and client stores are reference adapters used by
//! the engine and resolver test-suites; in the deployed platform those ports
//! are backed by the host application's relational layer.

use dashmap::{DashMap, DashSet};

use crate::domain::newtypes::{ClientId, Email, EventId, SessionId};
use crate::domain::session::Session;
use crate::ports::client_store::{ClientRecord, IClientStore};
use crate::ports::ignore_list::IIgnoreList;
use crate::ports::session_store::{ISessionStore, SessionFilter};

/// In-memory session store keyed by session id
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<SessionId, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait::async_trait]
impl ISessionStore for MemorySessionStore {
    async fn insert(&self, session: &Session) -> anyhow::Result<()> {
        if self.sessions.contains_key(&session.id()) {
            anyhow::bail!("session {} already exists", session.id());
        }
        self.sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> anyhow::Result<()> {
        if !self.sessions.contains_key(&session.id()) {
            anyhow::bail!("session {} does not exist", session.id());
        }
        self.sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn get(&self, id: SessionId) -> anyhow::Result<Option<Session>> {
        Ok(self.sessions.get(&id).map(|s| s.clone()))
    }

    async fn find_by_event_id(&self, event_id: &EventId) -> anyhow::Result<Option<Session>> {
        Ok(self
            .sessions
            .iter()
            .find(|s| s.event_id() == Some(event_id))
            .map(|s| s.clone()))
    }

    async fn query(&self, filter: &SessionFilter) -> anyhow::Result<Vec<Session>> {
        let mut out: Vec<Session> = self
            .sessions
            .iter()
            .filter(|s| filter.matches(s))
            .map(|s| s.clone())
            .collect();
        out.sort_by_key(|s| (s.date(), s.time()));
        Ok(out)
    }
}

/// In-memory client store keyed by client id
#[derive(Debug, Default)]
pub struct MemoryClientStore {
    clients: DashMap<ClientId, ClientRecord>,
}

impl MemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[async_trait::async_trait]
impl IClientStore for MemoryClientStore {
    async fn get(&self, id: ClientId) -> anyhow::Result<Option<ClientRecord>> {
        Ok(self.clients.get(&id).map(|c| c.clone()))
    }

    async fn find_by_email(&self, email: &Email) -> anyhow::Result<Option<ClientRecord>> {
        Ok(self
            .clients
            .iter()
            .find(|c| c.email.as_ref() == Some(email))
            .map(|c| c.clone()))
    }

    async fn insert(&self, client: &ClientRecord) -> anyhow::Result<()> {
        if self.clients.contains_key(&client.id) {
            anyhow::bail!("client {} already exists", client.id);
        }
        self.clients.insert(client.id, client.clone());
        Ok(())
    }
}

/// Device-local ignored-event set
#[derive(Debug, Default)]
pub struct MemoryIgnoreList {
    ignored: DashSet<EventId>,
}

impl MemoryIgnoreList {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl IIgnoreList for MemoryIgnoreList {
    async fn add(&self, event_id: &EventId) -> anyhow::Result<()> {
        self.ignored.insert(event_id.clone());
        Ok(())
    }

    async fn remove(&self, event_id: &EventId) -> anyhow::Result<()> {
        self.ignored.remove(event_id);
        Ok(())
    }

    async fn contains(&self, event_id: &EventId) -> anyhow::Result<bool> {
        Ok(self.ignored.contains(event_id))
    }

    async fn all(&self) -> anyhow::Result<Vec<EventId>> {
        Ok(self.ignored.iter().map(|e| e.clone()).collect())
    }
}
