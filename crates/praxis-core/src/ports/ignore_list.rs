//! Ignore-list port (driven/secondary port)
//!
//! A device-local persistent set of external event ids the user chose to
//! hide from the pending (importable) listing. Deliberately not written
//! through the session store: ignoring an event on one device does not hide
//! it on another.

use crate::domain::newtypes::EventId;

/// Port trait for the device-local ignored-event set
#[async_trait::async_trait]
pub trait IIgnoreList: Send + Sync {
    /// Adds an event id to the ignore set; idempotent
    async fn add(&self, event_id: &EventId) -> anyhow::Result<()>;

    /// Removes an event id from the ignore set; idempotent
    async fn remove(&self, event_id: &EventId) -> anyhow::Result<()>;

    /// Returns true if the event id is ignored
    async fn contains(&self, event_id: &EventId) -> anyhow::Result<bool>;

    /// Returns every ignored event id
    async fn all(&self) -> anyhow::Result<Vec<EventId>>;
}
