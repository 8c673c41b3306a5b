//! Praxis Calendar - External calendar REST adapter
//!
//! Implements the [`ICalendarProvider`](praxis_core::ports::ICalendarProvider)
//! port over the provider's HTTP API:
//! - Typed `reqwest` client with bearer authentication
//! - Status-code mapping into the `ProviderError` taxonomy
//!   (401 → `AuthExpired`, 404 → `NotFound`, network/5xx → `Transient`)
//! - Lazy token reads through `ICredentialProvider`, with invalidation on 401
//! - Keyring-backed credential storage

pub mod client;
pub mod credentials;
pub mod provider;

pub use client::CalendarClient;
pub use credentials::{KeyringCredentialProvider, MemoryCredentialProvider};
pub use provider::CalendarProvider;
