//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are the interfaces the domain core depends on; their
//! implementations live in adapter crates or in the host application.
//!
//! ## Ports Overview
//!
//! - [`ICalendarProvider`] - external calendar operations (list/get/create/update)
//! - [`ISessionStore`] - the host application's session records (consumed, not owned)
//! - [`IClientStore`] - the host application's client records
//! - [`INotificationSink`] - user-visible outcomes (toasts)
//! - [`ICredentialProvider`] - access-token storage with explicit invalidation
//! - [`IIgnoreList`] - device-local set of ignored external event ids

pub mod calendar_provider;
pub mod client_store;
pub mod credentials;
pub mod ignore_list;
pub mod notification;
pub mod session_store;

pub use calendar_provider::{EventDraft, ICalendarProvider, ProviderError};
pub use client_store::{ClientRecord, IClientStore};
pub use credentials::ICredentialProvider;
pub use ignore_list::IIgnoreList;
pub use notification::{INotificationSink, Notification, NotificationSeverity};
pub use session_store::{ISessionStore, SessionFilter};
