//! Praxis Core - Domain logic for external-calendar synchronization
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Session`, `ExternalEvent`, `RecurringSeries`, `SyncConflict`
//! - **State machine** - the `SyncType` linkage states between a session and
//!   its external calendar event
//! - **Port definitions** - Traits for adapters: `ICalendarProvider`,
//!   `ISessionStore`, `IClientStore`, `INotificationSink`,
//!   `ICredentialProvider`, `IIgnoreList`
//! - **Reference adapters** - in-memory implementations of the store ports
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external
//! dependencies. Ports define trait interfaces that adapter crates implement.
//! The sync engine (`praxis-engine`) orchestrates domain entities through the
//! port interfaces.

pub mod config;
pub mod domain;
pub mod memory;
pub mod ports;
