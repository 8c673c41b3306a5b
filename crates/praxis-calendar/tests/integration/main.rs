//! Integration tests for the calendar adapter
//!
//! Exercises the HTTP client, the status-code → error-taxonomy mapping, and
//! credential invalidation against a wiremock server.

mod common;
mod test_credentials;
mod test_event_ops;
mod test_list_events;
