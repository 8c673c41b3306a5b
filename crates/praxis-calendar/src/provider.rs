//! `ICalendarProvider` implementation over [`CalendarClient`]
//!
//! Wires the HTTP client to the credential capability: the access token is
//! read lazily per call through the injected `ICredentialProvider`, and a
//! 401 from the provider invalidates the stored credential in exactly one
//! place before `AuthExpired` is surfaced to the caller.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use praxis_core::domain::event::ExternalEvent;
use praxis_core::domain::newtypes::EventId;
use praxis_core::ports::calendar_provider::{EventDraft, ICalendarProvider, ProviderError};
use praxis_core::ports::credentials::ICredentialProvider;

use crate::client::CalendarClient;

/// Calendar provider adapter: HTTP client + credential capability
pub struct CalendarProvider {
    client: CalendarClient,
    credentials: Arc<dyn ICredentialProvider>,
}

impl CalendarProvider {
    pub fn new(client: CalendarClient, credentials: Arc<dyn ICredentialProvider>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Reads the stored token; a missing token counts as an expired
    /// credential, since either way the user must reconnect.
    async fn token(&self) -> Result<String, ProviderError> {
        match self.credentials.access_token().await {
            Ok(Some(token)) => Ok(token),
            Ok(None) => {
                debug!("No stored calendar credential");
                Err(ProviderError::AuthExpired)
            }
            Err(e) => Err(ProviderError::Transient(format!(
                "credential storage failure: {e}"
            ))),
        }
    }

    /// Invalidates the stored credential after a 401
    async fn handle_auth_failure(&self) {
        if let Err(e) = self.credentials.invalidate().await {
            warn!(error = %e, "Failed to clear rejected calendar credential");
        }
    }

    async fn run<T>(
        &self,
        result: Result<T, ProviderError>,
    ) -> Result<T, ProviderError> {
        if matches!(result, Err(ProviderError::AuthExpired)) {
            self.handle_auth_failure().await;
        }
        result
    }
}

#[async_trait::async_trait]
impl ICalendarProvider for CalendarProvider {
    async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<ExternalEvent>, ProviderError> {
        let token = self.token().await?;
        let result = self.client.list_events(&token, time_min, time_max).await;
        self.run(result).await
    }

    async fn get_event(&self, id: &EventId) -> Result<Option<ExternalEvent>, ProviderError> {
        let token = self.token().await?;
        let result = self.client.get_event(&token, id).await;
        self.run(result).await
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<ExternalEvent, ProviderError> {
        let token = self.token().await?;
        let result = self.client.create_event(&token, draft).await;
        self.run(result).await
    }

    async fn update_event(
        &self,
        id: &EventId,
        draft: &EventDraft,
    ) -> Result<ExternalEvent, ProviderError> {
        let token = self.token().await?;
        let result = self.client.update_event(&token, id, draft).await;
        self.run(result).await
    }

    async fn validate_credential(&self) -> Result<bool, ProviderError> {
        let token = match self.token().await {
            Ok(token) => token,
            Err(ProviderError::AuthExpired) => return Ok(false),
            Err(e) => return Err(e),
        };
        match self.client.probe(&token).await {
            Ok(()) => Ok(true),
            Err(ProviderError::AuthExpired) => {
                self.handle_auth_failure().await;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
