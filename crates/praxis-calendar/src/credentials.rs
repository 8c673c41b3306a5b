//! Credential storage adapters
//!
//! [`KeyringCredentialProvider`] keeps the calendar access token in the
//! OS keyring: client-scoped, persistent, and deliberately not synchronized
//! across devices. [`MemoryCredentialProvider`] backs tests and ephemeral
//! environments.

use std::sync::Mutex;

use anyhow::Context;
use tracing::debug;

use praxis_core::ports::credentials::ICredentialProvider;

/// Keyring-backed credential storage
///
/// Keyring operations are blocking, so each one runs on the blocking pool.
pub struct KeyringCredentialProvider {
    service: String,
    user: String,
}

impl KeyringCredentialProvider {
    /// Creates a provider storing the token under `service`/`user`
    pub fn new(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    fn entry(&self) -> anyhow::Result<keyring::Entry> {
        keyring::Entry::new(&self.service, &self.user).context("open keyring entry")
    }
}

#[async_trait::async_trait]
impl ICredentialProvider for KeyringCredentialProvider {
    async fn access_token(&self) -> anyhow::Result<Option<String>> {
        let entry = self.entry()?;
        tokio::task::spawn_blocking(move || match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("read keyring entry")),
        })
        .await?
    }

    async fn store(&self, token: &str) -> anyhow::Result<()> {
        let entry = self.entry()?;
        let token = token.to_string();
        tokio::task::spawn_blocking(move || {
            entry.set_password(&token).context("write keyring entry")
        })
        .await??;
        debug!("Stored calendar credential in keyring");
        Ok(())
    }

    async fn invalidate(&self) -> anyhow::Result<()> {
        let entry = self.entry()?;
        tokio::task::spawn_blocking(move || match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(anyhow::Error::new(e).context("delete keyring entry")),
        })
        .await??;
        debug!("Cleared calendar credential from keyring");
        Ok(())
    }
}

/// In-memory credential storage for tests
#[derive(Debug, Default)]
pub struct MemoryCredentialProvider {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider pre-loaded with a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait::async_trait]
impl ICredentialProvider for MemoryCredentialProvider {
    async fn access_token(&self) -> anyhow::Result<Option<String>> {
        Ok(self.token.lock().expect("credential lock").clone())
    }

    async fn store(&self, token: &str) -> anyhow::Result<()> {
        *self.token.lock().expect("credential lock") = Some(token.to_string());
        Ok(())
    }

    async fn invalidate(&self) -> anyhow::Result<()> {
        *self.token.lock().expect("credential lock") = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider_roundtrip() {
        let provider = MemoryCredentialProvider::new();
        assert!(provider.access_token().await.unwrap().is_none());

        provider.store("tok_1").await.unwrap();
        assert_eq!(
            provider.access_token().await.unwrap().as_deref(),
            Some("tok_1")
        );

        provider.invalidate().await.unwrap();
        assert!(provider.access_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_with_token() {
        let provider = MemoryCredentialProvider::with_token("tok_2");
        assert_eq!(
            provider.access_token().await.unwrap().as_deref(),
            Some("tok_2")
        );
    }
}
