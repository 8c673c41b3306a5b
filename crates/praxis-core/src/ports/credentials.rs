//! Credential provider port (driven/secondary port)
//!
//! Single capability through which the calendar adapter and the sync engine
//! read and write the external-calendar access token. The token lives in a
//! client-scoped persistent key-value store (not synchronized across
//! devices); validity is checked lazily on first use rather than refreshed
//! proactively.
//!
//! All token reads and writes go through this trait so that a 401 from the
//! provider can invalidate the stored credential in exactly one place.

/// Port trait for access-credential storage
#[async_trait::async_trait]
pub trait ICredentialProvider: Send + Sync {
    /// Returns the stored access token, if any
    async fn access_token(&self) -> anyhow::Result<Option<String>>;

    /// Stores a new access token, replacing any previous one
    async fn store(&self, token: &str) -> anyhow::Result<()>;

    /// Clears the stored credential
    ///
    /// Called by the calendar adapter when the provider answers 401, so the
    /// next operation prompts the user to reconnect instead of replaying a
    /// dead token.
    async fn invalidate(&self) -> anyhow::Result<()>;
}
