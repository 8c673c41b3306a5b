//! Notification sink port (driven/secondary port)
//!
//! Interface for user-visible outcomes: success toasts, failure messages,
//! and the credential-expiry prompt. Delivery is fire-and-forget from the
//! engine's perspective; implementations should swallow their own delivery
//! failures rather than fail a sync operation over a toast.

use serde::{Deserialize, Serialize};

/// Severity of a user-visible notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSeverity {
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for NotificationSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationSeverity::Info => "info",
            NotificationSeverity::Success => "success",
            NotificationSeverity::Warning => "warning",
            NotificationSeverity::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// A user-visible notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short, descriptive title
    pub title: String,
    /// Body text with details about the outcome
    pub message: String,
    pub severity: NotificationSeverity,
}

impl Notification {
    /// Creates a notification with the given title and message
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        severity: NotificationSeverity,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
        }
    }

    /// Creates an informational notification
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NotificationSeverity::Info)
    }

    /// Creates a success notification
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NotificationSeverity::Success)
    }

    /// Creates a warning notification
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NotificationSeverity::Warning)
    }

    /// Creates an error notification
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NotificationSeverity::Error)
    }
}

/// Port trait for delivering user-visible outcomes
#[async_trait::async_trait]
pub trait INotificationSink: Send + Sync {
    /// Delivers a notification; fire-and-forget
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()>;
}
