//! User-visible notifications emitted by actions.

use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Warning,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub content: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(content: impl Into<String>, severity: Severity) -> Self {
        Self {
            content: content.into(),
            severity,
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self::new(content, Severity::Warning)
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self::new(content, Severity::Success)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(content, Severity::Error)
    }
}

/// Sink for notifications. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
