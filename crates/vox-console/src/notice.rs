//! User-visible notifications (toasts).

use serde::Serialize;
use vox_client::{ApiError, ErrorKind};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message reporting the outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Error notice for a failed backend call, titled by error kind.
    ///
    /// `context` describes what was being attempted, e.g.
    /// `Could not update Dispute DSP-1`.
    pub fn api_failure(context: &str, err: &ApiError) -> Self {
        let title = match err.kind() {
            ErrorKind::Network => "Network error",
            ErrorKind::Validation => "Validation error",
            ErrorKind::Authorization => "Session expired",
            ErrorKind::Unknown => "Error",
        };
        let detail = match err.kind() {
            ErrorKind::Authorization => "Please sign in again.".to_string(),
            _ => err.message(),
        };
        Self::error(title, format!("{context}: {detail}"))
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}
