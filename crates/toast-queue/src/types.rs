//! Toast type definitions.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::progress::elapsed_ratio;

/// Unique toast identifier. Never reused within a process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(String);

impl ToastId {
    pub(crate) fn new(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ToastId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for ToastId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Visual category of a toast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

impl ToastKind {
    /// Parse a kind name. Unknown names fall back to [`ToastKind::Info`].
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" | "warn" => Self::Warning,
            _ => Self::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a toast is in its on-screen life.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastPhase {
    #[default]
    Visible,
    /// Exit transition running; the toast leaves the list when it ends.
    Exiting,
}

/// A toast as seen by renderers.
#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    /// Lifetime in milliseconds, `0` = until dismissed.
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
    pub phase: ToastPhase,
    #[serde(skip)]
    pub(crate) started: Instant,
}

impl Toast {
    pub(crate) fn new(id: ToastId, message: String, kind: ToastKind, duration: Duration) -> Self {
        Self {
            id,
            message,
            kind,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            created_at: Utc::now(),
            phase: ToastPhase::Visible,
            started: Instant::now(),
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Whether the toast stays until dismissed.
    pub fn is_persistent(&self) -> bool {
        self.duration_ms == 0
    }

    pub fn is_exiting(&self) -> bool {
        self.phase == ToastPhase::Exiting
    }

    /// Elapsed share of the lifetime right now, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        elapsed_ratio(self.started, self.duration(), Instant::now())
    }
}
