//! Queue timing configuration.

use std::time::Duration;

use crate::types::ToastKind;
use crate::{Result, ToastError};

/// Timing knobs shared by every toast in a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Lifetime used by the `success`/`info`/`warning` shorthands.
    pub default_duration: Duration,
    /// Lifetime used by the `error` shorthand.
    pub error_duration: Duration,
    /// Delay between a removal trigger and the toast leaving the list.
    pub exit_transition: Duration,
    /// How often progress watchers are refreshed.
    pub progress_interval: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            default_duration: Duration::from_millis(4000),
            error_duration: Duration::from_millis(6000),
            exit_transition: Duration::from_millis(300),
            progress_interval: Duration::from_millis(50),
        }
    }
}

impl QueueConfig {
    /// Lifetime the shorthand producers use for `kind`.
    pub fn duration_for(&self, kind: ToastKind) -> Duration {
        match kind {
            ToastKind::Error => self.error_duration,
            _ => self.default_duration,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.progress_interval.is_zero() {
            return Err(ToastError::InvalidDuration {
                field: "progress_interval",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(QueueConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_progress_interval_rejected() {
        let config = QueueConfig {
            progress_interval: Duration::ZERO,
            ..QueueConfig::default()
        };
        let err = config.validate().expect_err("zero interval must fail");
        assert!(err.to_string().contains("progress_interval"));
    }

    #[test]
    fn error_kind_uses_error_duration() {
        let config = QueueConfig::default();
        assert_eq!(config.duration_for(ToastKind::Error), config.error_duration);
        assert_eq!(config.duration_for(ToastKind::Warning), config.default_duration);
    }
}
