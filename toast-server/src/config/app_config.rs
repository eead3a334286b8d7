//! Runtime application configuration loaded from the environment.

use std::time::Duration;

use toast_queue::QueueConfig;

use super::defaults::get_default;
use super::validation::validate_setting;

/// Runtime configuration populated from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server_port: u16,
    pub default_duration_ms: u64,
    pub error_duration_ms: u64,
    pub exit_transition_ms: u64,
    pub progress_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 8080,
            default_duration_ms: 4000,
            error_duration_ms: 6000,
            exit_transition_ms: 300,
            progress_interval_ms: 50,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Missing keys take their default; invalid values are logged and
    /// replaced by the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let g = |key: &str| -> String {
            let default = get_default(key).unwrap_or_default();
            match lookup(key) {
                Some(v) if v.trim().is_empty() => default.to_string(),
                Some(v) => match validate_setting(key, &v) {
                    Ok(()) => v.trim().to_string(),
                    Err(reason) => {
                        tracing::warn!(key, value = %v, %reason, "Invalid setting, using default");
                        default.to_string()
                    }
                },
                None => default.to_string(),
            }
        };

        let defaults = Self::default();
        Self {
            server_port: g("SERVER_PORT").parse().unwrap_or(defaults.server_port),
            default_duration_ms: g("TOAST_DEFAULT_DURATION_MS")
                .parse()
                .unwrap_or(defaults.default_duration_ms),
            error_duration_ms: g("TOAST_ERROR_DURATION_MS")
                .parse()
                .unwrap_or(defaults.error_duration_ms),
            exit_transition_ms: g("TOAST_EXIT_TRANSITION_MS")
                .parse()
                .unwrap_or(defaults.exit_transition_ms),
            progress_interval_ms: g("TOAST_PROGRESS_INTERVAL_MS")
                .parse()
                .unwrap_or(defaults.progress_interval_ms),
        }
    }

    /// Timing configuration for the toast queue.
    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            default_duration: Duration::from_millis(self.default_duration_ms),
            error_duration: Duration::from_millis(self.error_duration_ms),
            exit_transition: Duration::from_millis(self.exit_transition_ms),
            progress_interval: Duration::from_millis(self.progress_interval_ms),
        }
    }
}
