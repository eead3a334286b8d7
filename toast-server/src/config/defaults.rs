//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("SERVER_PORT", "8080", "Port of the HTTP/WebSocket server"),
    (
        "TOAST_DEFAULT_DURATION_MS",
        "4000",
        "Lifetime of success/info/warning toasts (0 = until dismissed)",
    ),
    (
        "TOAST_ERROR_DURATION_MS",
        "6000",
        "Lifetime of error toasts (0 = until dismissed)",
    ),
    (
        "TOAST_EXIT_TRANSITION_MS",
        "300",
        "Delay between dismissal and removal, for exit animations",
    ),
    (
        "TOAST_PROGRESS_INTERVAL_MS",
        "50",
        "Refresh interval of progress watchers",
    ),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_setting;

    #[test]
    fn every_default_passes_validation() {
        for def in DEFAULT_SETTINGS.values() {
            assert!(
                validate_setting(def.key, def.default).is_ok(),
                "default of {} should be valid",
                def.key
            );
        }
    }

    #[test]
    fn unknown_key_has_no_default() {
        assert_eq!(get_default("NOPE"), None);
        assert_eq!(get_default("SERVER_PORT"), Some("8080"));
    }
}
