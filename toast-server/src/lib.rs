//! Toast notification service.
//!
//! Owns the process's toast queue and exposes it to renderers over HTTP and
//! WebSocket.

pub mod app;
pub mod config;
pub mod events;
pub mod server;
pub mod shutdown;

use config::AppConfig;

/// Load `.env` and the runtime configuration.
pub fn init_config() -> AppConfig {
    config::load_dotenv();
    let config = AppConfig::load();
    tracing::info!(
        port = config.server_port,
        default_duration_ms = config.default_duration_ms,
        exit_transition_ms = config.exit_transition_ms,
        "Settings loaded"
    );
    config
}
