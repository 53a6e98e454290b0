use std::env;

use tracing::warn;

use super::AppConfig;

/// Reads `key` from the environment and parses it, falling back to
/// `default` on either an unset var or a value that fails to parse (logged,
/// not fatal — a malformed knob shouldn't take the whole process down).
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, raw, "failed to parse env var, using default");
            default
        }),
        Err(_) => default,
    }
}

pub fn load() -> AppConfig {
    let defaults = AppConfig::default();
    AppConfig {
        port: env_or("PORT", defaults.port),
        client_url: env::var("CLIENT_URL").unwrap_or(defaults.client_url),
        janitor_interval_secs: env_or("JANITOR_INTERVAL_SECS", defaults.janitor_interval_secs),
        pin_retry_budget: env_or("PIN_RETRY_BUDGET", defaults.pin_retry_budget),
    }
}
