//! Runtime configuration (SPEC_FULL.md "Configuration"): a small, flat set
//! of env-var knobs with compiled-in defaults. No file layering, no nested
//! namespace — this crate has one process, one in-memory store, and no
//! multi-tenant config surface to justify more than that.

mod loader;

pub use loader::load;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub client_url: String,
    pub janitor_interval_secs: u64,
    pub pin_retry_budget: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            client_url: "http://localhost:5173".to_string(),
            janitor_interval_secs: 1800,
            pin_retry_budget: 20,
        }
    }
}
