//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Settings shared by the API client, the list controllers and the front end.
pub struct ClientConfig {
    /// Root of the backend, without the `/api/v1/` suffix.
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Try `/auth/refresh` on 401 instead of logging out immediately.
    #[serde(default)]
    pub use_refresh_token: bool,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_filter_debounce_ms")]
    pub filter_debounce_ms: u64,
    /// Page size of the admin tables.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Page size of the storefront catalog grid.
    #[serde(default = "default_catalog_page_size")]
    pub catalog_page_size: usize,
    #[serde(default = "default_notification_period_secs")]
    pub notification_period_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_filter_debounce_ms() -> u64 {
    800
}

fn default_page_size() -> usize {
    10
}

fn default_catalog_page_size() -> usize {
    12
}

fn default_notification_period_secs() -> u64 {
    30
}

impl ClientConfig {
    /// Versioned API root every endpoint path is appended to.
    pub fn api_root(&self) -> String {
        format!("{}/api/v1", self.api_base_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    pub fn notification_period(&self) -> Duration {
        Duration::from_secs(self.notification_period_secs)
    }
}
