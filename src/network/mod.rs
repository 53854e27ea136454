//! REST plumbing: runtime API configuration and the fetch-based client.

pub mod api_client;
mod config;

use std::cell::RefCell;

pub use config::ApiConfig;

thread_local! {
    static API_CONFIG: RefCell<ApiConfig> = RefCell::new(ApiConfig::default());
}

/// Install the runtime API base URL.  Called once from the host page via
/// the exported `init_api_config_js`.
pub fn init_api_config(base_url: &str) {
    API_CONFIG.with(|cfg| {
        *cfg.borrow_mut() = ApiConfig::from_url(base_url);
    });
}

pub fn get_api_base_url() -> String {
    API_CONFIG.with(|cfg| cfg.borrow().base_url().to_string())
}
