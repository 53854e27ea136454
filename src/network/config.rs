/// API route configuration.
///
/// The host page injects the real base URL at runtime through the exported
/// `init_api_config_js`; the default exists for unit tests and the first
/// moments of start-up.
pub struct ApiConfig {
    base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create an ApiConfig from a URL string.
    pub fn from_url(url: &str) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL for all API calls.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
