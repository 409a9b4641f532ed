//! Build-time client configuration

/// Backend used when `EDUQUEST_API_URL` is not set at build time.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Settings baked into the WASM bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the EduQuest backend, without a trailing slash
    pub api_base: String,
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        let trimmed = api_base.trim().trim_end_matches('/');
        let api_base = if trimmed.is_empty() {
            DEFAULT_API_BASE.to_string()
        } else {
            trimmed.to_string()
        };
        Self { api_base }
    }

    /// Read the configuration the bundle was compiled with.
    pub fn from_build_env() -> Self {
        Self::new(option_env!("EDUQUEST_API_URL").unwrap_or(DEFAULT_API_BASE))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}
