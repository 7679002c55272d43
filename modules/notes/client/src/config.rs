use std::path::PathBuf;
use std::time::Duration;

/// Environment variable names
pub mod env_vars {
    pub const API_URL: &str = "NOTES_API_URL";
    pub const CACHE_DIR: &str = "NOTES_CACHE_DIR";
    /// Seconds before a store call counts as failed
    pub const REQUEST_TIMEOUT_SECS: &str = "NOTES_REQUEST_TIMEOUT_SECS";
}

/// Default values
pub mod defaults {
    pub const API_URL: &str = "http://127.0.0.1:5000";
    pub const CACHE_DIR: &str = "./.notes-cache";
    pub const REQUEST_TIMEOUT_SECS: u64 = 5;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub cache_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::API_URL.to_string(),
            cache_dir: PathBuf::from(defaults::CACHE_DIR),
            request_timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Read from the process environment. Call `dotenvy::dotenv()` first
    /// if a `.env` file should be honoured.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; missing or unparseable values
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(env_vars::API_URL)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| defaults::API_URL.to_string());

        let cache_dir = lookup(env_vars::CACHE_DIR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(defaults::CACHE_DIR));

        let timeout_secs = lookup(env_vars::REQUEST_TIMEOUT_SECS)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults::REQUEST_TIMEOUT_SECS);

        Self {
            api_url,
            cache_dir,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
