//! Client configuration

use crate::client::ClientError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for building a [`crate::BrewClient`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `https://api.brewdesk.app`
    pub base_url: String,

    /// Request timeout in seconds (0 disables the timeout)
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Route the host navigates to once a session ends
    pub login_route: String,

    /// Path of the token-refresh endpoint
    pub refresh_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 30,
            user_agent: concat!("brewdesk-client/", env!("CARGO_PKG_VERSION")).to_string(),
            login_route: "/login".to_string(),
            refresh_path: "/auth/refresh".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a file, with `BREWDESK_*` environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a
    /// complete configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClientError> {
        let settings = Self::defaults()?
            .add_source(::config::File::from(path.as_ref()))
            .add_source(::config::Environment::with_prefix("BREWDESK"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load configuration from defaults and `BREWDESK_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable has the wrong type
    pub fn from_env() -> Result<Self, ClientError> {
        let settings = Self::defaults()?
            .add_source(::config::Environment::with_prefix("BREWDESK"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    fn defaults() -> Result<::config::ConfigBuilder<::config::builder::DefaultState>, ClientError> {
        let defaults = Self::default();

        Ok(::config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .set_default("user_agent", defaults.user_agent)?
            .set_default("login_route", defaults.login_route)?
            .set_default("refresh_path", defaults.refresh_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.login_route, "/login");
        assert_eq!(config.refresh_path, "/auth/refresh");
        assert!(config.user_agent.starts_with("brewdesk-client/"));
    }

    #[test]
    fn test_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "base_url = \"https://api.example.test\"\ntimeout_secs = 5").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "https://api.example.test");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.login_route, "/login");
    }
}
