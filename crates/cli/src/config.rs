//! CLI configuration utilities

use anyhow::{Context, Result};
use brewdesk_core::FileSessionStore;
use brewdesk_http::client::FnExpiryHandler;
use brewdesk_http::{BrewClient, BrewClientBuilder, ClientConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

const CONFIG_FILE: &str = "client.toml";
const SESSION_FILE: &str = "session.json";

/// Data directory: explicit flag or `BREWDESK_STATE_DIR`, else the platform data dir
pub fn resolve_data_dir(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("brewdesk")
    })
}

/// Everything a command needs to talk to the backend
pub struct CommandContext {
    pub data_dir: PathBuf,
    pub client_config: ClientConfig,
}

impl CommandContext {
    pub fn load(data_dir: PathBuf, config_file: Option<PathBuf>) -> Result<Self> {
        let client_config = load_client_config(&data_dir, config_file)?;
        Ok(Self {
            data_dir,
            client_config,
        })
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    /// Build a client backed by the on-disk session.
    ///
    /// An expired session in a terminal has nowhere to navigate to, so the
    /// expiry hook prints how to sign in again.
    pub fn client(&self) -> Result<BrewClient> {
        let store = FileSessionStore::open(self.session_path())
            .with_context(|| format!("opening session at {}", self.session_path().display()))?;

        let client = BrewClientBuilder::from_config(&self.client_config)
            .session_store(Arc::new(store))
            .on_session_expired(Arc::new(FnExpiryHandler(|login_route: &str| {
                eprintln!("Your session has expired ({login_route}). Run `brewdesk login` to sign in again.");
            })))
            .build()?;

        Ok(client)
    }
}

fn load_client_config(data_dir: &Path, config_file: Option<PathBuf>) -> Result<ClientConfig> {
    let path = config_file.or_else(|| {
        let default_path = data_dir.join(CONFIG_FILE);
        default_path.exists().then_some(default_path)
    });

    if let Some(path) = path {
        info!("Loading configuration from: {}", path.display());
        ClientConfig::from_file(&path)
            .with_context(|| format!("loading client config {}", path.display()))
    } else {
        info!("Using default configuration with environment overrides");
        Ok(ClientConfig::from_env()?)
    }
}
