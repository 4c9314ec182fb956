//! Configuration for triaged.
//!
//! Loads settings from a TOML file or falls back to defaults. The path can
//! be overridden with the TRIAGED_CONFIG environment variable.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default config file path
pub const CONFIG_PATH: &str = "/etc/triaged/config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Insert demo doctors and ambulance units into an empty store on boot
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

fn default_listen_addr() -> String {
    "127.0.0.1:7850".to_string()
}

fn default_seed_demo_data() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

impl Config {
    /// Load from the given path, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Resolve the config path from the environment or the default location.
    pub fn resolve_path() -> std::path::PathBuf {
        std::env::var_os("TRIAGED_CONFIG")
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|| std::path::PathBuf::from(CONFIG_PATH))
    }
}
