//! Tool configuration loaded from a TOML file with environment overrides

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "rpgfree.toml";
pub const DEFAULT_SETTINGS_FILE: &str = "rpgfree-settings.json";
pub const DEFAULT_PRODUCT_LIBRARY: &str = "ARCAD_RPG";

/// Remote system connection details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Connection name recorded on conversion lists.
    pub name: String,
    /// Base URL of the remote execution service.
    pub base_url: String,
    /// Bearer token, if the service requires one.
    pub token: Option<String>,
    /// Library holding the conversion utility.
    pub product_library: String,
    /// Prioritized library search path for object type resolution.
    pub library_list: Vec<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            name: "DEFAULT".into(),
            base_url: "http://localhost:8022".into(),
            token: None,
            product_library: DEFAULT_PRODUCT_LIBRARY.into(),
            library_list: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
    /// Where default parameters and conversion lists are persisted.
    pub settings_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            connection: ConnectionConfig::default(),
            settings_file: PathBuf::from(DEFAULT_SETTINGS_FILE),
        }
    }
}

impl Config {
    /// Read configuration from `path`, falling back to defaults when the
    /// file does not exist. `RPGFREE_URL` and `RPGFREE_TOKEN` override the
    /// connection fields afterwards.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let mut config = if path.exists() {
            let text = fs::read_to_string(path)
                .map_err(|err| Error::Config(format!("{}: {err}", path.display())))?;
            toml::from_str(&text)
                .map_err(|err| Error::Config(format!("{}: {err}", path.display())))?
        } else {
            Config::default()
        };

        if let Ok(url) = std::env::var("RPGFREE_URL") {
            config.connection.base_url = url;
        }
        if let Ok(token) = std::env::var("RPGFREE_TOKEN") {
            config.connection.token = Some(token);
        }
        Ok(config)
    }
}
