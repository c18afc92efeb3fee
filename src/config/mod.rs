//=====================================================
// File: config/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Scenario runner settings
// Objective: Load TOML settings from an explicit path, the user config
//            directory, or fall back to built-in defaults
//=====================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_DIR: &str = "scenario";
pub const CONFIG_FILE: &str = "config.toml";

const DEFAULT_ACCOUNTS: [&str; 7] = [
    "Admin", "Bank", "Geoff", "Torrey", "Robert", "Coburn", "Jared",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Account that acts when a line does not say otherwise.
    pub default_from: String,
    /// Names bound, in order, to the transport's unlocked accounts.
    pub accounts: Vec<String>,
    /// Extra name -> hex address bindings.
    pub aliases: BTreeMap<String, String>,
    /// Seed for the in-memory chain.
    pub chain_seed: u64,
    /// Echo `Print`/`Read` output while running scripts.
    pub print_values: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert(
            "Zero".to_string(),
            "0x0000000000000000000000000000000000000000".to_string(),
        );
        Self {
            default_from: "Admin".to_string(),
            accounts: DEFAULT_ACCOUNTS.iter().map(|name| name.to_string()).collect(),
            aliases,
            chain_seed: 0,
            print_values: true,
        }
    }
}

impl Settings {
    pub fn from_toml_str(source: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading settings");
        Self::from_toml_str(&source, path)
    }

    /// `explicit` if given, else the user config file when it exists, else
    /// defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}


//=====================================================
// End of file
//=====================================================
