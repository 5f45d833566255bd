// Configuration module

pub mod loader;
pub mod server;
pub mod signing;

pub use loader::HttpLoaderConfig;
pub use server::ServerConfig;
pub use signing::SigningConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Root configuration, loaded from a YAML file. Every section is
/// optional; defaults come from `crate::constants`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub signing: SigningConfig,
    pub loader: HttpLoaderConfig,
}

impl Config {
    /// Load and validate a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, GatewayError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::config_with_context(e.to_string(), format!("reading {}", path.display()))
        })?;
        let config: Config = serde_yaml::from_str(&raw).map_err(|e| {
            GatewayError::config_with_context(e.to_string(), format!("parsing {}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GatewayError> {
        self.signing.validate()
    }
}
