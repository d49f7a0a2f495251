//! Configuration for the station ledger

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Document file for the station store (None = in-memory only)
    pub data_path: Option<PathBuf>,

    /// Chain seeding parameters, used when no document file exists yet
    pub chain: ChainConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            chain: ChainConfig::default(),
        }
    }
}

/// Parameters for seeding a fresh chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Number of stations, positions 0..length-1
    pub length: u32,

    /// Initial on-hand stock per station
    pub initial_qty: i64,

    /// Initial pending-sell queue per station
    pub initial_to_sell: i64,

    /// Delivery time attribute per station
    pub delivery_time: u32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            length: 4,
            initial_qty: 100,
            initial_to_sell: 0,
            delivery_time: 2,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(path) = std::env::var("LEDGER_DATA_PATH") {
            config.data_path = Some(PathBuf::from(path));
        }

        if let Ok(length) = std::env::var("LEDGER_CHAIN_LENGTH") {
            config.chain.length = length
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid chain length: {}", e)))?;
        }

        Ok(config)
    }
}
