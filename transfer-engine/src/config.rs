//! Configuration for the transfer engine

use serde::{Deserialize, Serialize};

/// Engine configuration, composing ledger and bus settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Station ledger configuration
    pub ledger: station_ledger::Config,

    /// Notification bus settings
    pub bus: BusSettings,
}

/// Serializable bus settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusSettings {
    /// Per-subscriber queue capacity before lagging
    pub capacity: usize,
}

impl Default for BusSettings {
    fn default() -> Self {
        let defaults = notification_bus::BusConfig::default();
        Self {
            capacity: defaults.capacity,
        }
    }
}

impl From<BusSettings> for notification_bus::BusConfig {
    fn from(settings: BusSettings) -> Self {
        Self {
            capacity: settings.capacity,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(station_ledger::Error::Io)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| station_ledger::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config {
            ledger: station_ledger::Config::from_env()?,
            bus: BusSettings::default(),
        };

        if let Ok(capacity) = std::env::var("BUS_CAPACITY") {
            config.bus.capacity = capacity.parse().map_err(|e| {
                station_ledger::Error::Config(format!("Invalid bus capacity: {}", e))
            })?;
        }

        Ok(config)
    }
}
