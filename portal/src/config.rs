use std::time::Duration;

use careconnect::{seed::USER_COORDINATES, Coordinates};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "careconnect.json";
pub const CONFIG_PATH_ENV: &str = "CARECONNECT_CONFIG";

/// What the position lookup reports back.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSetting {
    Fixed(Coordinates),
    Denied,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub debounce_ms: u64,
    pub storage_path: String,
    pub location: LocationSetting,
    pub location_timeout_ms: u64,
}

impl Default for PortalConfig {
    fn default() -> PortalConfig {
        PortalConfig {
            debounce_ms: 1500,
            storage_path: "careconnect_storage.json".to_string(),
            location: LocationSetting::Fixed(USER_COORDINATES),
            location_timeout_ms: 10_000,
        }
    }
}

impl PortalConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_millis(self.location_timeout_ms)
    }

    pub fn load(path: &str) -> anyhow::Result<PortalConfig> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str::<PortalConfig>(&json)?;
        Ok(config)
    }

    /// Reads the file named by `CARECONNECT_CONFIG` (or `careconnect.json`),
    /// falling back to defaults when it is missing or malformed.
    pub fn load_or_default() -> PortalConfig {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match PortalConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("using default config, could not load {path}: {e}");
                PortalConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: PortalConfig = serde_json::from_str(r#"{"debounce_ms": 200}"#).unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(200));
        assert_eq!(config.location, LocationSetting::Fixed(USER_COORDINATES));
        assert_eq!(config.storage_path, "careconnect_storage.json");
    }

    #[test]
    fn test_location_settings() {
        let config: PortalConfig = serde_json::from_str(r#"{"location": "denied"}"#).unwrap();
        assert_eq!(config.location, LocationSetting::Denied);

        let config: PortalConfig = serde_json::from_str(r#"{"location": {"fixed": {"lat": 1.5, "lon": 2.5}}}"#).unwrap();
        assert_eq!(config.location, LocationSetting::Fixed(Coordinates::new(1.5, 2.5)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("careconnect.json");
        std::fs::write(&path, r#"{"location": "unsupported", "location_timeout_ms": 50}"#).unwrap();
        let config = PortalConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.location, LocationSetting::Unsupported);
        assert_eq!(config.location_timeout(), Duration::from_millis(50));
        assert!(PortalConfig::load(dir.path().join("missing.json").to_str().unwrap()).is_err());
    }
}
