//! # Configuration
//!
//! [`Settings`] is assembled with `figment`, later sources overriding earlier ones:
//!
//! 1. Built-in defaults ([`Settings::default`])
//! 2. A TOML file, `table-sync.toml` in the working directory unless a path is given
//! 3. Environment variables prefixed `TABLE_SYNC_`, with `__` between nested keys
//!    (`TABLE_SYNC_DEVICE__ADDRESS=192.168.4.1`)
//!
//! ```toml
//! [device]
//! enabled = true
//! address = "192.168.4.1"
//!
//! [store]
//! delete_mode = "hard"
//! ```

use actor_store::RetirePolicy;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "table-sync.toml";
pub const ENV_PREFIX: &str = "TABLE_SYNC_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to build device client: {0}")]
    DeviceClient(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub device: DeviceSettings,
    pub store: StoreSettings,
    pub hub: HubSettings,
    pub ids: IdSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    pub enabled: bool,
    /// Host, `host:port` or full URL of the indicator device.
    pub address: String,
    pub timeout_secs: u64,
    pub health_timeout_secs: u64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            address: String::new(),
            timeout_secs: 5,
            health_timeout_secs: 3,
        }
    }
}

/// How `deleteTable` treats the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Keep the record with `isActive = false`.
    #[default]
    Soft,
    /// Remove the record. Its id is still never reused.
    Hard,
}

impl From<DeleteMode> for RetirePolicy {
    fn from(mode: DeleteMode) -> Self {
        match mode {
            DeleteMode::Soft => RetirePolicy::Soft,
            DeleteMode::Hard => RetirePolicy::Hard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub delete_mode: DeleteMode,
    pub buffer_size: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            delete_mode: DeleteMode::Soft,
            buffer_size: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSettings {
    pub buffer_size: usize,
    /// Events queued per dashboard before further events are dropped for it.
    pub client_buffer: usize,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            client_buffer: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdSettings {
    pub max_attempts: usize,
}

impl Default for IdSettings {
    fn default() -> Self {
        Self {
            max_attempts: crate::id_generator::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Settings {
    /// Loads and validates settings. Without `path`, `table-sync.toml` is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings: Settings = Self::figment(path).extract().map_err(Box::new)?;
        settings.validate()?;
        debug!(?settings, "Configuration loaded");
        Ok(settings)
    }

    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("store.buffer_size", self.store.buffer_size),
            ("hub.buffer_size", self.hub.buffer_size),
            ("hub.client_buffer", self.hub.client_buffer),
            ("ids.max_attempts", self.ids.max_attempts),
        ];
        if let Some((key, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid(format!("{key} must be greater than zero")));
        }
        if self.device.timeout_secs == 0 || self.device.health_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "device timeouts must be greater than zero".into(),
            ));
        }
        if self.device.enabled && self.device.address.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "device.address is required when the device is enabled".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            let settings = Settings::load(None).map_err(|e| e.to_string())?;
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.device.timeout_secs, 5);
            assert_eq!(settings.device.health_timeout_secs, 3);
            assert_eq!(settings.store.delete_mode, DeleteMode::Soft);
            assert_eq!(settings.ids.max_attempts, 50);
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                [device]
                enabled = true
                address = "192.168.4.1"

                [store]
                delete_mode = "hard"
                "#,
            )?;
            jail.set_env("TABLE_SYNC_DEVICE__ADDRESS", "10.0.0.7:8080");
            jail.set_env("TABLE_SYNC_HUB__CLIENT_BUFFER", "8");

            let settings = Settings::load(None).map_err(|e| e.to_string())?;
            assert!(settings.device.enabled);
            assert_eq!(settings.device.address, "10.0.0.7:8080");
            assert_eq!(settings.store.delete_mode, DeleteMode::Hard);
            assert_eq!(settings.hub.client_buffer, 8);
            assert_eq!(settings.hub.buffer_size, 32);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[ids]\nmax_attempts = 7\n")?;
            let settings =
                Settings::load(Some(Path::new("custom.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(settings.ids.max_attempts, 7);
            Ok(())
        });
    }

    #[test]
    fn test_enabled_device_needs_address() {
        Jail::expect_with(|jail| {
            jail.set_env("TABLE_SYNC_DEVICE__ENABLED", "true");
            let result = Settings::load(None);
            assert!(matches!(result, Err(ConfigError::Invalid(_))));
            Ok(())
        });
    }

    #[test]
    fn test_zero_values_are_rejected() {
        let mut settings = Settings::default();
        settings.hub.client_buffer = 0;
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(msg)) if msg.contains("hub.client_buffer")));

        let mut settings = Settings::default();
        settings.device.timeout_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_unknown_delete_mode_fails_to_load() {
        Jail::expect_with(|jail| {
            jail.set_env("TABLE_SYNC_STORE__DELETE_MODE", "archive");
            assert!(matches!(Settings::load(None), Err(ConfigError::Load(_))));
            Ok(())
        });
    }
}
