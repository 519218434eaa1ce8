//! Configuration providers: the only place that touches the settings file.

use super::Config;
use super::migrate::upgrade_legacy_settings;
use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Explicit load/save of the application configuration.
pub trait ConfigProvider {
    fn load(&self) -> AppResult<Config>;
    fn save(&self, cfg: &Config) -> AppResult<()>;
}

/// YAML file on disk (`~/.zkexport/zkexport.conf` by default).
pub struct YamlConfigProvider {
    path: PathBuf,
}

impl YamlConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Self {
        Self::new(Config::config_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for YamlConfigProvider {
    /// Missing file → defaults. Legacy flat settings are upgraded in memory.
    fn load(&self) -> AppResult<Config> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "config file not found, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&content).map_err(|e| {
            AppError::Configuration(format!("cannot parse {}: {e}", self.path.display()))
        })?;

        let (value, upgraded) = upgrade_legacy_settings(value);
        if upgraded {
            info!(path = %self.path.display(), "legacy settings layout upgraded");
        }

        serde_yaml::from_value(value).map_err(|e| {
            AppError::Configuration(format!("invalid config {}: {e}", self.path.display()))
        })
    }

    fn save(&self, cfg: &Config) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(cfg)
            .map_err(|e| AppError::Configuration(format!("cannot serialize config: {e}")))?;
        fs::write(&self.path, yaml)?;
        Ok(())
    }
}

/// In-process provider, used by tests and embedders.
pub struct MemoryConfigProvider {
    inner: Mutex<Config>,
}

impl MemoryConfigProvider {
    pub fn new(cfg: Config) -> Self {
        Self {
            inner: Mutex::new(cfg),
        }
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn load(&self) -> AppResult<Config> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| AppError::Configuration("config lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, cfg: &Config) -> AppResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| AppError::Configuration("config lock poisoned".into()))?;
        *guard = cfg.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;
    use std::env;

    fn temp_config(name: &str) -> PathBuf {
        let mut path = env::temp_dir();
        path.push(format!("{name}_zkexport.conf"));
        fs::remove_file(&path).ok();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let provider = YamlConfigProvider::new(temp_config("provider_missing"));
        let cfg = provider.load().unwrap();
        assert!(cfg.devices.is_empty());
        assert_eq!(cfg.active_device, 0);
    }

    #[test]
    fn save_then_load_keeps_devices() {
        let provider = YamlConfigProvider::new(temp_config("provider_roundtrip"));
        let cfg = Config {
            export_path: "/tmp/exports".into(),
            devices: vec![DeviceConfig {
                name: "Gate".into(),
                ip: "10.0.0.7".into(),
                port: 4370,
                timeout: 10,
                password: "0".into(),
                snapshot: None,
            }],
            ..Config::default()
        };
        provider.save(&cfg).unwrap();

        let loaded = provider.load().unwrap();
        assert_eq!(loaded.devices, cfg.devices);
        assert_eq!(loaded.export_path, "/tmp/exports");
    }

    #[test]
    fn legacy_json_settings_are_readable() {
        let path = temp_config("provider_legacy");
        fs::write(
            &path,
            r#"{"device_settings": {"ip_address": "192.168.1.201", "port": 4370, "timeout": 5, "password": "123"}, "file_format": "excel", "export_path": ""}"#,
        )
        .unwrap();

        let cfg = YamlConfigProvider::new(&path).load().unwrap();
        let dev = cfg.active_device().unwrap();
        assert_eq!(dev.ip, "192.168.1.201");
        assert_eq!(dev.password, "123");
    }

    #[test]
    fn garbage_is_configuration_error() {
        let path = temp_config("provider_garbage");
        fs::write(&path, "devices: [: :").unwrap();
        assert!(matches!(
            YamlConfigProvider::new(&path).load(),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn memory_provider_keeps_last_saved() {
        let provider = MemoryConfigProvider::new(Config::default());
        let mut cfg = provider.load().unwrap();
        cfg.save_details = false;
        cfg.active_device = 2;
        provider.save(&cfg).unwrap();

        let loaded = provider.load().unwrap();
        assert!(!loaded.save_details);
        assert_eq!(loaded.active_device, 2);
    }
}
