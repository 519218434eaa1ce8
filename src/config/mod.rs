use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod device;
pub mod migrate;
pub mod provider;

pub use device::DeviceConfig;
pub use provider::{ConfigProvider, MemoryConfigProvider, YamlConfigProvider};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub export_path: String,
    #[serde(default)]
    pub file_format: ExportFormat,
    #[serde(default)]
    pub active_device: usize,
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
    #[serde(default = "default_save_details")]
    pub save_details: bool,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}

fn default_save_details() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            export_path: String::new(),
            file_format: ExportFormat::default(),
            active_device: 0,
            devices: Vec::new(),
            save_details: default_save_details(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.zkexport`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".zkexport")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("zkexport.conf")
    }

    /// Return the full path of the SQLite audit database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("zkexport.sqlite")
    }

    /// The device selected by `active_device`.
    pub fn active_device(&self) -> AppResult<&DeviceConfig> {
        self.devices.get(self.active_device).ok_or_else(|| {
            AppError::Configuration(format!(
                "active device index {} is out of range ({} device(s) configured)",
                self.active_device,
                self.devices.len()
            ))
        })
    }

    /// Export directory; empty means the current directory.
    pub fn export_dir(&self) -> PathBuf {
        if self.export_path.trim().is_empty() {
            PathBuf::from(".")
        } else {
            crate::utils::path::expand_tilde(&self.export_path)
        }
    }
}
