use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "LV2KIT_CONFIG";

const KEYS: &[&str] = &["lv2-path", "dyn-manifest", "log-file"];

/// Persistent user settings
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Search path override, entries separated like `$PATH`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lv2_path: Option<String>,
    /// Whether dynamic manifest libraries are run (default on)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dyn_manifest: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

impl Settings {
    /// Location of the settings file
    pub fn path() -> Result<PathBuf, ConfigError> {
        // Explicit override for tests and isolated runs
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        #[cfg(not(target_os = "windows"))]
        let dir = dirs::home_dir().map(|home| home.join(".config"));

        #[cfg(target_os = "windows")]
        let dir = dirs::config_dir();

        dir.map(|dir| dir.join("lv2kit").join("lv2kit.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load settings from the default location, or defaults if absent
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Known keys in display order
    pub fn keys() -> &'static [&'static str] {
        KEYS
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "lv2-path" => self.lv2_path.clone(),
            "dyn-manifest" => self.dyn_manifest.map(|v| v.to_string()),
            "log-file" => self.log_file.clone(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "lv2-path" => self.lv2_path = Some(value),
            "dyn-manifest" => {
                let enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            key: key.to_string(),
                            value,
                        })
                    }
                };
                self.dyn_manifest = Some(enabled);
            }
            "log-file" => self.log_file = Some(value),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.lv2_path.is_none() && self.dyn_manifest.is_none() && self.log_file.is_none()
    }

    pub fn values_iter(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|&key| self.get(key).map(|value| (key, value)))
            .collect()
    }

    /// Dynamic manifests are run unless explicitly disabled
    pub fn dyn_manifest_enabled(&self) -> bool {
        self.dyn_manifest.unwrap_or(true)
    }
}
