use crate::errors::{AppError, AppResult};
use crate::utils::path::{expand_tilde, resolve_in};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory holding synced raw files and their sidecars
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Session checkpoint, relative to `data_dir` unless absolute
    #[serde(default = "default_checkpoint_file")]
    pub checkpoint_file: String,
    #[serde(default = "default_raw_extensions")]
    pub raw_extensions: Vec<String>,
    #[serde(default = "default_source_device")]
    pub source_device: String,
    /// In-flight transfers older than this are shown as pending again
    #[serde(default)]
    pub transfer_timeout_secs: Option<u64>,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_data_dir() -> String {
    Config::config_dir()
        .join("data")
        .to_string_lossy()
        .to_string()
}
fn default_checkpoint_file() -> String {
    "session.checkpoint.json".to_string()
}
fn default_raw_extensions() -> Vec<String> {
    vec!["csv".into(), "bin".into(), "dat".into()]
}
fn default_source_device() -> String {
    "wearable".to_string()
}
fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            checkpoint_file: default_checkpoint_file(),
            raw_extensions: default_raw_extensions(),
            source_device: default_source_device(),
            transfer_timeout_secs: None,
            separator_char: default_separator_char(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rsensorlog")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rsensorlog.conf")
    }

    pub fn data_path(&self) -> PathBuf {
        expand_tilde(&self.data_dir)
    }

    pub fn checkpoint_path(&self) -> PathBuf {
        resolve_in(&self.data_path(), &self.checkpoint_file)
    }

    pub fn transfer_timeout(&self) -> Option<Duration> {
        self.transfer_timeout_secs
            .map(|s| Duration::seconds(s.min(i64::MAX as u64) as i64))
    }

    /// Load configuration from file, or return defaults if not found.
    /// A file that cannot be parsed is reported and replaced by defaults.
    pub fn load() -> Self {
        let path = Self::config_file();

        if !path.exists() {
            return Config::default();
        }

        match Self::load_from(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("using default configuration: {e}");
                Config::default()
            }
        }
    }

    pub fn load_from(path: &std::path::Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Fields missing from the config file on disk (filled by defaults at load).
    pub fn missing_fields() -> AppResult<Vec<String>> {
        let path = Self::config_file();
        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;

        let expected = [
            "data_dir",
            "checkpoint_file",
            "raw_extensions",
            "source_device",
            "transfer_timeout_secs",
            "separator_char",
        ];

        let map = yaml.as_mapping();
        Ok(expected
            .into_iter()
            .filter(|k| map.map(|m| !m.contains_key(*k)).unwrap_or(true))
            .map(|k| k.to_string())
            .collect())
    }

    /// Create the config directory, the config file (unless `is_test`) and
    /// the data directory.
    pub fn init_all(custom_dir: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let mut config = Config::default();
        if let Some(custom) = custom_dir {
            config.data_dir = custom;
        }

        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            fs::write(Self::config_file(), yaml)?;
        }

        fs::create_dir_all(config.data_path())?;

        Ok(config)
    }
}
