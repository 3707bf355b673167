use crate::constants::{DEFAULT_LEGS, DEFAULT_START_DATE, env_vars};
use crate::error::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub mod paths;
pub mod validation;

use paths::{
    get_config_path, get_default_data_file_path, get_default_log_file_path, get_log_dir_path,
};
use validation::{parse_start_date, validate_config};

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Path to the league snapshot. If not specified, the platform data directory is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file_path: Option<String>,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// Legs used by `schedule` when `--rounds` is not given.
    #[serde(default = "default_legs")]
    pub default_legs: u8,
    /// Season start used by `schedule` when `--start-date` is not given.
    #[serde(default = "default_start_date")]
    pub default_start_date: String,
    /// Fixed RNG seed for reproducible simulations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_legs() -> u8 {
    DEFAULT_LEGS
}

fn default_start_date() -> String {
    DEFAULT_START_DATE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file_path: None,
            log_file_path: None,
            default_legs: default_legs(),
            default_start_date: default_start_date(),
            seed: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// A missing file yields the defaults. Environment variables override
    /// file values.
    ///
    /// # Environment Variables
    /// - `FOOTYSIM_DATA_FILE` - Override snapshot path
    /// - `FOOTYSIM_LOG_FILE` - Override log file path
    /// - `FOOTYSIM_SEED` - Override RNG seed
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            debug!("No config file at {config_path}, using defaults");
            Config::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Applies `FOOTYSIM_*` environment overrides.
    ///
    /// # Errors
    /// * `AppError::Config` - `FOOTYSIM_SEED` is not an unsigned integer
    pub fn apply_env_overrides(&mut self) -> Result<(), AppError> {
        if let Ok(data_file) = std::env::var(env_vars::DATA_FILE) {
            self.data_file_path = Some(data_file);
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Ok(seed) = std::env::var(env_vars::SEED) {
            let seed = seed.trim().parse::<u64>().map_err(|e| {
                AppError::config_error(format!("{} must be an unsigned integer: {e}", env_vars::SEED))
            })?;
            self.seed = Some(seed);
        }

        Ok(())
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(
            self.default_legs,
            &self.default_start_date,
            &self.data_file_path,
            &self.log_file_path,
        )
    }

    /// Season start date from `default_start_date`
    pub fn start_date(&self) -> Result<NaiveDate, AppError> {
        parse_start_date(&self.default_start_date)
    }

    /// Resolved snapshot location
    pub fn data_file(&self) -> PathBuf {
        PathBuf::from(
            self.data_file_path
                .clone()
                .unwrap_or_else(get_default_data_file_path),
        )
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Renders the settings shown by `config --list`.
    pub fn describe(&self, config_path: &str, file_exists: bool) -> String {
        let rule = "────────────────────────────────────";
        let mut lines = vec![
            String::new(),
            "Current Configuration".to_string(),
            rule.to_string(),
            "Config Location:".to_string(),
            if file_exists {
                config_path.to_string()
            } else {
                format!("{config_path} (not created yet, defaults in use)")
            },
            rule.to_string(),
            "Data File:".to_string(),
        ];
        match &self.data_file_path {
            Some(path) => lines.push(path.clone()),
            None => {
                lines.push(get_default_data_file_path());
                lines.push("(Default location)".to_string());
            }
        }
        lines.push(rule.to_string());
        lines.push("Log File Location:".to_string());
        match &self.log_file_path {
            Some(path) => lines.push(path.clone()),
            None => {
                lines.push(get_default_log_file_path());
                lines.push("(Default location)".to_string());
            }
        }
        lines.push(rule.to_string());
        lines.push(format!("Default Legs: {}", self.default_legs));
        lines.push(format!("Default Start Date: {}", self.default_start_date));
        lines.push(format!(
            "Seed: {}",
            self.seed
                .map_or_else(|| "(random)".to_string(), |s| s.to_string())
        ));
        lines.join("\n")
    }

    /// Displays current configuration settings to stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let config = Config::load().await?;
        println!(
            "{}",
            config.describe(&config_path, Path::new(&config_path).exists())
        );
        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without env overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
