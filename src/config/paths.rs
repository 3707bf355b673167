use crate::constants::{DATA_FILE_NAME, LOG_FILE_NAME};
use std::path::Path;

const APP_DIR: &str = "footysim";

/// Returns the platform-specific path for the config file.
///
/// # Notes
/// - Uses platform-specific config directory (e.g., ~/.config on Linux)
/// - Falls back to current directory if config directory is unavailable
pub fn get_config_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR)
        .join("config.toml")
        .to_string_lossy()
        .to_string()
}

/// Returns the platform-specific path for the log directory.
pub fn get_log_dir_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR)
        .join("logs")
        .to_string_lossy()
        .to_string()
}

/// Default log file location inside the log directory
pub fn get_default_log_file_path() -> String {
    Path::new(&get_log_dir_path())
        .join(LOG_FILE_NAME)
        .to_string_lossy()
        .to_string()
}

/// Returns the default location of the league snapshot.
///
/// Uses the platform data directory (e.g., ~/.local/share on Linux), falling
/// back to the current directory.
pub fn get_default_data_file_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR)
        .join(DATA_FILE_NAME)
        .to_string_lossy()
        .to_string()
}
