//! Configuration loading and root folder resolution
//!
//! The root folder holds every user workspace (`<root>/users/<name>/...`).
//! Resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. `SHOPPULSE_ROOT` environment variable
//! 3. TOML config file (`shoppulse/config.toml` under the platform config dir)
//! 4. OS-dependent compiled default (fallback)

use std::path::PathBuf;

/// Environment variable consulted when no CLI argument is given
pub const ROOT_ENV_VAR: &str = "SHOPPULSE_ROOT";

/// Resolve the workspace root folder
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(config_path) = config_file_path() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Default configuration file path for the platform, if one exists
fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("shoppulse").join("config.toml"));
    if let Some(path) = &user_config {
        if path.exists() {
            return user_config;
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/shoppulse/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("shoppulse"))
        .unwrap_or_else(|| PathBuf::from("./shoppulse_data"))
}
