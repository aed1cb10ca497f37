use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SverError};
use crate::git::command::DEFAULT_GIT_BINARY;
use crate::registry::DEFAULT_SERVER;

/// File name looked up in the current and user config directories
pub const CONFIG_FILE_NAME: &str = "sver.toml";

/// Represents the complete configuration for sver.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub registry: RegistryConfig,
}

fn default_git_binary() -> String {
    DEFAULT_GIT_BINARY.to_string()
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

/// Version-control tool settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    /// Name or path of the git binary
    #[serde(default = "default_git_binary")]
    pub binary: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            binary: default_git_binary(),
        }
    }
}

/// Defaults for the `tags` subcommand.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RegistryConfig {
    #[serde(default = "default_server")]
    pub server: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            server: default_server(),
            username: None,
            password: None,
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `sver.toml` in current directory
/// 3. `sver.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    match locate(config_path) {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}

fn locate(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        SverError::config(format!("cannot read '{}': {}", path.display(), e))
    })?;

    toml::from_str(&content)
        .map_err(|e| SverError::config(format!("cannot parse '{}': {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.git.binary, "git");
        assert_eq!(config.registry.server, "https://registry-1.docker.io/");
        assert_eq!(config.registry.username, None);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str("[registry]\nusername = \"bot\"\n").unwrap();
        assert_eq!(config.git.binary, "git");
        assert_eq!(config.registry.server, DEFAULT_SERVER);
        assert_eq!(config.registry.username.as_deref(), Some("bot"));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let err = load_config(Some("/definitely/not/here/sver.toml")).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
