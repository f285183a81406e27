//! # Configuration Management
//!
//! Resolves credcache's platform directories, loads the optional
//! `config.toml`, and assembles the [`StoreConfig`] a
//! [`CredentialStore`](crate::creds::policy::CredentialStore) is built from.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};

use crate::consts::{APPLICATION, CONFIG_FILE_NAME, ENV_KEY_FILE, ENV_STORE_PATH, KEY_FILE_NAME};
use crate::creds::platform::{ProtectionProvider, default_protection_provider};

/// Represents the configuration directories for credcache
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("", "", APPLICATION).context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
      data_dir: proj_dirs.data_dir().to_path_buf(),
    })
  }

  /// Get the config directory
  pub fn config_dir(&self) -> &Path {
    &self.config_dir
  }

  /// Get the data directory
  pub fn data_dir(&self) -> &Path {
    &self.data_dir
  }

  /// Get the path to the configuration file
  pub fn config_path(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE_NAME)
  }

  /// Get the default path of the Unix protection key
  pub fn key_file_path(&self) -> PathBuf {
    self.data_dir.join(KEY_FILE_NAME)
  }

  /// Load settings from the config file, or defaults when it does not exist
  pub fn load_settings(&self) -> Result<Settings> {
    let config_path = self.config_path();

    if !config_path.exists() {
      return Ok(Settings::default());
    }

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", config_path.display()))
  }

  /// Save settings to the config file
  pub fn save_settings(&self, settings: &Settings) -> Result<()> {
    let config_path = self.config_path();

    fs::create_dir_all(&self.config_dir)
      .with_context(|| format!("Failed to create config directory {}", self.config_dir.display()))?;

    let content = toml::to_string_pretty(settings).context("Failed to serialize settings to TOML")?;

    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))
  }
}

/// User settings read from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Store directory used when a call does not name one
  pub store_path: Option<PathBuf>,
}

/// Source of the user's home directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeDir {
  /// Ask the operating system
  System,
  /// Use a fixed directory
  Fixed(PathBuf),
}

impl HomeDir {
  pub fn resolve(&self) -> Option<PathBuf> {
    match self {
      Self::System => BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
      Self::Fixed(path) => Some(path.clone()),
    }
  }
}

/// Everything the credential store needs from its environment, injected once
/// at construction
pub struct StoreConfig {
  pub home: HomeDir,
  pub protection: Box<dyn ProtectionProvider>,
  /// Store directory used when a call does not name one; falls back to
  /// `<home>/Credentials` when unset
  pub default_store: Option<PathBuf>,
}

impl StoreConfig {
  pub const fn new(home: HomeDir, protection: Box<dyn ProtectionProvider>) -> Self {
    Self {
      home,
      protection,
      default_store: None,
    }
  }

  pub fn with_default_store(mut self, store: impl Into<PathBuf>) -> Self {
    self.default_store = Some(store.into());
    self
  }

  /// Build the production configuration from the platform directories, the
  /// config file and the `CREDCACHE_*` environment variables
  pub fn from_env() -> Result<Self> {
    let config_dirs = ConfigDirs::new()?;
    let settings = config_dirs.load_settings()?;

    let key_path = path_override(env::var_os(ENV_KEY_FILE)).unwrap_or_else(|| config_dirs.key_file_path());
    let default_store = path_override(env::var_os(ENV_STORE_PATH)).or(settings.store_path);

    tracing::debug!(
      "Loaded store configuration (default store: {:?}, key file: {})",
      default_store,
      key_path.display()
    );

    Ok(Self {
      home: HomeDir::System,
      protection: default_protection_provider(&key_path),
      default_store,
    })
  }
}

/// A path taken from an environment variable; set-but-empty counts as unset
fn path_override(value: Option<OsString>) -> Option<PathBuf> {
  value.filter(|value| !value.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  fn dirs_in(temp_dir: &TempDir) -> ConfigDirs {
    ConfigDirs {
      config_dir: temp_dir.path().join("config"),
      data_dir: temp_dir.path().join("data"),
    }
  }

  #[test]
  fn test_missing_config_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_dirs = dirs_in(&temp_dir);

    let settings = config_dirs.load_settings().unwrap();
    assert_eq!(settings, Settings::default());
  }

  #[test]
  fn test_settings_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_dirs = dirs_in(&temp_dir);

    let settings = Settings {
      store_path: Some(PathBuf::from("/srv/creds")),
    };
    config_dirs.save_settings(&settings).unwrap();

    assert!(config_dirs.config_path().exists());
    assert_eq!(config_dirs.load_settings().unwrap(), settings);
  }

  #[test]
  fn test_malformed_config_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_dirs = dirs_in(&temp_dir);
    fs::create_dir_all(config_dirs.config_dir()).unwrap();
    fs::write(config_dirs.config_path(), "store_path = [").unwrap();

    let err = config_dirs.load_settings().unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
  }

  #[test]
  fn test_key_file_lives_in_data_dir() {
    let temp_dir = TempDir::new().unwrap();
    let config_dirs = dirs_in(&temp_dir);

    assert_eq!(config_dirs.key_file_path(), temp_dir.path().join("data").join(KEY_FILE_NAME));
  }

  #[test]
  fn test_empty_path_override_is_ignored() {
    assert_eq!(path_override(None), None);
    assert_eq!(path_override(Some(OsString::new())), None);
    assert_eq!(
      path_override(Some(OsString::from("/srv/creds"))),
      Some(PathBuf::from("/srv/creds"))
    );
  }

  #[test]
  fn test_fixed_home_resolves_to_itself() {
    let home = HomeDir::Fixed(PathBuf::from("/home/ops"));
    assert_eq!(home.resolve(), Some(PathBuf::from("/home/ops")));
  }
}
