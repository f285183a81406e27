//! HOME directory isolation for testing
//!
//! Instead of rewriting the test process's own environment, the guard hands
//! out environment variables that point a spawned `credcache` process at a
//! temporary home, config and data directory. Tests running in parallel
//! therefore never see each other's stores or keys.

use std::path::PathBuf;

use tempfile::TempDir;

/// Environment variables that must not leak from the developer's shell into
/// a spawned process under test
pub const SCRUBBED_VARS: [&str; 3] = ["CREDCACHE_STORE_PATH", "CREDCACHE_KEY_FILE", "RUST_LOG"];

/// A temporary home directory layout for one test
pub struct HomeEnvTestGuard {
  /// The temporary directory holding home, config and data
  pub temp_dir: TempDir,
}

impl Default for HomeEnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl HomeEnvTestGuard {
  /// Create a new isolated home layout
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    for dir in ["home", "config", "data"] {
      std::fs::create_dir_all(temp_dir.path().join(dir)).expect("Failed to create test directory");
    }

    Self { temp_dir }
  }

  /// Get the path to the temporary HOME directory
  pub fn home_dir(&self) -> PathBuf {
    self.temp_dir.path().join("home")
  }

  /// Get the path to the XDG config directory
  pub fn config_dir(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }

  /// Get the path to the XDG data directory
  pub fn data_dir(&self) -> PathBuf {
    self.temp_dir.path().join("data")
  }

  /// Get the path of the protection key used by the spawned process
  pub fn key_file(&self) -> PathBuf {
    self.data_dir().join("protection.key")
  }

  /// Get the default credential store under the temporary HOME
  pub fn default_store(&self) -> PathBuf {
    self.home_dir().join("Credentials")
  }

  /// Environment variables to pass to a spawned process.
  ///
  /// Windows resolves the profile directory without consulting the
  /// environment, so there the default store is pinned explicitly.
  pub fn envs(&self) -> Vec<(&'static str, PathBuf)> {
    let mut envs = vec![
      ("HOME", self.home_dir()),
      ("USERPROFILE", self.home_dir()),
      ("XDG_CONFIG_HOME", self.config_dir()),
      ("XDG_DATA_HOME", self.data_dir()),
      ("CREDCACHE_KEY_FILE", self.key_file()),
    ];

    if cfg!(windows) {
      envs.push(("CREDCACHE_STORE_PATH", self.default_store()));
    }

    envs
  }
}
