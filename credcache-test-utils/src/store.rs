//! Credential store directories for testing

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::TempDir;

/// A throwaway credential store directory
pub struct StoreTestGuard {
  /// The temporary directory used as the store
  pub temp_dir: TempDir,
}

impl Default for StoreTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl StoreTestGuard {
  pub fn new() -> Self {
    Self {
      temp_dir: TempDir::new().expect("Failed to create temporary store directory"),
    }
  }

  /// Get the store directory
  pub fn path(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Path of the username artifact for `name`
  pub fn username_path(&self, name: &str) -> PathBuf {
    self.path().join(format!("{name}.username"))
  }

  /// Path of the secret artifact for `name`
  pub fn password_path(&self, name: &str) -> PathBuf {
    self.path().join(format!("{name}.password"))
  }

  /// Whether either artifact of `name` exists
  pub fn has_any_artifact(&self, name: &str) -> bool {
    self.username_path(name).exists() || self.password_path(name).exists()
  }

  /// Whether both artifacts of `name` exist
  pub fn has_record(&self, name: &str) -> bool {
    self.username_path(name).exists() && self.password_path(name).exists()
  }

  /// Read the stored username for `name`
  pub fn read_username(&self, name: &str) -> anyhow::Result<String> {
    let path = self.username_path(name);
    let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(content.trim_end().to_string())
  }

  /// Remove the secret artifact of `name`, leaving a partial record behind
  pub fn drop_password(&self, name: &str) -> anyhow::Result<()> {
    let path = self.password_path(name);
    fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))
  }
}
