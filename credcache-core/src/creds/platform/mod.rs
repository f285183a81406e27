//! Platform-specific secret protection
//!
//! This module provides the per-user encryption primitive the store relies on
//! and the platform-specific file permission handling for stored artifacts.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::creds::Secret;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::*;
#[cfg(windows)]
pub use windows::*;

/// Failures of the protection primitive
#[derive(Debug, Error)]
pub enum ProtectionError {
  #[error("Failed to encrypt secret: {0}")]
  Encrypt(String),

  #[error("Failed to decrypt secret: {0}")]
  Decrypt(String),

  #[error("Protection token is malformed: {0}")]
  MalformedToken(String),

  #[error("Protection key {} is unavailable: {source}", path.display())]
  Key {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Encrypt-for-current-user / decrypt-for-current-user capability.
///
/// Tokens are single-line text. `unprotect` must fail for tokens produced
/// under another user identity or an older key.
pub trait ProtectionProvider {
  /// Encrypt `plaintext` into an opaque token
  fn protect(&self, plaintext: &[u8]) -> Result<String, ProtectionError>;

  /// Decrypt a token produced by [`ProtectionProvider::protect`]
  fn unprotect(&self, token: &str) -> Result<Secret, ProtectionError>;
}

/// Trait for platform-specific file permission operations
pub trait FilePermissions {
  /// Restrict a stored artifact to its owner
  fn set_secure_permissions(path: &Path) -> io::Result<()>;

  /// Restrict a store directory to its owner
  fn set_secure_dir_permissions(path: &Path) -> io::Result<()>;
}

/// Get the protection provider for the current platform.
///
/// `key_path` is where the Unix provider keeps its per-user key; Windows uses
/// DPAPI and ignores it.
pub fn default_protection_provider(key_path: &Path) -> Box<dyn ProtectionProvider> {
  #[cfg(unix)]
  {
    Box::new(unix::KeyFileProtection::new(key_path))
  }
  #[cfg(windows)]
  {
    let _ = key_path;
    Box::new(windows::DpapiProtection)
  }
}

/// Restrict a stored artifact to its owner on the current platform
pub fn secure_file(path: &Path) -> io::Result<()> {
  #[cfg(unix)]
  {
    UnixFilePermissions::set_secure_permissions(path)
  }
  #[cfg(windows)]
  {
    WindowsFilePermissions::set_secure_permissions(path)
  }
}

/// Restrict a store directory to its owner on the current platform
pub fn secure_dir(path: &Path) -> io::Result<()> {
  #[cfg(unix)]
  {
    UnixFilePermissions::set_secure_dir_permissions(path)
  }
  #[cfg(windows)]
  {
    WindowsFilePermissions::set_secure_dir_permissions(path)
  }
}
