//! # Store Errors
//!
//! Typed failures raised while resolving, reading, writing or repairing a
//! stored credential.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::creds::platform::ProtectionError;

/// Errors produced by the credential store
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Invalid credential name '{0}': only letters, digits, underscores and hyphens are allowed")]
  InvalidName(String),

  #[error("Invalid username for credential '{0}': a username must be a single non-empty line")]
  InvalidUsername(String),

  #[error("Credential store {} is unavailable: {source}", path.display())]
  StoreUnavailable {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Cannot determine a home directory for the default credential store")]
  NoHomeDirectory,

  #[error("Credential '{name}' is unreadable: {reason}")]
  Unreadable { name: String, reason: String },

  #[error("Cannot read credential '{0}' and prompting for a new credential is not allowed")]
  PromptSuppressed(String),

  #[error("Failed to write {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Protection(#[from] ProtectionError),

  #[error("Interactive prompt failed: {0}")]
  Prompt(String),
}

impl StoreError {
  /// Whether this error means the store location itself could not be used
  pub const fn is_store_unavailable(&self) -> bool {
    matches!(self, Self::StoreUnavailable { .. } | Self::NoHomeDirectory)
  }
}

/// Result alias used throughout the store
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
