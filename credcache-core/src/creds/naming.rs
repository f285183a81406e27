//! Credential names and where their artifacts live on disk.
//!
//! A name is the stable identifier scripts use to look a credential up. It is
//! restricted to word characters and hyphens so that it is always safe to use
//! as a single path segment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::StoreConfig;
use crate::consts::{DEFAULT_STORE_DIR_NAME, PASSWORD_EXTENSION, USERNAME_EXTENSION};
use crate::creds::platform;
use crate::error::{Result, StoreError};

static NAME_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[\w-]+$").expect("Failed to compile credential name regex"));

/// Check that `name` is usable as a credential name.
///
/// # Errors
///
/// Returns [`StoreError::InvalidName`] if the name is empty or contains
/// whitespace or any character other than a word character or hyphen.
pub fn validate_name(name: &str) -> Result<()> {
  if NAME_PATTERN.is_match(name) {
    Ok(())
  } else {
    Err(StoreError::InvalidName(name.to_string()))
  }
}

/// Pick the store directory for a call.
///
/// An explicit override wins, then the configured default store, then
/// `<home>/Credentials`.
pub fn resolve_store_dir(store_override: Option<&Path>, config: &StoreConfig) -> Result<PathBuf> {
  if let Some(dir) = store_override {
    return Ok(dir.to_path_buf());
  }

  if let Some(dir) = &config.default_store {
    return Ok(dir.clone());
  }

  config
    .home
    .resolve()
    .map(|home| home.join(DEFAULT_STORE_DIR_NAME))
    .ok_or(StoreError::NoHomeDirectory)
}

/// Create the store directory if it does not exist yet.
///
/// Only the final directory is created; a missing parent is reported as
/// [`StoreError::StoreUnavailable`], as is a path that exists but is not a
/// directory.
pub fn ensure_store_dir(dir: &Path) -> Result<()> {
  let unavailable = |source: io::Error| StoreError::StoreUnavailable {
    path: dir.to_path_buf(),
    source,
  };

  match fs::metadata(dir) {
    Ok(metadata) if metadata.is_dir() => Ok(()),
    Ok(_) => Err(unavailable(io::Error::other("path exists but is not a directory"))),
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      fs::create_dir(dir).map_err(unavailable)?;
      platform::secure_dir(dir).map_err(unavailable)?;
      tracing::debug!("Created credential store {}", dir.display());
      Ok(())
    }
    Err(e) => Err(unavailable(e)),
  }
}

/// The two files that make up one stored credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
  pub name: String,
  pub username: PathBuf,
  pub password: PathBuf,
}

impl ArtifactPaths {
  /// Derive the artifact paths for `name` inside `store_dir`.
  ///
  /// The name is expected to have passed [`validate_name`].
  pub fn new(store_dir: &Path, name: &str) -> Self {
    Self {
      name: name.to_string(),
      username: store_dir.join(format!("{name}.{USERNAME_EXTENSION}")),
      password: store_dir.join(format!("{name}.{PASSWORD_EXTENSION}")),
    }
  }

  /// Validate `name`, resolve and create the store directory, and derive the
  /// artifact paths
  pub fn resolve(name: &str, store_override: Option<&Path>, config: &StoreConfig) -> Result<Self> {
    validate_name(name)?;
    let store_dir = resolve_store_dir(store_override, config)?;
    ensure_store_dir(&store_dir)?;
    Ok(Self::new(&store_dir, name))
  }
}

/// Completeness of a record found while listing a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
  /// Both artifacts exist
  Complete,
  /// Only the username artifact exists
  UsernameOnly,
  /// Only the secret artifact exists
  PasswordOnly,
}

/// List the credential names present in `store_dir`, sorted by name.
///
/// Files whose stem is not a valid name are ignored. A missing store
/// directory lists as empty.
pub fn list_records(store_dir: &Path) -> Result<Vec<(String, RecordState)>> {
  let entries = match fs::read_dir(store_dir) {
    Ok(entries) => entries,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
    Err(source) => {
      return Err(StoreError::StoreUnavailable {
        path: store_dir.to_path_buf(),
        source,
      });
    }
  };

  let mut names = Vec::new();
  for entry in entries.flatten() {
    let path = entry.path();
    let (Some(stem), Some(extension)) = (
      path.file_stem().and_then(|s| s.to_str()),
      path.extension().and_then(|s| s.to_str()),
    ) else {
      continue;
    };

    if (extension == USERNAME_EXTENSION || extension == PASSWORD_EXTENSION) && validate_name(stem).is_ok() {
      names.push(stem.to_string());
    }
  }

  names.sort();
  names.dedup();

  Ok(
    names
      .into_iter()
      .map(|name| {
        let paths = ArtifactPaths::new(store_dir, &name);
        let state = match (paths.username.is_file(), paths.password.is_file()) {
          (true, false) => RecordState::UsernameOnly,
          (false, true) => RecordState::PasswordOnly,
          _ => RecordState::Complete,
        };
        (name, state)
      })
      .collect(),
  )
}
