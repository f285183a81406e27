//! Reading and writing the two artifacts of a stored credential.
//!
//! The username is kept as a single line of plain text. The secret is passed
//! through the [`ProtectionProvider`] and its token is kept as a single line
//! next to it. The two writes are independent: a failure between them leaves
//! the pair inconsistent, which readers treat the same as a missing record.

use std::fs;
use std::io;
use std::path::Path;

use crate::creds::naming::ArtifactPaths;
use crate::creds::platform::{self, ProtectionProvider};
use crate::creds::{Credential, Login};
use crate::error::{Result, StoreError};

/// What was found on disk for a credential name
#[derive(Debug)]
pub enum Lookup {
  /// Both artifacts were read and the secret decrypted
  Found(Credential),
  /// At least one artifact does not exist
  Missing { username: Option<String> },
  /// Both artifacts exist but could not be read or decrypted
  Corrupt { username: Option<String>, reason: String },
}

impl Lookup {
  /// The username recovered from the record, if any
  pub fn recovered_username(&self) -> Option<&str> {
    match self {
      Self::Found(credential) => Some(&credential.username),
      Self::Missing { username } | Self::Corrupt { username, .. } => username.as_deref(),
    }
  }
}

/// Persist `login` under `paths`, overwriting whatever is there.
///
/// The username must be a single non-empty line, since that is all a read
/// can give back. It is checked and the secret protected before anything is
/// written, so either failure leaves the existing artifacts untouched.
pub fn write(paths: &ArtifactPaths, login: &Login, protection: &dyn ProtectionProvider) -> Result<()> {
  if login.username.is_empty() || login.username.contains(['\r', '\n']) {
    return Err(StoreError::InvalidUsername(paths.name.clone()));
  }

  let token = protection.protect(login.secret.expose())?;

  write_artifact(&paths.username, &login.username)?;
  write_artifact(&paths.password, &token)?;

  tracing::info!("Stored credential '{}'", paths.name);
  Ok(())
}

/// Read and decrypt the credential stored under `paths`.
///
/// # Errors
///
/// Returns [`StoreError::Unreadable`] if either artifact is missing or
/// unreadable, or if the secret cannot be decrypted for the current user.
pub fn read(paths: &ArtifactPaths, protection: &dyn ProtectionProvider) -> Result<Credential> {
  match inspect(paths, protection) {
    Lookup::Found(credential) => Ok(credential),
    Lookup::Missing { .. } => Err(StoreError::Unreadable {
      name: paths.name.clone(),
      reason: "no stored credential".to_string(),
    }),
    Lookup::Corrupt { reason, .. } => Err(StoreError::Unreadable {
      name: paths.name.clone(),
      reason,
    }),
  }
}

/// Read the record under `paths` without failing, reporting what was found
pub fn inspect(paths: &ArtifactPaths, protection: &dyn ProtectionProvider) -> Lookup {
  let username = match read_artifact(&paths.username) {
    Ok(username) => username,
    Err(e) => {
      return Lookup::Corrupt {
        username: None,
        reason: format!("cannot read {}: {e}", paths.username.display()),
      };
    }
  };

  let username = match username {
    Some(username) if username.is_empty() => {
      return Lookup::Corrupt {
        username: None,
        reason: format!("{} is empty", paths.username.display()),
      };
    }
    other => other,
  };

  let token = match read_artifact(&paths.password) {
    Ok(token) => token,
    Err(e) => {
      return Lookup::Corrupt {
        username,
        reason: format!("cannot read {}: {e}", paths.password.display()),
      };
    }
  };

  let (Some(username), Some(token)) = (username.clone(), token) else {
    return Lookup::Missing { username };
  };

  match protection.unprotect(&token) {
    Ok(secret) => Lookup::Found(Credential {
      name: paths.name.clone(),
      username,
      secret,
    }),
    Err(e) => Lookup::Corrupt {
      username: Some(username),
      reason: e.to_string(),
    },
  }
}

/// Remove both artifacts, each independently, ignoring ones that are absent.
///
/// Removal failures are logged and never abort removal of the other
/// artifact.
pub fn delete(paths: &ArtifactPaths) {
  for path in [&paths.username, &paths.password] {
    match fs::remove_file(path) {
      Ok(()) => tracing::debug!("Removed {}", path.display()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => tracing::warn!("Failed to remove {}: {e}", path.display()),
    }
  }

  tracing::info!("Deleted credential '{}'", paths.name);
}

fn write_artifact(path: &Path, line: &str) -> Result<()> {
  let write_error = |source: io::Error| StoreError::Write {
    path: path.to_path_buf(),
    source,
  };

  fs::write(path, format!("{line}\n")).map_err(write_error)?;
  platform::secure_file(path).map_err(write_error)
}

/// Read a single-line artifact, returning `None` when it does not exist
fn read_artifact(path: &Path) -> io::Result<Option<String>> {
  match fs::read_to_string(path) {
    Ok(content) => Ok(Some(content.trim_end_matches(['\r', '\n']).to_string())),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e),
  }
}
