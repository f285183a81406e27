//! # Credential Management
//!
//! Named username/secret pairs cached on disk for automation scripts. The
//! username is stored in plain text next to a secret that is encrypted with a
//! key only the owning user account can use.
//!
//! The store is split into three cooperating parts:
//! - [`naming`] validates names and resolves the two artifact paths
//! - [`codec`] reads, writes and deletes those artifacts
//! - [`policy`] decides between deleting, storing, reading and prompting

use std::fmt;

use zeroize::Zeroizing;

pub mod codec;
pub mod naming;
pub mod policy;

// Platform-specific implementations
pub mod platform;

/// Secret bytes, wiped from memory when dropped
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Zeroizing<Vec<u8>>);

impl Secret {
  pub fn new(bytes: Vec<u8>) -> Self {
    Self(Zeroizing::new(bytes))
  }

  /// Borrow the raw secret bytes
  pub fn expose(&self) -> &[u8] {
    &self.0
  }

  /// Borrow the secret as text, if it is valid UTF-8
  pub fn expose_str(&self) -> Option<&str> {
    std::str::from_utf8(&self.0).ok()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl From<String> for Secret {
  fn from(value: String) -> Self {
    Self::new(value.into_bytes())
  }
}

impl From<&str> for Secret {
  fn from(value: &str) -> Self {
    Self::new(value.as_bytes().to_vec())
  }
}

impl fmt::Debug for Secret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Secret(<redacted>)")
  }
}

/// A username and secret without a name, as collected from a prompt or
/// supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
  pub username: String,
  pub secret: Secret,
}

impl Login {
  pub fn new(username: impl Into<String>, secret: impl Into<Secret>) -> Self {
    Self {
      username: username.into(),
      secret: secret.into(),
    }
  }
}

/// A stored credential identified by its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
  pub name: String,
  pub username: String,
  pub secret: Secret,
}

impl Credential {
  pub fn new(name: impl Into<String>, login: Login) -> Self {
    Self {
      name: name.into(),
      username: login.username,
      secret: login.secret,
    }
  }

  /// Split the credential back into its nameless login
  pub fn into_login(self) -> Login {
    Login {
      username: self.username,
      secret: self.secret,
    }
  }
}
