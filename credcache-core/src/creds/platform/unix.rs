//! Unix-specific secret protection
//!
//! Unix has no per-user data protection API, so secrets are sealed with
//! AES-256-GCM under a random key kept in a file only the owning user can
//! read. Replacing or losing that key makes every earlier token undecryptable.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use super::{FilePermissions, ProtectionError, ProtectionProvider};
use crate::creds::Secret;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Unix implementation of file permissions using chmod-style permissions
pub struct UnixFilePermissions;

impl FilePermissions for UnixFilePermissions {
  fn set_secure_permissions(path: &Path) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o600); // Owner read/write only
    fs::set_permissions(path, perms)
  }

  fn set_secure_dir_permissions(path: &Path) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o700);
    fs::set_permissions(path, perms)
  }
}

/// AES-256-GCM protection keyed by a per-user key file
#[derive(Debug, Clone)]
pub struct KeyFileProtection {
  key_path: PathBuf,
}

impl KeyFileProtection {
  pub fn new(key_path: impl Into<PathBuf>) -> Self {
    Self {
      key_path: key_path.into(),
    }
  }

  pub fn key_path(&self) -> &Path {
    &self.key_path
  }

  fn key_error(&self, source: io::Error) -> ProtectionError {
    ProtectionError::Key {
      path: self.key_path.clone(),
      source,
    }
  }

  /// Read the key, generating it first when `create` is set and none exists
  fn load_key(&self, create: bool) -> Result<Zeroizing<Vec<u8>>, ProtectionError> {
    match fs::read(&self.key_path) {
      Ok(bytes) => {
        let key = Zeroizing::new(bytes);
        if key.len() != KEY_LEN {
          return Err(self.key_error(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("expected a {KEY_LEN}-byte key, found {} bytes", key.len()),
          )));
        }
        Ok(key)
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound && create => self.create_key(),
      Err(e) => Err(self.key_error(e)),
    }
  }

  fn create_key(&self) -> Result<Zeroizing<Vec<u8>>, ProtectionError> {
    if let Some(parent) = self.key_path.parent()
      && !parent.exists()
    {
      fs::create_dir_all(parent).map_err(|e| self.key_error(e))?;
      UnixFilePermissions::set_secure_dir_permissions(parent).map_err(|e| self.key_error(e))?;
    }

    let mut key = Zeroizing::new(vec![0u8; KEY_LEN]);
    OsRng.fill_bytes(&mut key);

    let file = OpenOptions::new()
      .write(true)
      .create_new(true)
      .mode(0o600)
      .open(&self.key_path);

    match file {
      Ok(mut file) => {
        file.write_all(&key).map_err(|e| self.key_error(e))?;
        file.sync_all().map_err(|e| self.key_error(e))?;
        tracing::info!("Created protection key at {}", self.key_path.display());
        Ok(key)
      }
      // Another process created the key first; use theirs
      Err(e) if e.kind() == io::ErrorKind::AlreadyExists => self.load_key(false),
      Err(e) => Err(self.key_error(e)),
    }
  }

  fn cipher(key: &[u8]) -> Result<Aes256Gcm, ProtectionError> {
    Aes256Gcm::new_from_slice(key).map_err(|e| ProtectionError::Encrypt(format!("invalid key: {e}")))
  }
}

impl ProtectionProvider for KeyFileProtection {
  fn protect(&self, plaintext: &[u8]) -> Result<String, ProtectionError> {
    let key = self.load_key(true)?;
    let cipher = Self::cipher(&key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
      .encrypt(nonce, plaintext)
      .map_err(|e| ProtectionError::Encrypt(e.to_string()))?;

    let mut sealed = nonce_bytes.to_vec();
    sealed.extend(ciphertext);
    Ok(BASE64.encode(sealed))
  }

  fn unprotect(&self, token: &str) -> Result<Secret, ProtectionError> {
    let sealed = BASE64
      .decode(token.trim())
      .map_err(|e| ProtectionError::MalformedToken(e.to_string()))?;

    if sealed.len() < NONCE_LEN {
      return Err(ProtectionError::MalformedToken("token is too short".to_string()));
    }

    let key = self.load_key(false)?;
    let cipher = Self::cipher(&key)?;

    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
    let plaintext = cipher.decrypt(Nonce::from_slice(nonce_bytes), ciphertext).map_err(|_| {
      ProtectionError::Decrypt("the key that protected this secret is not available to the current user".to_string())
    })?;

    Ok(Secret::new(plaintext))
  }
}
