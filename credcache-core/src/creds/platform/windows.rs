//! Windows-specific secret protection
//!
//! This module protects secrets with the Data Protection API (DPAPI) in user
//! scope, so only the same Windows account on the same machine can decrypt
//! them.

use std::io;
use std::path::Path;
use std::ptr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use windows_sys::Win32::Security::Cryptography::{
  CRYPT_INTEGER_BLOB, CRYPTPROTECT_UI_FORBIDDEN, CryptProtectData, CryptUnprotectData,
};

use super::{FilePermissions, ProtectionError, ProtectionProvider};
use crate::creds::Secret;

mod helpers;

use helpers::{input_blob, take_blob, to_wide};

/// Windows implementation of file permissions
pub struct WindowsFilePermissions;

impl FilePermissions for WindowsFilePermissions {
  fn set_secure_permissions(_path: &Path) -> io::Result<()> {
    // Profile directories already carry owner-only ACLs and the secret
    // artifact is DPAPI-sealed, so no ACL changes are made here
    Ok(())
  }

  fn set_secure_dir_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
  }
}

/// DPAPI protection scoped to the current Windows user
#[derive(Debug, Clone, Copy, Default)]
pub struct DpapiProtection;

impl ProtectionProvider for DpapiProtection {
  fn protect(&self, plaintext: &[u8]) -> Result<String, ProtectionError> {
    let description = to_wide("credcache");
    let input = input_blob(plaintext);
    let mut output = CRYPT_INTEGER_BLOB {
      cbData: 0,
      pbData: ptr::null_mut(),
    };

    // SAFETY: `input` borrows `plaintext` for the duration of the call,
    // `description` is a live null-terminated UTF-16 buffer, and `output` is
    // a valid out-pointer that DPAPI fills with a LocalAlloc'd buffer.
    let ok = unsafe {
      CryptProtectData(
        &input,
        description.as_ptr(),
        ptr::null(),
        ptr::null(),
        ptr::null(),
        CRYPTPROTECT_UI_FORBIDDEN,
        &mut output,
      )
    };

    if ok == 0 {
      return Err(ProtectionError::Encrypt(io::Error::last_os_error().to_string()));
    }

    // SAFETY: `output` was filled by a successful CryptProtectData call.
    let sealed = unsafe { take_blob(output) };
    Ok(BASE64.encode(sealed))
  }

  fn unprotect(&self, token: &str) -> Result<Secret, ProtectionError> {
    let sealed = BASE64
      .decode(token.trim())
      .map_err(|e| ProtectionError::MalformedToken(e.to_string()))?;

    let input = input_blob(&sealed);
    let mut output = CRYPT_INTEGER_BLOB {
      cbData: 0,
      pbData: ptr::null_mut(),
    };

    // SAFETY: `input` borrows `sealed` for the duration of the call and
    // `output` is a valid out-pointer that DPAPI fills with a LocalAlloc'd
    // buffer. No description is requested.
    let ok = unsafe {
      CryptUnprotectData(
        &input,
        ptr::null_mut(),
        ptr::null(),
        ptr::null(),
        ptr::null(),
        CRYPTPROTECT_UI_FORBIDDEN,
        &mut output,
      )
    };

    if ok == 0 {
      return Err(ProtectionError::Decrypt(io::Error::last_os_error().to_string()));
    }

    // SAFETY: `output` was filled by a successful CryptUnprotectData call.
    let plaintext = unsafe { take_blob(output) };
    Ok(Secret::new(plaintext))
  }
}
