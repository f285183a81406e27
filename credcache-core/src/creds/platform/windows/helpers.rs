use std::ffi::OsStr;
use std::iter::once;
use std::os::windows::ffi::OsStrExt;

use windows_sys::Win32::Foundation::LocalFree;
use windows_sys::Win32::Security::Cryptography::CRYPT_INTEGER_BLOB;

/// Convert a Rust string into a null-terminated UTF-16 vector suitable for
/// Windows API calls.
pub(super) fn to_wide(value: &str) -> Vec<u16> {
  OsStr::new(value).encode_wide().chain(once(0)).collect()
}

/// Describe a borrowed byte slice as a DPAPI input blob.
///
/// The blob must not outlive `data`; DPAPI only reads through the pointer.
pub(super) fn input_blob(data: &[u8]) -> CRYPT_INTEGER_BLOB {
  CRYPT_INTEGER_BLOB {
    cbData: data.len() as u32,
    pbData: data.as_ptr() as *mut u8,
  }
}

/// Copy a DPAPI output blob into an owned vector and release the buffer.
///
/// # Safety
///
/// `blob` must have been filled by a successful DPAPI call, so `pbData`
/// points to `cbData` bytes allocated with `LocalAlloc`.
pub(super) unsafe fn take_blob(blob: CRYPT_INTEGER_BLOB) -> Vec<u8> {
  if blob.pbData.is_null() {
    return Vec::new();
  }

  // SAFETY: The caller guarantees `pbData` points to `cbData` readable bytes
  let bytes = unsafe { std::slice::from_raw_parts(blob.pbData, blob.cbData as usize) }.to_vec();

  // SAFETY: DPAPI allocates output buffers with LocalAlloc and the slice
  // above has already been copied out
  unsafe {
    LocalFree(blob.pbData.cast());
  }

  bytes
}
