//! # credcache Core Library
//!
//! A local, per-user credential cache. Credentials are stored under a
//! caller-chosen name as a plaintext username next to a secret encrypted with
//! a key only the current user account can use, so scripts can fetch them
//! without prompting on every run.

pub mod config;
pub mod consts;
pub mod creds;
pub mod error;
pub mod output;
pub mod prompts;

#[cfg(test)]
mod testing;

// Re-export main types for library consumers
pub use config::{ConfigDirs, HomeDir, Settings, StoreConfig};
pub use creds::codec::Lookup;
pub use creds::naming::{ArtifactPaths, RecordState, validate_name};
pub use creds::platform::{ProtectionError, ProtectionProvider, default_protection_provider};
pub use creds::policy::{CredentialStore, Outcome, RetrievalRequest};
pub use creds::{Credential, Login, Secret};
pub use error::StoreError;
pub use output::{ColorMode, print_error, print_info, print_success, print_warning};
pub use prompts::{Prompter, TerminalPrompter};
