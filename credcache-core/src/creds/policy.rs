//! The decision flow behind every credential lookup.
//!
//! Once the name is validated and the artifact paths are resolved, a request
//! is handled in priority order:
//!
//! 1. delete the stored record
//! 2. store a caller-supplied login
//! 3. on reset, go straight to the prompt
//! 4. otherwise read the stored record, prompting when it is unusable unless
//!    prompting is disabled

use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::creds::codec::{self, Lookup};
use crate::creds::naming::{self, ArtifactPaths, RecordState};
use crate::creds::{Credential, Login};
use crate::error::{Result, StoreError};
use crate::output::print_error;
use crate::prompts::Prompter;

/// One invocation of the store
#[derive(Debug, Clone, Default)]
pub struct RetrievalRequest {
  pub name: String,
  pub store_path: Option<PathBuf>,
  pub credential: Option<Login>,
  pub user_name: Option<String>,
  pub message: Option<String>,
  pub do_not_prompt: bool,
  pub reset: bool,
  pub delete: bool,
}

impl RetrievalRequest {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Self::default()
    }
  }

  pub fn store_path(mut self, store_path: impl Into<PathBuf>) -> Self {
    self.store_path = Some(store_path.into());
    self
  }

  /// Store this login instead of reading or prompting
  pub fn credential(mut self, login: Login) -> Self {
    self.credential = Some(login);
    self
  }

  /// Username to suggest if a prompt is shown
  pub fn user_name(mut self, user_name: impl Into<String>) -> Self {
    self.user_name = Some(user_name.into());
    self
  }

  /// Message to show if a prompt is shown
  pub fn message(mut self, message: impl Into<String>) -> Self {
    self.message = Some(message.into());
    self
  }

  pub const fn do_not_prompt(mut self, do_not_prompt: bool) -> Self {
    self.do_not_prompt = do_not_prompt;
    self
  }

  pub const fn reset(mut self, reset: bool) -> Self {
    self.reset = reset;
    self
  }

  pub const fn delete(mut self, delete: bool) -> Self {
    self.delete = delete;
    self
  }
}

/// How a request was resolved
#[derive(Debug)]
pub enum Outcome {
  /// The stored record was removed
  Deleted,
  /// A caller-supplied login was stored
  Stored(Credential),
  /// A stored record was read
  Loaded(Credential),
  /// A login was collected from the prompt and stored
  Prompted(Credential),
  /// The prompt was cancelled; nothing was stored
  Cancelled,
}

impl Outcome {
  /// The credential this outcome yields, if any
  pub fn into_credential(self) -> Option<Credential> {
    match self {
      Self::Stored(credential) | Self::Loaded(credential) | Self::Prompted(credential) => Some(credential),
      Self::Deleted | Self::Cancelled => None,
    }
  }
}

/// Credential store bound to its configuration and prompt collaborator
pub struct CredentialStore {
  config: StoreConfig,
  prompter: Box<dyn Prompter>,
}

impl CredentialStore {
  pub const fn new(config: StoreConfig, prompter: Box<dyn Prompter>) -> Self {
    Self { config, prompter }
  }

  pub const fn config(&self) -> &StoreConfig {
    &self.config
  }

  /// Resolve a request, returning a typed error on failure
  pub fn retrieve(&self, request: RetrievalRequest) -> Result<Outcome> {
    let paths = ArtifactPaths::resolve(&request.name, request.store_path.as_deref(), &self.config)?;
    tracing::debug!(
      "Resolved credential '{}' to {}",
      paths.name,
      paths.username.with_extension("*").display()
    );

    if request.delete {
      codec::delete(&paths);
      return Ok(Outcome::Deleted);
    }

    if let Some(login) = request.credential {
      codec::write(&paths, &login, self.config.protection.as_ref())?;
      return Ok(Outcome::Stored(Credential::new(paths.name, login)));
    }

    let recovered = if request.reset {
      tracing::debug!("Reset requested for '{}', skipping stored credential", paths.name);
      None
    } else {
      match codec::inspect(&paths, self.config.protection.as_ref()) {
        Lookup::Found(credential) => {
          tracing::debug!("Read stored credential '{}'", paths.name);
          return Ok(Outcome::Loaded(credential));
        }
        Lookup::Missing { username } => {
          tracing::debug!("No complete stored credential for '{}'", paths.name);
          username
        }
        Lookup::Corrupt { username, reason } => {
          tracing::warn!("Stored credential '{}' is unreadable: {reason}", paths.name);
          username
        }
      }
    };

    if request.do_not_prompt && !request.reset {
      return Err(StoreError::PromptSuppressed(paths.name));
    }

    let suggested = request.user_name.or(recovered);
    let message = request
      .message
      .unwrap_or_else(|| format!("Enter credentials for '{}'", paths.name));

    match self.prompter.prompt(&message, suggested.as_deref())? {
      Some(login) => {
        codec::write(&paths, &login, self.config.protection.as_ref())?;
        Ok(Outcome::Prompted(Credential::new(paths.name, login)))
      }
      None => {
        tracing::info!("Prompt for '{}' was cancelled", paths.name);
        Ok(Outcome::Cancelled)
      }
    }
  }

  /// Script-facing entry point: never fails.
  ///
  /// Any error is rendered as a single diagnostic line on stderr and logged,
  /// and the caller sees no credential.
  pub fn get_or_report(&self, request: RetrievalRequest) -> Option<Credential> {
    let name = request.name.clone();
    match self.retrieve(request) {
      Ok(outcome) => outcome.into_credential(),
      Err(e) => {
        tracing::error!("Credential lookup for '{name}' failed: {e}");
        print_error(&e.to_string());
        None
      }
    }
  }

  /// List the records in a store directory
  pub fn list(&self, store_path: Option<&Path>) -> Result<Vec<(String, RecordState)>> {
    let store_dir = naming::resolve_store_dir(store_path, &self.config)?;
    naming::list_records(&store_dir)
  }
}
