//! In-crate test doubles for the store's external collaborators.

use std::cell::RefCell;
use std::rc::Rc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::creds::platform::{ProtectionError, ProtectionProvider};
use crate::creds::{Login, Secret};
use crate::error::{Result, StoreError};
use crate::prompts::Prompter;

/// Reversible protection bound to a pretend user identity
pub(crate) struct FakeProtection {
  identity: String,
}

impl FakeProtection {
  pub(crate) fn new(identity: &str) -> Self {
    Self {
      identity: identity.to_string(),
    }
  }
}

impl ProtectionProvider for FakeProtection {
  fn protect(&self, plaintext: &[u8]) -> std::result::Result<String, ProtectionError> {
    Ok(format!("fake:{}:{}", self.identity, BASE64.encode(plaintext)))
  }

  fn unprotect(&self, token: &str) -> std::result::Result<Secret, ProtectionError> {
    let mut parts = token.trim().splitn(3, ':');
    let (Some("fake"), Some(identity), Some(payload)) = (parts.next(), parts.next(), parts.next()) else {
      return Err(ProtectionError::MalformedToken(token.to_string()));
    };

    if identity != self.identity {
      return Err(ProtectionError::Decrypt(format!("token belongs to {identity}")));
    }

    BASE64
      .decode(payload)
      .map(Secret::new)
      .map_err(|e| ProtectionError::MalformedToken(e.to_string()))
  }
}

/// What a [`ScriptedPrompter`] answers with
pub(crate) enum Script {
  Answer(Login),
  Cancel,
  Fail,
}

/// Prompter that replays a fixed answer and records how it was called
pub(crate) struct ScriptedPrompter {
  script: Script,
  pub(crate) calls: RefCell<Vec<(String, Option<String>)>>,
}

impl ScriptedPrompter {
  pub(crate) fn answering(username: &str, secret: &str) -> Self {
    Self::with(Script::Answer(Login::new(username, secret)))
  }

  pub(crate) fn cancelling() -> Self {
    Self::with(Script::Cancel)
  }

  pub(crate) fn failing() -> Self {
    Self::with(Script::Fail)
  }

  fn with(script: Script) -> Self {
    Self {
      script,
      calls: RefCell::new(Vec::new()),
    }
  }

  pub(crate) fn call_count(&self) -> usize {
    self.calls.borrow().len()
  }

  pub(crate) fn last_call(&self) -> Option<(String, Option<String>)> {
    self.calls.borrow().last().cloned()
  }
}

impl Prompter for ScriptedPrompter {
  fn prompt(&self, message: &str, suggested_username: Option<&str>) -> Result<Option<Login>> {
    self
      .calls
      .borrow_mut()
      .push((message.to_string(), suggested_username.map(str::to_string)));

    match &self.script {
      Script::Answer(login) => Ok(Some(login.clone())),
      Script::Cancel => Ok(None),
      Script::Fail => Err(StoreError::Prompt("no terminal".to_string())),
    }
  }
}

impl Prompter for Rc<ScriptedPrompter> {
  fn prompt(&self, message: &str, suggested_username: Option<&str>) -> Result<Option<Login>> {
    self.as_ref().prompt(message, suggested_username)
  }
}
