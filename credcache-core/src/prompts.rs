//! # Prompts Module
//!
//! The interactive collaborator the store falls back to when no usable
//! credential is stored, plus the dialoguer theme shared by credcache's
//! prompts.

use std::io::{self, IsTerminal};

use console::{Style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};

use crate::creds::Login;
use crate::error::{Result, StoreError};

/// Returns a custom dialoguer theme matching credcache's color palette.
///
/// Features:
/// - Cyan bold prompt text
/// - Green `❯` prefix on active item
/// - Green highlight on active item text
pub fn credcache_theme() -> ColorfulTheme {
  ColorfulTheme {
    prompt_style: Style::new().cyan().bold(),
    active_item_prefix: Style::new().green().apply_to("❯ ".to_string()),
    active_item_style: Style::new().green(),
    ..ColorfulTheme::default()
  }
}

/// Collects a username and secret from a human.
///
/// Returning `Ok(None)` means the human cancelled. Implementations must never
/// log or persist the secret they collect.
pub trait Prompter {
  fn prompt(&self, message: &str, suggested_username: Option<&str>) -> Result<Option<Login>>;
}

/// Terminal prompt built on dialoguer
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl TerminalPrompter {
  fn prompt_error(e: dialoguer::Error) -> Result<Option<Login>> {
    match e {
      dialoguer::Error::IO(err) if err.kind() == io::ErrorKind::Interrupted => {
        tracing::debug!("Prompt interrupted, treating as cancellation");
        Ok(None)
      }
      other => Err(StoreError::Prompt(other.to_string())),
    }
  }
}

impl Prompter for TerminalPrompter {
  fn prompt(&self, message: &str, suggested_username: Option<&str>) -> Result<Option<Login>> {
    let term = Term::stderr();
    if !term.is_term() || !io::stdin().is_terminal() {
      return Err(StoreError::Prompt("no interactive terminal is available".to_string()));
    }

    term
      .write_line(message)
      .map_err(|e| StoreError::Prompt(e.to_string()))?;

    let theme = credcache_theme();

    let mut input = Input::<String>::with_theme(&theme)
      .with_prompt("User name")
      .allow_empty(true);
    if let Some(suggested) = suggested_username {
      input = input.default(suggested.to_string());
    }

    let username = match input.interact_text() {
      Ok(username) => username.trim().to_string(),
      Err(e) => return Self::prompt_error(e),
    };

    if username.is_empty() {
      tracing::debug!("Empty user name entered, treating as cancellation");
      return Ok(None);
    }

    let secret = match Password::with_theme(&theme)
      .with_prompt("Password")
      .allow_empty_password(true)
      .interact()
    {
      Ok(secret) => secret,
      Err(e) => return Self::prompt_error(e),
    };

    Ok(Some(Login::new(username, secret)))
  }
}
