//! # Get Command
//!
//! The script-facing lookup. Whatever goes wrong, the caller gets a
//! diagnostic on stderr, an empty stdout and a zero exit status.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use credcache_core::{Credential, RetrievalRequest, print_error};
use serde::Serialize;

use super::open_store;

/// How a fetched credential is written to stdout
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
  /// `{"name", "username", "password"}` as a single JSON object
  #[default]
  Json,
  /// The username alone
  Username,
  /// The password alone
  Password,
}

/// Command for fetching a credential
#[derive(Args)]
pub struct GetArgs {
  /// Name the credential is stored under (letters, digits, `_` and `-`)
  #[arg(required = true)]
  pub name: String,

  /// Store directory to use instead of the default
  #[arg(long = "store-path", value_name = "DIR")]
  pub store_path: Option<PathBuf>,

  /// Username to suggest if a prompt is shown
  #[arg(long = "user-name", value_name = "USER")]
  pub user_name: Option<String>,

  /// Message to show if a prompt is shown
  #[arg(long, value_name = "TEXT")]
  pub message: Option<String>,

  /// Fail instead of prompting when nothing usable is stored
  #[arg(long = "no-prompt")]
  pub no_prompt: bool,

  /// Ignore the stored credential and prompt for a new one
  #[arg(long)]
  pub reset: bool,

  /// Output format
  #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
  pub format: OutputFormat,
}

#[derive(Serialize)]
struct CredentialJson<'a> {
  name: &'a str,
  username: &'a str,
  password: String,
}

impl GetArgs {
  fn into_request(self) -> RetrievalRequest {
    let mut request = RetrievalRequest::new(self.name);
    request.store_path = self.store_path;
    request.user_name = self.user_name;
    request.message = self.message;
    request.do_not_prompt = self.no_prompt;
    request.reset = self.reset;
    request
  }
}

pub(crate) fn handle_get_command(get: GetArgs) -> Result<()> {
  let format = get.format;

  let store = match open_store() {
    Ok(store) => store,
    Err(e) => {
      tracing::error!("{e:#}");
      print_error(&format!("{e:#}"));
      return Ok(());
    }
  };

  let Some(credential) = store.get_or_report(get.into_request()) else {
    return Ok(());
  };

  let rendered = render(&credential, format)?;
  let mut stdout = io::stdout().lock();
  writeln!(stdout, "{rendered}").context("Failed to write credential to stdout")?;
  Ok(())
}

/// Render `credential` in the requested format
fn render(credential: &Credential, format: OutputFormat) -> Result<String> {
  let password = String::from_utf8_lossy(credential.secret.expose()).into_owned();

  match format {
    OutputFormat::Json => serde_json::to_string(&CredentialJson {
      name: &credential.name,
      username: &credential.username,
      password,
    })
    .context("Failed to serialize credential"),
    OutputFormat::Username => Ok(credential.username.clone()),
    OutputFormat::Password => Ok(password),
  }
}
