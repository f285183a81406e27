//! # Set Command
//!
//! Stores a caller-supplied credential, overwriting whatever is stored.

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use credcache_core::output::format_credential_name;
use credcache_core::prompts::credcache_theme;
use credcache_core::{Login, RetrievalRequest, Secret, print_success};
use dialoguer::Password;

use super::open_store;

/// Command for storing a credential
#[derive(Args)]
pub struct SetArgs {
  /// Name to store the credential under (letters, digits, `_` and `-`)
  #[arg(required = true)]
  pub name: String,

  /// Username to store
  #[arg(long, short = 'u', value_name = "USER")]
  pub username: String,

  /// Read the password from the first line of stdin instead of prompting
  #[arg(long = "password-stdin")]
  pub password_stdin: bool,

  /// Store directory to use instead of the default
  #[arg(long = "store-path", value_name = "DIR")]
  pub store_path: Option<PathBuf>,
}

pub(crate) fn handle_set_command(set: SetArgs) -> Result<()> {
  let secret = if set.password_stdin {
    read_secret_line(&mut io::stdin().lock())?
  } else {
    Password::with_theme(&credcache_theme())
      .with_prompt(format!("Password for '{}'", set.username))
      .allow_empty_password(true)
      .interact()
      .map(Secret::from)
      .context("Failed to read password")?
  };

  let store = open_store()?;
  let mut request = RetrievalRequest::new(&set.name).credential(Login::new(set.username, secret));
  request.store_path = set.store_path;

  store
    .retrieve(request)
    .with_context(|| format!("Failed to store credential '{}'", set.name))?;

  print_success(&format!("Stored credential {}", format_credential_name(&set.name)));
  Ok(())
}

/// Read one line from `reader`, without its line ending, as a secret
fn read_secret_line(reader: &mut dyn BufRead) -> Result<Secret> {
  let mut line = String::new();
  let read = reader.read_line(&mut line).context("Failed to read password from stdin")?;
  if read == 0 {
    bail!("No password on stdin");
  }

  let trimmed = line.trim_end_matches(['\r', '\n']).len();
  line.truncate(trimmed);
  Ok(Secret::from(line))
}
