//! # List Command

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use credcache_core::creds::naming::resolve_store_dir;
use credcache_core::output::{format_command, format_credential_name, format_record_state, format_store_path};
use credcache_core::{RecordState, print_info, print_warning};

use super::open_store;

/// Command for listing stored credentials
#[derive(Args)]
pub struct ListArgs {
  /// Store directory to use instead of the default
  #[arg(long = "store-path", value_name = "DIR")]
  pub store_path: Option<PathBuf>,
}

pub(crate) fn handle_list_command(list: ListArgs) -> Result<()> {
  let store = open_store()?;
  let store_dir = resolve_store_dir(list.store_path.as_deref(), store.config())?;
  let records = store
    .list(Some(store_dir.as_path()))
    .context("Failed to list stored credentials")?;

  if records.is_empty() {
    print_info(&format!(
      "No credentials stored in {}",
      format_store_path(&store_dir.display().to_string())
    ));
    print_info(&format!(
      "Store one with {}",
      format_command("credcache set NAME --username USER")
    ));
    return Ok(());
  }

  let width = records.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
  let partial = records
    .iter()
    .filter(|(_, state)| *state != RecordState::Complete)
    .count();

  let mut stdout = io::stdout().lock();
  for (name, state) in records {
    let padding = " ".repeat(width - name.chars().count());
    writeln!(
      stdout,
      "{}{padding}  {}",
      format_credential_name(&name),
      format_record_state(state)
    )
    .context("Failed to write credential list")?;
  }

  if partial > 0 {
    print_warning(&format!(
      "{partial} partial record(s) will prompt for a new credential on the next {}",
      format_command("credcache get")
    ));
  }

  Ok(())
}
