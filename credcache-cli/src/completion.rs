//! # Shell Completion
//!
//! Generates completion scripts for the `credcache` command tree.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;

/// Write the completion script for `shell` to `out`
pub fn write_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
  let mut cmd = Cli::command();
  let app_name = cmd.get_name().to_string();

  generate(shell, &mut cmd, app_name, out);
  out.flush().context("Failed to write completion script")
}

/// Generate shell completions for the specified shell on stdout
pub fn generate_completions(shell: Shell) -> Result<()> {
  write_completions(shell, &mut io::stdout().lock())
}
