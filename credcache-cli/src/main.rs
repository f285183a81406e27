//! # credcache CLI Entry Point
//!
//! Parses arguments, installs logging and hands off to the command
//! handlers. Logs go to stderr; stdout is reserved for credential data.

use std::io;

use anyhow::Result;
use clap::Parser;
use credcache_cli::cli::{self, handle_cli};
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
  let cmd = cli::Cli::parse();

  let level = match cmd.verbose {
    0 => tracing::Level::WARN,
    1 => tracing::Level::INFO,
    2 => tracing::Level::DEBUG,
    _ => tracing::Level::TRACE,
  };

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(io::stderr))
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);

  handle_cli(cmd)
}
