//! # Command Line Interface
//!
//! Defines the `credcache` command tree and dispatches to the handlers.

mod completion;
mod delete;
mod get;
mod list;
mod set;

use anyhow::{Context, Result};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use credcache_core::{ColorMode, CredentialStore, StoreConfig, TerminalPrompter};

/// Top-level CLI command for credcache
#[derive(Parser)]
#[command(name = "credcache")]
#[command(display_name = "🔐 credcache")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "A per-user cache of named credentials")]
#[command(
  long_about = "credcache keeps named credentials on disk so that scripts can fetch them\n\
        without prompting on every run.\n\n\
        The username is stored in plain text and the password is encrypted with a key\n\
        only the current user account can use. When no usable credential is stored,\n\
        credcache asks for one on the terminal and remembers it."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for credcache
#[derive(Subcommand)]
pub enum Commands {
  /// Fetch a credential, prompting for it when none is stored
  #[command(long_about = "Prints the credential stored under NAME.\n\n\
            When nothing usable is stored, credcache prompts for a username and password,\n\
            stores them and prints them. Use --no-prompt in unattended scripts and --reset\n\
            to replace a stored credential. On failure a diagnostic is printed to stderr,\n\
            nothing is printed to stdout and the exit status is still zero.")]
  Get(get::GetArgs),

  /// Store a credential without prompting for the username
  #[command(long_about = "Stores a username and password under NAME, replacing any stored credential.\n\n\
            The password is read from the first line of stdin with --password-stdin,\n\
            otherwise it is asked for on the terminal.")]
  Set(set::SetArgs),

  /// Remove a stored credential
  #[command(long_about = "Removes the credential stored under NAME.\n\n\
            Deleting a credential that does not exist succeeds silently.")]
  #[command(alias = "rm")]
  Delete(delete::DeleteArgs),

  /// List stored credentials
  #[command(long_about = "Lists the credential names in the store.\n\n\
            Records with only one of their two files on disk are shown as partial;\n\
            fetching them will prompt for a new credential.")]
  #[command(alias = "ls")]
  List(list::ListArgs),

  /// Generate shell completions
  #[command(long_about = "Generates shell completion scripts for credcache commands.\n\n\
            Supported shells are bash, zsh, fish and PowerShell.")]
  Completion(completion::CompletionArgs),
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  cli.colors.apply();

  match cli.command {
    Commands::Get(get) => get::handle_get_command(get),
    Commands::Set(set) => set::handle_set_command(set),
    Commands::Delete(delete) => delete::handle_delete_command(delete),
    Commands::List(list) => list::handle_list_command(list),
    Commands::Completion(completion) => completion::handle_completion_command(completion),
  }
}

/// Build the production store from the environment and config file
fn open_store() -> Result<CredentialStore> {
  let config = StoreConfig::from_env().context("Failed to load credcache configuration")?;
  Ok(CredentialStore::new(config, Box::new(TerminalPrompter)))
}
