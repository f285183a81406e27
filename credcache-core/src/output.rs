//! # Output Formatting
//!
//! Colored, emoji-prefixed status lines for the human side of credcache.
//! Status lines go to stderr so that stdout only ever carries credential data
//! a script asked for.

#![allow(clippy::print_stderr)]

use owo_colors::OwoColorize;

use crate::creds::naming::RecordState;

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

impl ColorMode {
  /// Apply this mode to all colored output
  pub fn apply(self) {
    match self {
      Self::Always | Self::Yes => owo_colors::set_override(true),
      Self::Never | Self::No => owo_colors::set_override(false),
      Self::Auto => {
        // Leave owo_colors to detect terminal support on its own
      }
    }
  }
}

/// Helper function to safely get an emoji or fallback to a default character
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  let check = get_emoji_or_default("check_mark", "✓");
  eprintln!("{} {}", check.green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  let cross = get_emoji_or_default("cross_mark", "✗");
  eprintln!("{} {}", cross.red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  let warning = get_emoji_or_default("warning", "⚠");
  eprintln!("{} {}", warning.yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information", "ℹ");
  eprintln!("{} {}", info.blue().bold(), message);
}

/// Format a credential name
pub fn format_credential_name(name: &str) -> String {
  name.bright_cyan().bold().to_string()
}

/// Format a store path
pub fn format_store_path(path: &str) -> String {
  path.bright_green().to_string()
}

/// Format a command or command example
pub fn format_command(cmd: &str) -> String {
  cmd.purple().to_string()
}

/// Format the completeness of a stored record
pub fn format_record_state(state: RecordState) -> String {
  match state {
    RecordState::Complete => "complete".green().to_string(),
    RecordState::UsernameOnly => "partial (missing password)".yellow().to_string(),
    RecordState::PasswordOnly => "partial (missing username)".yellow().to_string(),
  }
}
