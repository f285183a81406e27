//! # Delete Command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use credcache_core::RetrievalRequest;

use super::open_store;

/// Command for removing a stored credential
#[derive(Args)]
pub struct DeleteArgs {
  /// Name of the credential to remove
  #[arg(required = true)]
  pub name: String,

  /// Store directory to use instead of the default
  #[arg(long = "store-path", value_name = "DIR")]
  pub store_path: Option<PathBuf>,
}

pub(crate) fn handle_delete_command(delete: DeleteArgs) -> Result<()> {
  let store = open_store()?;
  let mut request = RetrievalRequest::new(&delete.name).delete(true);
  request.store_path = delete.store_path;

  store
    .retrieve(request)
    .with_context(|| format!("Failed to delete credential '{}'", delete.name))?;
  Ok(())
}
