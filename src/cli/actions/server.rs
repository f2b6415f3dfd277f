use crate::{
    api::{self, AppState},
    credentials::CredentialStore,
};
use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub credentials: PathBuf,
    pub static_dir: PathBuf,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the credentials file cannot be loaded or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    let state = AppState::new(CredentialStore::new(args.credentials), args.static_dir);

    api::new(args.port, state).await
}
