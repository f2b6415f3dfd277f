//! Map parsed CLI arguments to the action the binary runs.

use crate::cli::actions::{hash_password, server, Action};
use crate::cli::commands::{
    ARG_CREDENTIALS, ARG_PASSWORD, ARG_PORT, ARG_STATIC_DIR, CMD_HASH_PASSWORD,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    if let Some(sub_m) = matches.subcommand_matches(CMD_HASH_PASSWORD) {
        let password = sub_m
            .get_one::<String>(ARG_PASSWORD)
            .cloned()
            .context("missing required argument: <password>")?;

        return Ok(Action::HashPassword(hash_password::Args {
            password: SecretString::from(password),
        }));
    }

    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8000);
    let credentials = matches
        .get_one::<String>(ARG_CREDENTIALS)
        .map(PathBuf::from)
        .context("missing required argument: --credentials")?;
    let static_dir = matches
        .get_one::<String>(ARG_STATIC_DIR)
        .map(PathBuf::from)
        .context("missing required argument: --static-dir")?;

    Ok(Action::Server(server::Args {
        port,
        credentials,
        static_dir,
    }))
}
