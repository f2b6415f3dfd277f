use crate::credentials::hash_password;
use anyhow::{anyhow, Result};
use secrecy::{ExposeSecret, SecretString};

pub struct Args {
    pub password: SecretString,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args").field("password", &"***").finish()
    }
}

/// Print a PHC hash of the password for the credentials file.
/// # Errors
/// Returns an error if hashing fails.
pub fn execute(args: &Args) -> Result<()> {
    let hash = hash_password(args.password.expose_secret())
        .map_err(|e| anyhow!("Failed to hash password: {e}"))?;

    println!("{hash}");

    Ok(())
}
