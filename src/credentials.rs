//! Teacher credentials backed by a JSON file.
//!
//! The file is re-read on every lookup so edits take effect without a restart:
//!
//! ```json
//! { "teachers": { "mrodriguez": { "password": "$argon2id$v=19$..." } } }
//! ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, error, instrument};

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("failed to read credentials file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed credentials file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize, Debug)]
struct CredentialsFile {
    teachers: HashMap<String, TeacherEntry>,
}

#[derive(Deserialize, Debug)]
struct TeacherEntry {
    password: String,
}

/// Parsed teacher table: username to stored password hash.
#[derive(Debug, Default)]
pub struct Teachers(HashMap<String, String>);

impl Teachers {
    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.0.contains_key(username)
    }

    #[must_use]
    pub fn password_hash(&self, username: &str) -> Option<&str> {
        self.0.get(username).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the credentials file.
    ///
    /// # Errors
    /// Returns an error if the file is missing, unreadable or not valid JSON of
    /// the expected shape.
    pub async fn load(&self) -> Result<Teachers, CredentialsError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CredentialsError::Read {
                path: self.path.clone(),
                source,
            })?;

        let file: CredentialsFile =
            serde_json::from_str(&raw).map_err(|source| CredentialsError::Parse {
                path: self.path.clone(),
                source,
            })?;

        Ok(Teachers(
            file.teachers
                .into_iter()
                .map(|(username, entry)| (username, entry.password))
                .collect(),
        ))
    }

    /// Check a teacher's password against the stored hash.
    ///
    /// Unknown usernames and unparsable hashes both verify as `false`.
    ///
    /// # Errors
    /// Returns an error if the credentials file cannot be loaded.
    #[instrument(skip(self, password))]
    pub async fn verify(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<bool, CredentialsError> {
        let teachers = self.load().await?;

        let Some(stored) = teachers.password_hash(username) else {
            debug!("Unknown teacher");
            return Ok(false);
        };

        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(err) => {
                error!("Invalid password hash for {username}: {err}");
                return Ok(false);
            }
        };

        Ok(Argon2::default()
            .verify_password(password.expose_secret().as_bytes(), &parsed)
            .is_ok())
    }

    /// Whether `username` is a known teacher.
    ///
    /// # Errors
    /// Returns an error if the credentials file cannot be loaded.
    pub async fn contains(&self, username: &str) -> Result<bool, CredentialsError> {
        Ok(self.load().await?.contains(username))
    }
}

/// Hash a password into a PHC string suitable for the credentials file.
///
/// # Errors
/// Returns an error if Argon2 fails to hash the input.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn write_store(dir: &tempfile::TempDir, contents: &str) -> CredentialStore {
        let path = dir.path().join("users.json");
        fs::write(&path, contents).unwrap();
        CredentialStore::new(path)
    }

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn teachers_json(username: &str, password: &str) -> String {
        let hash = hash_password(password).unwrap();
        let mut teachers = serde_json::Map::new();
        teachers.insert(username.to_string(), json!({ "password": hash }));
        json!({ "teachers": teachers }).to_string()
    }

    fn store_with(dir: &tempfile::TempDir, username: &str, password: &str) -> CredentialStore {
        write_store(dir, &teachers_json(username, password))
    }

    #[tokio::test]
    async fn verify_accepts_correct_password() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, "mrodriguez", "art-teacher");
        let ok = store
            .verify("mrodriguez", &secret("art-teacher"))
            .await
            .unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn verify_rejects_wrong_password_and_unknown_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, "mrodriguez", "art-teacher");
        let wrong = secret("nope");
        assert!(!store.verify("mrodriguez", &wrong).await.unwrap());
        assert!(!store
            .verify("nobody", &secret("art-teacher"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn verify_rejects_unparsable_hash() {
        let dir = tempfile::tempdir().unwrap();
        let store = write_store(
            &dir,
            r#"{"teachers": {"legacy": {"password": "plaintext"}}}"#,
        );
        assert!(!store
            .verify("legacy", &secret("plaintext"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn file_is_reread_on_every_call() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir, "first", "pw");
        assert!(store.contains("first").await.unwrap());

        fs::write(store.path(), teachers_json("second", "pw")).unwrap();

        assert!(!store.contains("first").await.unwrap());
        assert!(store.contains("second").await.unwrap());
    }

    #[tokio::test]
    async fn load_counts_teachers() {
        let dir = tempfile::tempdir().unwrap();
        let teachers = store_with(&dir, "mrodriguez", "pw").load().await.unwrap();
        assert_eq!(teachers.len(), 1);
        assert!(!teachers.is_empty());

        let empty = write_store(&dir, r#"{"teachers": {}}"#).load().await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("absent.json"));
        let result = store.load().await;
        assert!(matches!(result, Err(CredentialsError::Read { .. })));
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = write_store(&dir, r#"{"students": {}}"#);
        let result = store.contains("anyone").await;
        assert!(matches!(result, Err(CredentialsError::Parse { .. })));
    }

    #[test]
    fn hash_password_produces_argon2_phc() {
        let hash = hash_password("secret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, hash_password("secret").unwrap());
    }
}
