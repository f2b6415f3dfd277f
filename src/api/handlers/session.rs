//! Teacher sessions carried in the `session` cookie.
//!
//! The cookie value is the teacher's username, unsigned and without expiry. A
//! session resolves only while that username is still in the credentials file.

use crate::credentials::{CredentialStore, CredentialsError};
use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use tracing::debug;

pub const SESSION_COOKIE_NAME: &str = "session";

/// Map a cookie value to a known teacher username.
///
/// # Errors
/// Returns an error if the credentials file cannot be loaded.
pub async fn resolve(
    credentials: &CredentialStore,
    cookie: Option<&str>,
) -> Result<Option<String>, CredentialsError> {
    let Some(username) = cookie.filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    if credentials.contains(username).await? {
        Ok(Some(username.to_string()))
    } else {
        debug!("Session cookie does not name a teacher");
        Ok(None)
    }
}

/// Read the session cookie from request headers, if present.
#[must_use]
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == SESSION_COOKIE_NAME).then(|| val.trim().to_string())
        })
}

/// `Set-Cookie` value that starts a session for `username`.
pub(crate) fn session_cookie(username: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}={username}; Path=/; HttpOnly; SameSite=Lax"
    ))
}

/// `Set-Cookie` value that expires the session immediately.
pub(crate) fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::credentials::hash_password;
    use serde_json::json;

    fn store(dir: &tempfile::TempDir) -> CredentialStore {
        let hash = hash_password("pw").unwrap();
        let path = dir.path().join("users.json");
        let contents = json!({ "teachers": { "mrodriguez": { "password": hash } } });
        std::fs::write(&path, contents.to_string()).unwrap();
        CredentialStore::new(path)
    }

    #[tokio::test]
    async fn resolve_known_teacher() {
        let dir = tempfile::tempdir().unwrap();
        let credentials = store(&dir);
        assert_eq!(
            resolve(&credentials, Some("mrodriguez")).await.unwrap(),
            Some("mrodriguez".to_string())
        );
    }

    #[tokio::test]
    async fn resolve_rejects_missing_empty_and_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let credentials = store(&dir);
        assert_eq!(resolve(&credentials, None).await.unwrap(), None);
        assert_eq!(resolve(&credentials, Some("")).await.unwrap(), None);
        assert_eq!(resolve(&credentials, Some("intruder")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn resolve_without_cookie_skips_the_file() {
        let credentials = CredentialStore::new("/nonexistent/users.json");
        assert_eq!(resolve(&credentials, None).await.unwrap(), None);
        assert!(resolve(&credentials, Some("anyone")).await.is_err());
    }

    #[test]
    fn extract_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; session=mrodriguez; lang=en"),
        );
        assert_eq!(
            extract_session_cookie(&headers),
            Some("mrodriguez".to_string())
        );
    }

    #[test]
    fn extract_cookie_missing() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_session_cookie(&headers), None);
        headers.insert(COOKIE, HeaderValue::from_static("sessionid=abc"));
        assert_eq!(extract_session_cookie(&headers), None);
    }

    #[test]
    fn cookie_values() {
        let cookie = session_cookie("mrodriguez").unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "session=mrodriguez; Path=/; HttpOnly; SameSite=Lax"
        );
        assert!(clear_session_cookie()
            .to_str()
            .unwrap()
            .contains("Max-Age=0"));
    }
}
