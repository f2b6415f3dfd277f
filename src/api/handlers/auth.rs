use super::{
    session::{clear_session_cookie, session_cookie},
    ApiError, ErrorBody, StatusResponse,
};
use crate::credentials::CredentialStore;
use axum::{
    async_trait,
    extract::{Extension, Form, FromRequest, Multipart, Request},
    http::{
        header::{CONTENT_TYPE, SET_COOKIE},
        HeaderMap,
    },
    response::IntoResponse,
    Json,
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

fn missing_login_fields() -> ApiError {
    ApiError::BadRequest("Missing username or password".to_string())
}

/// Accepts an urlencoded body or `multipart/form-data`, which is what a
/// browser `FormData` submission sends.
#[async_trait]
impl<S> FromRequest<S> for LoginForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            return Form::<Self>::from_request(req, state)
                .await
                .map(|Form(form)| form)
                .map_err(|_| missing_login_fields());
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|_| missing_login_fields())?;

        let (mut username, mut password) = (None, None);
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| missing_login_fields())?
        {
            let name = field.name().map(ToString::to_string);
            let value = field.text().await.map_err(|_| missing_login_fields())?;
            match name.as_deref() {
                Some("username") => username = Some(value),
                Some("password") => password = Some(value),
                _ => {}
            }
        }

        match (username, password) {
            (Some(username), Some(password)) => Ok(Self { username, password }),
            _ => Err(missing_login_fields()),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body(
        content(
            (LoginForm = "application/x-www-form-urlencoded"),
            (LoginForm = "multipart/form-data")
        )
    ),
    responses(
        (status = 200, description = "Logged in, session cookie set", body = StatusResponse),
        (status = 400, description = "Missing username or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    credentials: Extension<CredentialStore>,
    form: LoginForm,
) -> Result<impl IntoResponse, ApiError> {
    let LoginForm { username, password } = form;
    let password = SecretString::from(password);

    if !credentials.verify(&username, &password).await? {
        warn!("Failed login for {username}");
        return Err(ApiError::InvalidCredentials);
    }

    let cookie = session_cookie(&username).map_err(|err| {
        error!("Username is not a valid cookie value: {err}");
        ApiError::Internal
    })?;

    info!("Teacher {username} logged in");

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    Ok((headers, Json(StatusResponse::success())))
}

#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = StatusResponse)
    ),
    tag = "auth"
)]
pub async fn logout() -> impl IntoResponse {
    // Nothing is held server-side, clearing the cookie is the whole logout.
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, clear_session_cookie());
    (headers, Json(StatusResponse::success()))
}
