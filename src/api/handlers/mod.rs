//! API handlers and the error/response types they share.

pub mod activities;
pub mod auth;
pub mod health;
pub mod root;
pub mod session;

use crate::{activities::RegistryError, credentials::CredentialsError};
use axum::{
    extract::{Form, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

/// JSON body of every failed request.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Student email, taken from the query string or an urlencoded form body.
/// Only describes the parameter in `OpenAPI`; handlers read [`Pairs`].
#[derive(IntoParams, Debug)]
#[into_params(parameter_in = Query)]
pub struct EmailParams {
    /// Student email address
    pub email: String,
}

/// Raw `key=value` pairs, so repeated keys do not fail deserialization.
pub(crate) type Pairs = Vec<(String, String)>;

fn last_email(pairs: Pairs) -> Option<String> {
    pairs
        .into_iter()
        .rev()
        .find_map(|(key, value)| (key == "email").then_some(value))
}

/// Pick the email from the query string first, then the form body. A repeated
/// `email` key resolves to its last value.
pub(crate) fn email_param(
    query: Option<Query<Pairs>>,
    form: Option<Form<Pairs>>,
) -> Result<String, ApiError> {
    query
        .and_then(|Query(pairs)| last_email(pairs))
        .or_else(|| form.and_then(|Form(pairs)| last_email(pairs)))
        .ok_or_else(|| ApiError::BadRequest("Missing email".to_string()))
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    BadRequest(String),
    #[error("Internal server error")]
    Internal,
}

impl From<CredentialsError> for ApiError {
    fn from(err: CredentialsError) -> Self {
        error!("Credentials unavailable: {err}");
        Self::Internal
    }
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Registry(RegistryError::Unauthorized) | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::Registry(RegistryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Registry(RegistryError::AlreadyRegistered | RegistryError::NotRegistered)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
