use super::{
    email_param,
    session::{extract_session_cookie, resolve},
    ApiError, EmailParams, ErrorBody, MessageResponse, Pairs,
};
use crate::{
    activities::{Activities, ActivityRecord, Registry, RegistryError},
    credentials::CredentialStore,
};
use axum::{
    extract::{Extension, Form, Path, Query},
    http::HeaderMap,
    Json,
};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, instrument};

/// Alias so `utoipa` does not infer a request body schema for the raw pairs;
/// `EmailParams` documents the parameter.
type PairsForm = Form<Pairs>;

#[utoipa::path(
    get,
    path = "/activities",
    responses(
        (status = 200, description = "Every activity keyed by name", body = HashMap<String, ActivityRecord>)
    ),
    tag = "activities"
)]
pub async fn list_activities(registry: Extension<Arc<Registry>>) -> Json<Activities> {
    Json(registry.list().await)
}

#[utoipa::path(
    post,
    path = "/activities/{activity_name}/signup",
    params(
        ("activity_name" = String, Path, description = "Activity name"),
        EmailParams
    ),
    responses(
        (status = 200, description = "Student signed up", body = MessageResponse),
        (status = 400, description = "Student is already signed up or email missing", body = ErrorBody),
        (status = 401, description = "No teacher session", body = ErrorBody),
        (status = 404, description = "Activity not found", body = ErrorBody)
    ),
    tag = "activities"
)]
#[instrument(skip(headers, registry, credentials, query, form))]
pub async fn signup(
    Path(activity_name): Path<String>,
    headers: HeaderMap,
    registry: Extension<Arc<Registry>>,
    credentials: Extension<CredentialStore>,
    query: Option<Query<Pairs>>,
    form: Option<PairsForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    let cookie = extract_session_cookie(&headers);
    let teacher = resolve(&credentials, cookie.as_deref()).await?;
    debug!("acting teacher: {:?}", teacher);

    let email = match email_param(query, form) {
        Ok(email) => email,
        // Unauthenticated callers see 401 before any input validation.
        Err(_) if teacher.is_none() => return Err(RegistryError::Unauthorized.into()),
        Err(err) => return Err(err),
    };

    let message = registry
        .signup(&activity_name, &email, teacher.as_deref())
        .await?;

    Ok(Json(MessageResponse { message }))
}

#[utoipa::path(
    delete,
    path = "/activities/{activity_name}/unregister",
    params(
        ("activity_name" = String, Path, description = "Activity name"),
        EmailParams
    ),
    responses(
        (status = 200, description = "Student unregistered", body = MessageResponse),
        (status = 400, description = "Student is not signed up or email missing", body = ErrorBody),
        (status = 404, description = "Activity not found", body = ErrorBody)
    ),
    tag = "activities"
)]
#[instrument(skip(registry, query, form))]
pub async fn unregister(
    Path(activity_name): Path<String>,
    registry: Extension<Arc<Registry>>,
    query: Option<Query<Pairs>>,
    form: Option<PairsForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = email_param(query, form)?;

    let message = registry.unregister(&activity_name, &email).await?;

    Ok(Json(MessageResponse { message }))
}
