use super::handlers::{
    activities, auth, auth::LoginForm, health, health::Health, ErrorBody, MessageResponse,
    StatusResponse,
};
use crate::activities::ActivityRecord;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::login,
        auth::logout,
        activities::list_activities,
        activities::signup,
        activities::unregister,
    ),
    components(schemas(
        ActivityRecord,
        ErrorBody,
        Health,
        LoginForm,
        MessageResponse,
        StatusResponse
    )),
    tags(
        (name = "activities", description = "Activity listing and enrollment"),
        (name = "auth", description = "Teacher login and logout"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

/// `OpenAPI` document for every served API route.
///
/// `/`, `/static` and the Swagger UI itself are left out.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
