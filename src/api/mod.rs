use crate::{activities::Registry, cli::telemetry, credentials::CredentialStore};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    routing::{delete, get, post},
    Router,
};
use std::{path::PathBuf, sync::Arc};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, services::ServeDir, set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, warn, Span};
use ulid::Ulid;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;
mod openapi;

pub use openapi::openapi;

use handlers::{activities, auth, health, root};

/// Everything a running server needs besides its listener.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub credentials: CredentialStore,
    pub static_dir: PathBuf,
}

impl AppState {
    /// State holding the startup catalog.
    #[must_use]
    pub fn new(credentials: CredentialStore, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry: Arc::new(Registry::seeded()),
            credentials,
            static_dir: static_dir.into(),
        }
    }
}

/// Build the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/activities", get(activities::list_activities))
        .route("/activities/:activity_name/signup", post(activities::signup))
        .route(
            "/activities/:activity_name/unregister",
            delete(activities::unregister),
        )
        .nest_service("/static", ServeDir::new(&state.static_dir))
        .merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state.registry.clone()))
                .layer(Extension(state.credentials.clone())),
        )
}

/// Start the server
/// # Errors
/// Return error if the credentials file is unusable or the listener fails
pub async fn new(port: u16, state: AppState) -> Result<()> {
    // Refuse to start without a readable teacher table.
    let teachers = state.credentials.load().await.with_context(|| {
        format!(
            "Failed to load credentials from {}",
            state.credentials.path().display()
        )
    })?;

    if teachers.is_empty() {
        warn!(
            "No teachers in {}, signups will be refused",
            state.credentials.path().display()
        );
    } else {
        info!(
            "Loaded {} teacher(s) from {}",
            teachers.len(),
            state.credentials.path().display()
        );
    }

    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry::shutdown_tracer();

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!("Failed to install terminate handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}
