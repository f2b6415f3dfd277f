use axum::response::Redirect;

pub const INDEX_PAGE: &str = "/static/index.html";

// axum handler for /
pub async fn root() -> Redirect {
    Redirect::temporary(INDEX_PAGE)
}
