//! # Landing Page
//!
//! Routes:
//! - GET / — static HTML front end, embedded at compile time

use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Build the landing router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// GET / — Landing page.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Landing page", body = String, content_type = "text/html")),
    tag = "landing"
)]
pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
