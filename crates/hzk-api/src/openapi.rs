//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI document.
//! Serves at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "healthzk API",
        version = "0.1.0",
        description = "PLONK proof generation for the health circuits and a health-assistant chat relay."
    ),
    paths(
        crate::routes::landing::index,
        crate::routes::proof::generate_proof,
        crate::routes::query::query,
        crate::routes::query::end_session,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::proof::GenerateProofRequest,
        crate::routes::proof::ProofResponse,
        crate::routes::query::QueryRequest,
        crate::routes::query::QueryResponse,
        crate::middleware::metrics::MetricsSnapshot,
    )),
    tags(
        (name = "landing", description = "Static front end"),
        (name = "proof", description = "Proof generation"),
        (name = "query", description = "Health assistant relay"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// Serve the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
