//! # hzk-api — Axum API Service
//!
//! HTTP surface for proof generation over the two health circuits and for
//! the health-assistant chat relay.
//!
//! ## API Surface
//!
//! | Route                   | Module               | Purpose                  |
//! |-------------------------|----------------------|--------------------------|
//! | `GET /`                 | [`routes::landing`]  | Static landing page      |
//! | `POST /generate-proof`  | [`routes::proof`]    | PLONK proof for a circuit |
//! | `POST /query`           | [`routes::query`]    | Relay a question         |
//! | `DELETE /sessions/:id`  | [`routes::query`]    | End a conversation       |
//! | `GET /health/*`         | this module          | Liveness / readiness     |
//! | `GET /metrics`          | this module          | Request counters         |
//! | `GET /openapi.json`     | [`openapi`]          | OpenAPI document         |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::{Extension, Json, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::{ApiMetrics, MetricsSnapshot};
use crate::state::AppState;

pub use error::AppError;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();

    // Request bodies are a circuit name or a short form; 64 KiB is ample.
    let api = Router::new()
        .merge(routes::landing::router())
        .merge(routes::proof::router())
        .merge(routes::query::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(metrics.clone()))
        .with_state(state);

    let probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .route("/metrics", axum::routing::get(metrics_json))
        .layer(Extension(metrics));

    Router::new().merge(probes).merge(api)
}

/// Liveness probe.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. No external dependency is checked.
async fn readiness() -> &'static str {
    "ready"
}

/// GET /metrics — Current request counters.
async fn metrics_json(Extension(metrics): Extension<ApiMetrics>) -> Json<MetricsSnapshot> {
    Json(metrics.snapshot())
}
