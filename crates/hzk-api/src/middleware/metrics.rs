//! # Request Metrics
//!
//! In-process request counters, split by route family and exposed as JSON
//! at `/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use serde::Serialize;
use utoipa::ToSchema;

/// Shared metrics state.
#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    request_count: Arc<AtomicU64>,
    error_count: Arc<AtomicU64>,
    proof_requests: Arc<AtomicU64>,
    query_requests: Arc<AtomicU64>,
}

/// Point-in-time counter values.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub errors: u64,
    pub proof_requests: u64,
    pub query_requests: u64,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.request_count.load(Ordering::Relaxed),
            errors: self.error_count.load(Ordering::Relaxed),
            proof_requests: self.proof_requests.load(Ordering::Relaxed),
            query_requests: self.query_requests.load(Ordering::Relaxed),
        }
    }

    fn record(&self, path: &str, failed: bool) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        match path {
            "/generate-proof" => {
                self.proof_requests.fetch_add(1, Ordering::Relaxed);
            }
            "/query" => {
                self.query_requests.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
        if failed {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Middleware that increments request and error counters.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        let status = response.status();
        m.record(&path, status.is_client_error() || status.is_server_error());
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_splits_by_route() {
        let m = ApiMetrics::new();
        m.record("/generate-proof", true);
        m.record("/query", false);
        m.record("/", false);
        let snap = m.snapshot();
        assert_eq!(snap.requests, 3);
        assert_eq!(snap.errors, 1);
        assert_eq!(snap.proof_requests, 1);
        assert_eq!(snap.query_requests, 1);
    }

    #[test]
    fn clones_share_counters() {
        let m = ApiMetrics::new();
        m.clone().record("/query", false);
        assert_eq!(m.snapshot().query_requests, 1);
    }
}
