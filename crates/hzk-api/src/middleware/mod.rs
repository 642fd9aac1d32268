//! # Middleware Modules
//!
//! Tower middleware layers for the API service. Request tracing is the
//! stock `tower_http` `TraceLayer`, installed directly in [`crate::app`].

pub mod metrics;
