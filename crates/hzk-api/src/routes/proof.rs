//! # Proof Generation
//!
//! Routes:
//! - POST /generate-proof — run the witness generator and PLONK prover
//!   for one circuit and return the emitted proof and public signals
//!
//! Every prover failure, including an unknown or absent circuit name, is 400.
//! The run executes on its own task; if that task panics the request
//! gets a 500.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use hzk_prover::ProofBundle;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Proof generation request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateProofRequest {
    /// `HealthRecordVerification` or `HealthRiskAssessment`.
    #[serde(default)]
    pub circuit: Option<String>,
}

/// Proof and public signals exactly as emitted by `snarkjs`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProofResponse {
    pub proof: serde_json::Value,
    #[serde(rename = "publicSignals")]
    pub public_signals: serde_json::Value,
}

impl From<ProofBundle> for ProofResponse {
    fn from(bundle: ProofBundle) -> Self {
        Self {
            proof: bundle.proof,
            public_signals: bundle.public_signals,
        }
    }
}

/// Build the proof router.
pub fn router() -> Router<AppState> {
    Router::new().route("/generate-proof", post(generate_proof))
}

/// POST /generate-proof — Generate a PLONK proof for a circuit.
#[utoipa::path(
    post,
    path = "/generate-proof",
    request_body = GenerateProofRequest,
    responses(
        (status = 200, description = "Proof generated", body = ProofResponse),
        (status = 400, description = "Invalid selection, missing asset or tool, or prover failure", body = crate::error::ErrorBody),
        (status = 500, description = "Proof task failed unexpectedly", body = crate::error::ErrorBody),
    ),
    tag = "proof"
)]
pub(crate) async fn generate_proof(
    State(state): State<AppState>,
    body: Result<Json<GenerateProofRequest>, JsonRejection>,
) -> Result<Json<ProofResponse>, AppError> {
    let req = extract_json(body)?;
    tracing::info!(circuit = ?req.circuit, "received proof request");

    let circuit = req.circuit.unwrap_or_default();
    let prover = Arc::clone(&state.prover);
    let bundle = tokio::spawn(async move { prover.generate(&circuit).await }).await??;
    Ok(Json(bundle.into()))
}
