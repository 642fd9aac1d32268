//! # Proof Orchestrator
//!
//! Drives one proof run end to end:
//!
//! ```text
//! circuit name → CircuitId → 5 asset checks → node/snarkjs lookup
//!   → node generate_witness.js <wasm> <input> <scratch>/witness.wtns
//!   → snarkjs plonk prove <zkey> <scratch>/witness.wtns proof.json public.json
//!   → read proof.json + public.json → publish witness → ProofBundle
//! ```
//!
//! Every run gets its own scratch directory, so concurrent runs never share
//! output files. The directory is removed when the run ends, whatever the
//! outcome. Preconditions (circuit name, assets, executables) are checked
//! before anything is spawned; the first failure aborts the run.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::circuit::{CircuitId, CircuitRegistry, DEFAULT_ASSETS_DIR};
use crate::error::ProverError;
use crate::process::Invocation;
use crate::tools::{ToolPaths, NODE, SNARKJS};

/// File name the prover writes the proof to, inside the scratch directory.
pub const PROOF_FILE: &str = "proof.json";
/// File name the prover writes the public signals to.
pub const PUBLIC_FILE: &str = "public.json";
const SCRATCH_WITNESS: &str = "witness.wtns";

/// Default per-tool deadline.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Proof and public signals as emitted by the prover, untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofBundle {
    pub proof: Value,
    #[serde(rename = "publicSignals")]
    pub public_signals: Value,
}

/// Orchestrator settings.
#[derive(Debug, Clone)]
pub struct ProverConfig {
    /// Root of the circuit assets.
    pub assets_dir: PathBuf,
    /// Deadline for each external tool.
    pub timeout: Duration,
    /// Directories searched for `node` and `snarkjs`. `None` uses `PATH`.
    pub search_path: Option<OsString>,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            search_path: None,
        }
    }
}

impl ProverConfig {
    /// Load from environment variables.
    ///
    /// - `CIRCUIT_ASSETS_DIR` (default: `backend/circom`)
    /// - `PROVER_TIMEOUT_SECS` (default: 300)
    /// - `PROVER_SEARCH_PATH` (default: the process `PATH`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            assets_dir: std::env::var_os("CIRCUIT_ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_dir),
            timeout: std::env::var("PROVER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            search_path: std::env::var_os("PROVER_SEARCH_PATH"),
        }
    }
}

/// Runs the witness generator and PLONK prover for the supported circuits.
#[derive(Debug, Clone)]
pub struct Prover {
    registry: CircuitRegistry,
    timeout: Duration,
    search_path: Option<OsString>,
}

impl Prover {
    pub fn new(config: ProverConfig) -> Self {
        Self {
            registry: CircuitRegistry::new(config.assets_dir),
            timeout: config.timeout,
            search_path: config.search_path,
        }
    }

    pub fn registry(&self) -> &CircuitRegistry {
        &self.registry
    }

    /// Check every precondition for `circuit` without spawning anything.
    pub fn preflight(&self, circuit: &str) -> Result<(CircuitId, ToolPaths), ProverError> {
        let id = CircuitId::parse(circuit)?;
        let paths = self.registry.paths(id);
        if let Some(missing) = paths.first_missing() {
            return Err(ProverError::MissingFile(missing.to_path_buf()));
        }
        let tools = ToolPaths::resolve(self.search_path.as_deref())?;
        Ok((id, tools))
    }

    /// Generate a proof for `circuit`.
    pub async fn generate(&self, circuit: &str) -> Result<ProofBundle, ProverError> {
        let (id, tools) = self.preflight(circuit)?;
        let paths = self.registry.paths(id);

        tracing::info!(circuit = %id, script = %paths.witness_script.display(), "running witness generator");
        tracing::info!(circuit = %id, wasm = %paths.wasm.display(), "wasm path");
        tracing::info!(circuit = %id, input = %paths.input.display(), "input path");
        tracing::info!(circuit = %id, witness = %paths.witness.display(), "witness path");
        tracing::info!(circuit = %id, zkey = %paths.zkey.display(), "zkey path");

        // The prover runs inside the scratch dir, so every asset it is
        // handed must resolve independently of its working directory.
        let cwd = std::env::current_dir()?;
        let script = cwd.join(&paths.witness_script);
        let wasm = cwd.join(&paths.wasm);
        let input = cwd.join(&paths.input);
        let zkey = cwd.join(&paths.zkey);

        let scratch = tempfile::Builder::new()
            .prefix(&format!("hzk-{}-", id.as_str()))
            .tempdir()?;
        let witness = scratch.path().join(SCRATCH_WITNESS);

        Invocation::new(NODE, &tools.node)
            .arg(&script)
            .arg(&wasm)
            .arg(&input)
            .arg(&witness)
            .run(self.timeout)
            .await?;

        Invocation::new(SNARKJS, &tools.snarkjs)
            .arg("plonk")
            .arg("prove")
            .arg(&zkey)
            .arg(&witness)
            .arg(PROOF_FILE)
            .arg(PUBLIC_FILE)
            .current_dir(scratch.path())
            .run(self.timeout)
            .await?;

        let proof = read_json(&scratch.path().join(PROOF_FILE)).await?;
        let public_signals = read_json(&scratch.path().join(PUBLIC_FILE)).await?;

        tokio::fs::copy(&witness, &paths.witness).await?;
        tracing::info!(circuit = %id, "proof generated");

        Ok(ProofBundle {
            proof,
            public_signals,
        })
    }
}

async fn read_json(path: &Path) -> Result<Value, ProverError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ProverError::Artifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    serde_json::from_slice(&bytes).map_err(|e| ProverError::Artifact {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
