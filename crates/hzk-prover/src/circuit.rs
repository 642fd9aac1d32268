//! # Circuit Asset Table
//!
//! The two supported circuits and the on-disk assets each one needs.
//! The table is built once at startup from the asset root; request
//! handling only looks paths up.
//!
//! ## Layout (relative to the asset root)
//!
//! | Circuit | wasm | input | witness | zkey | script |
//! |---------|------|-------|---------|------|--------|
//! | `HealthRecordVerification` | `HealthRecordVerification_js/HealthRecordVerification.wasm` | `input_healthrecord.json` | `witness_healthrecord.wtns` | `HealthRecordVerification.zkey` | `HealthRecordVerification_js/generate_witness.js` |
//! | `HealthRiskAssessment` | `HealthRiskAssessment_js/HealthRiskAssessment.wasm` | `input.json` | `witness.wtns` | `HealthRiskAssessment.zkey` | `HealthRiskAssessment_js/generate_witness.js` |

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProverError;

/// Default asset root, relative to the process working directory.
pub const DEFAULT_ASSETS_DIR: &str = "backend/circom";

/// A supported circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitId {
    HealthRecordVerification,
    HealthRiskAssessment,
}

impl CircuitId {
    /// All supported circuits, in table order.
    pub const ALL: [CircuitId; 2] = [
        CircuitId::HealthRecordVerification,
        CircuitId::HealthRiskAssessment,
    ];

    /// Parse a client-supplied circuit name. Matching is exact.
    pub fn parse(name: &str) -> Result<Self, ProverError> {
        match name {
            "HealthRecordVerification" => Ok(Self::HealthRecordVerification),
            "HealthRiskAssessment" => Ok(Self::HealthRiskAssessment),
            other => Err(ProverError::InvalidCircuit(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HealthRecordVerification => "HealthRecordVerification",
            Self::HealthRiskAssessment => "HealthRiskAssessment",
        }
    }

    /// File names of the input data and witness output for this circuit.
    fn io_names(&self) -> (&'static str, &'static str) {
        match self {
            Self::HealthRecordVerification => {
                ("input_healthrecord.json", "witness_healthrecord.wtns")
            }
            Self::HealthRiskAssessment => ("input.json", "witness.wtns"),
        }
    }
}

impl FromStr for CircuitId {
    type Err = ProverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five assets one circuit needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitPaths {
    /// Compiled circuit (`.wasm`).
    pub wasm: PathBuf,
    /// Circuit input data (`.json`).
    pub input: PathBuf,
    /// Published witness location (`.wtns`). Must already exist; it is
    /// overwritten after each successful run.
    pub witness: PathBuf,
    /// PLONK proving key (`.zkey`).
    pub zkey: PathBuf,
    /// circom-generated witness helper (`generate_witness.js`).
    pub witness_script: PathBuf,
}

impl CircuitPaths {
    /// Resolve the asset bundle for `circuit` under `root`.
    pub fn for_circuit(root: &Path, circuit: CircuitId) -> Self {
        let name = circuit.as_str();
        let js_dir = root.join(format!("{name}_js"));
        let (input, witness) = circuit.io_names();
        Self {
            wasm: js_dir.join(format!("{name}.wasm")),
            input: root.join(input),
            witness: root.join(witness),
            zkey: root.join(format!("{name}.zkey")),
            witness_script: js_dir.join("generate_witness.js"),
        }
    }

    /// The required paths in check order.
    pub fn required(&self) -> [&Path; 5] {
        [
            &self.wasm,
            &self.input,
            &self.witness,
            &self.zkey,
            &self.witness_script,
        ]
    }

    /// The first required path that does not exist, if any.
    pub fn first_missing(&self) -> Option<&Path> {
        self.required().into_iter().find(|p| !p.exists())
    }

    /// Every required path that does not exist.
    pub fn all_missing(&self) -> Vec<PathBuf> {
        self.required()
            .into_iter()
            .filter(|p| !p.exists())
            .map(Path::to_path_buf)
            .collect()
    }
}

/// Circuit → asset table.
#[derive(Debug, Clone)]
pub struct CircuitRegistry {
    root: PathBuf,
    record_verification: CircuitPaths,
    risk_assessment: CircuitPaths,
}

impl CircuitRegistry {
    /// Build the table for every supported circuit under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            record_verification: CircuitPaths::for_circuit(
                &root,
                CircuitId::HealthRecordVerification,
            ),
            risk_assessment: CircuitPaths::for_circuit(&root, CircuitId::HealthRiskAssessment),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn paths(&self, circuit: CircuitId) -> &CircuitPaths {
        match circuit {
            CircuitId::HealthRecordVerification => &self.record_verification,
            CircuitId::HealthRiskAssessment => &self.risk_assessment,
        }
    }

    /// Startup check: every circuit whose assets are incomplete, with the
    /// missing paths. Incomplete circuits still fail per request.
    pub fn audit(&self) -> Vec<(CircuitId, Vec<PathBuf>)> {
        let report: Vec<_> = CircuitId::ALL
            .iter()
            .map(|&id| (id, self.paths(id).all_missing()))
            .filter(|(_, missing)| !missing.is_empty())
            .collect();
        for (id, missing) in &report {
            tracing::warn!(
                circuit = %id,
                missing = ?missing,
                "circuit assets incomplete; proof requests will fail until they are provided"
            );
        }
        report
    }
}
