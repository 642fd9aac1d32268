//! # Prover Errors
//!
//! Every failure of the proof pipeline, from circuit selection through
//! artifact read-back. Display strings are client-facing: the API layer
//! returns them verbatim in the `error` field.

use std::path::PathBuf;

use thiserror::Error;

/// Error produced while orchestrating a proof run.
#[derive(Error, Debug)]
pub enum ProverError {
    /// The requested circuit is not one of the supported identifiers.
    #[error("Invalid circuit selection.")]
    InvalidCircuit(String),

    /// A required circuit asset is absent on disk.
    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// A required external tool is not resolvable on the search path.
    #[error("'{0}' executable not found in PATH.")]
    MissingExecutable(&'static str),

    /// An external tool could not be started.
    #[error("failed to start '{tool}': {source}")]
    Spawn {
        tool: &'static str,
        source: std::io::Error,
    },

    /// An external tool exited non-zero. `stderr` is the tool's own output.
    #[error("Error during subprocess execution: {stderr}")]
    Subprocess {
        tool: &'static str,
        code: Option<i32>,
        stderr: String,
    },

    /// An external tool ran past the configured deadline and was killed.
    #[error("'{tool}' did not finish within {secs}s")]
    Timeout { tool: &'static str, secs: u64 },

    /// An emitted artifact could not be read or is not valid JSON.
    #[error("failed to read artifact {}: {reason}", .path.display())]
    Artifact { path: PathBuf, reason: String },

    /// Scratch directory or witness copy failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProverError {
    /// Whether the error was raised before any subprocess was spawned.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidCircuit(_) | Self::MissingFile(_) | Self::MissingExecutable(_)
        )
    }
}
