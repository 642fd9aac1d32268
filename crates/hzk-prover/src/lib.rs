//! # hzk-prover — Proof Orchestration
//!
//! Produces PLONK proofs for the two health circuits by driving external
//! tooling. Nothing cryptographic happens in this crate: the circom witness
//! generator (run under `node`) and `snarkjs` do the work, and their JSON
//! outputs are passed through unmodified.
//!
//! ## Modules
//!
//! - [`circuit`]: supported circuits and their asset table
//! - [`tools`]: `node` / `snarkjs` resolution on a search path
//! - [`process`]: bounded subprocess execution
//! - [`prover`]: the orchestrator
//!
//! ## Failure Model
//!
//! Every failure is scoped to one run and reported as a [`ProverError`].
//! There are no retries.

pub mod circuit;
pub mod error;
pub mod process;
pub mod prover;
pub mod tools;

pub use circuit::{CircuitId, CircuitPaths, CircuitRegistry};
pub use error::ProverError;
pub use prover::{ProofBundle, Prover, ProverConfig};
pub use tools::ToolPaths;
