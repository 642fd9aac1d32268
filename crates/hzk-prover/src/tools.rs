//! # External Tool Resolution
//!
//! Locates the `node` and `snarkjs` executables on a search path before
//! anything is spawned. The search path defaults to the process `PATH`
//! but can be overridden so deployments (and tests) can pin toolchains.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::ProverError;

/// Witness generator runtime.
pub const NODE: &str = "node";
/// PLONK prover CLI.
pub const SNARKJS: &str = "snarkjs";

/// Absolute locations of the two external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub node: PathBuf,
    pub snarkjs: PathBuf,
}

impl ToolPaths {
    /// Resolve `node`, then `snarkjs`, on `search_path` (or `PATH` when
    /// `None`). Reports the first tool that cannot be found.
    pub fn resolve(search_path: Option<&OsStr>) -> Result<Self, ProverError> {
        let env_path = std::env::var_os("PATH");
        let search = search_path.or(env_path.as_deref());
        let node = which(NODE, search).ok_or(ProverError::MissingExecutable(NODE))?;
        let snarkjs = which(SNARKJS, search).ok_or(ProverError::MissingExecutable(SNARKJS))?;
        Ok(Self { node, snarkjs })
    }
}

/// Find `program` in the directories of `search_path`.
pub fn which(program: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let search_path = search_path?;
    std::env::split_paths(search_path)
        .flat_map(|dir| candidates(&dir, program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    let exts: OsString =
        std::env::var_os("PATHEXT").unwrap_or_else(|| OsString::from(".EXE;.CMD;.BAT"));
    let mut out = vec![dir.join(program)];
    for ext in exts.to_string_lossy().split(';').filter(|e| !e.is_empty()) {
        out.push(dir.join(format!("{program}{}", ext.to_lowercase())));
    }
    out
}

#[cfg(not(windows))]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Join directories into a search path value.
pub fn search_path<I, P>(dirs: I) -> Option<OsString>
where
    I: IntoIterator<Item = P>,
    P: AsRef<OsStr>,
{
    std::env::join_paths(dirs).ok()
}
