//! End-to-end orchestration tests against stand-in `node` and `snarkjs`
//! shell scripts. The stand-ins log each invocation so tests can assert
//! whether anything was spawned.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hzk_prover::{CircuitId, CircuitPaths, ProverError, Prover, ProverConfig};

const PROOF: &str = r#"{"A":["1","2","1"],"protocol":"plonk","curve":"bn128"}"#;
const PUBLIC: &str = r#"["1","42"]"#;

struct Fixture {
    assets: tempfile::TempDir,
    bin: tempfile::TempDir,
    log: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let assets = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let log = bin.path().join("calls.log");
        Self { assets, bin, log }
    }

    fn with_assets(self, circuit: CircuitId) -> Self {
        let paths = CircuitPaths::for_circuit(self.assets.path(), circuit);
        for p in paths.required() {
            std::fs::create_dir_all(p.parent().unwrap()).unwrap();
            std::fs::write(p, b"stub").unwrap();
        }
        self
    }

    fn script(&self, name: &str, body: &str) {
        let path = self.bin.path().join(name);
        let text = format!(
            "#!/bin/sh\necho \"{name} $*\" >> '{}'\n{body}\n",
            self.log.display()
        );
        std::fs::write(&path, text).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn working_tools(self) -> Self {
        self.script("node", "printf 'witness-for-%s' \"$(basename \"$2\")\" > \"$4\"");
        self.script(
            "snarkjs",
            &format!(
                "pwd >> '{}.cwd'\nprintf '%s' '{PROOF}' > \"$5\"\nprintf '%s' '{PUBLIC}' > \"$6\"",
                self.log.display()
            ),
        );
        self
    }

    fn prover(&self, timeout: Duration) -> Prover {
        Prover::new(ProverConfig {
            assets_dir: self.assets.path().to_path_buf(),
            timeout,
            search_path: Some(self.bin.path().as_os_str().to_owned()),
        })
    }

    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn paths(&self, circuit: CircuitId) -> CircuitPaths {
        CircuitPaths::for_circuit(self.assets.path(), circuit)
    }
}

fn remove(p: &Path) {
    std::fs::remove_file(p).unwrap();
}

#[tokio::test]
async fn successful_run_returns_emitted_json() {
    let fx = Fixture::new()
        .with_assets(CircuitId::HealthRiskAssessment)
        .working_tools();
    let bundle = fx
        .prover(Duration::from_secs(10))
        .generate("HealthRiskAssessment")
        .await
        .unwrap();

    assert_eq!(bundle.proof, serde_json::from_str::<serde_json::Value>(PROOF).unwrap());
    assert_eq!(
        bundle.public_signals,
        serde_json::from_str::<serde_json::Value>(PUBLIC).unwrap()
    );

    let calls = fx.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].starts_with("node "));
    assert!(calls[0].contains("generate_witness.js"));
    assert!(calls[1].starts_with("snarkjs plonk prove "));
    assert!(calls[1].ends_with("proof.json public.json"));
}

#[tokio::test]
async fn successful_run_publishes_witness_and_removes_scratch() {
    let fx = Fixture::new()
        .with_assets(CircuitId::HealthRecordVerification)
        .working_tools();
    fx.prover(Duration::from_secs(10))
        .generate("HealthRecordVerification")
        .await
        .unwrap();

    let published =
        std::fs::read_to_string(fx.paths(CircuitId::HealthRecordVerification).witness).unwrap();
    assert_eq!(published, "witness-for-HealthRecordVerification.wasm");

    let cwd = std::fs::read_to_string(format!("{}.cwd", fx.log.display())).unwrap();
    let scratch = PathBuf::from(cwd.trim());
    assert!(!scratch.exists(), "scratch dir must be removed: {scratch:?}");
    assert!(!fx.assets.path().join("proof.json").exists());
}

#[tokio::test]
async fn invalid_circuit_spawns_nothing() {
    let fx = Fixture::new().working_tools();
    let err = fx
        .prover(Duration::from_secs(10))
        .generate("healthRiskAssessment")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid circuit selection.");
    assert!(fx.calls().is_empty());
}

#[tokio::test]
async fn each_missing_asset_is_named_in_check_order() {
    let circuit = CircuitId::HealthRecordVerification;
    let fx = Fixture::new().with_assets(circuit).working_tools();
    let prover = fx.prover(Duration::from_secs(10));
    let paths = fx.paths(circuit);

    // Remove the last path first so each removal becomes the first missing one.
    for target in paths.required().into_iter().rev() {
        remove(target);
        let err = prover.generate(circuit.as_str()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("File not found: {}", target.display())
        );
    }
    assert!(fx.calls().is_empty());
}

#[tokio::test]
async fn missing_node_reported_before_snarkjs() {
    let fx = Fixture::new().with_assets(CircuitId::HealthRiskAssessment);
    let err = fx
        .prover(Duration::from_secs(10))
        .generate("HealthRiskAssessment")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "'node' executable not found in PATH.");

    fx.script("node", "exit 0");
    let err = fx
        .prover(Duration::from_secs(10))
        .generate("HealthRiskAssessment")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "'snarkjs' executable not found in PATH.");
    assert!(fx.calls().is_empty());
}

#[tokio::test]
async fn witness_failure_surfaces_stderr_and_skips_prover() {
    let fx = Fixture::new().with_assets(CircuitId::HealthRiskAssessment);
    fx.script("node", "echo 'Error: Too many values for input signal heartRate' >&2\nexit 1");
    fx.script("snarkjs", "exit 0");

    let err = fx
        .prover(Duration::from_secs(10))
        .generate("HealthRiskAssessment")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error during subprocess execution: Error: Too many values for input signal heartRate\n"
    );
    assert!(matches!(err, ProverError::Subprocess { tool: "node", .. }));
    let calls = fx.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("node "));
}

#[tokio::test]
async fn prover_failure_is_subprocess_error() {
    let fx = Fixture::new().with_assets(CircuitId::HealthRiskAssessment);
    fx.script("node", "printf w > \"$4\"");
    fx.script("snarkjs", "echo '[ERROR] snarkJS: zkey file corrupt' >&2\nexit 1");

    let err = fx
        .prover(Duration::from_secs(10))
        .generate("HealthRiskAssessment")
        .await
        .unwrap_err();
    match err {
        ProverError::Subprocess { tool, stderr, .. } => {
            assert_eq!(tool, "snarkjs");
            assert!(stderr.contains("zkey file corrupt"));
        }
        other => panic!("expected Subprocess, got: {other:?}"),
    }
}

#[tokio::test]
async fn hung_witness_generator_times_out() {
    let fx = Fixture::new().with_assets(CircuitId::HealthRiskAssessment);
    fx.script("node", "sleep 30");
    fx.script("snarkjs", "exit 0");

    let err = fx
        .prover(Duration::from_secs(1))
        .generate("HealthRiskAssessment")
        .await
        .unwrap_err();
    assert!(matches!(err, ProverError::Timeout { tool: "node", secs: 1 }));
}

#[tokio::test]
async fn concurrent_runs_do_not_share_outputs() {
    let fx = Fixture::new()
        .with_assets(CircuitId::HealthRiskAssessment)
        .with_assets(CircuitId::HealthRecordVerification)
        .working_tools();
    let prover = fx.prover(Duration::from_secs(10));

    let (a, b) = tokio::join!(
        prover.generate("HealthRiskAssessment"),
        prover.generate("HealthRecordVerification"),
    );
    assert!(a.is_ok());
    assert!(b.is_ok());

    let cwd = std::fs::read_to_string(format!("{}.cwd", fx.log.display())).unwrap();
    let dirs: Vec<&str> = cwd.lines().collect();
    assert_eq!(dirs.len(), 2);
    assert_ne!(dirs[0], dirs[1]);
}

#[tokio::test]
async fn relative_asset_root_resolves_from_process_cwd() {
    let circuit = CircuitId::HealthRiskAssessment;
    let cwd = std::env::current_dir().unwrap();
    let mut fx = Fixture::new();
    fx.assets = tempfile::tempdir_in(&cwd).unwrap();
    let fx = fx.with_assets(circuit);
    fx.script(
        "node",
        "for f in \"$1\" \"$2\" \"$3\"; do [ -f \"$f\" ] || { echo \"missing $f\" >&2; exit 1; }; done\nprintf w > \"$4\"",
    );
    fx.script(
        "snarkjs",
        &format!(
            "[ -f \"$3\" ] || {{ echo \"zkey not found: $3 (cwd $(pwd))\" >&2; exit 1; }}\nprintf '%s' '{PROOF}' > \"$5\"\nprintf '%s' '{PUBLIC}' > \"$6\""
        ),
    );

    let relative = PathBuf::from(fx.assets.path().file_name().unwrap());
    assert!(relative.is_relative());
    let prover = Prover::new(ProverConfig {
        assets_dir: relative.clone(),
        timeout: Duration::from_secs(10),
        search_path: Some(fx.bin.path().as_os_str().to_owned()),
    });

    let bundle = prover.generate(circuit.as_str()).await.unwrap();
    assert_eq!(bundle.public_signals, serde_json::from_str::<serde_json::Value>(PUBLIC).unwrap());

    // Missing-file errors still name the path as configured.
    std::fs::remove_file(fx.paths(circuit).input).unwrap();
    let err = prover.generate(circuit.as_str()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("File not found: {}", relative.join("input.json").display())
    );
}
