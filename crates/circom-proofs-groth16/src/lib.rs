//! Groth16 backend for circom-proofs.
//!
//! Uses [snarkjs](https://github.com/iden3/snarkjs) for witness computation,
//! proving, verification and witness checking, and
//! [Circom](https://docs.circom.io/) to compile circuit sources for the witness
//! harness. Every call works in a scratch directory that is removed afterwards;
//! nothing but the final proof pair is written to the build tree.
//!
//! **Prerequisites**: `snarkjs` and `node`; `circom` as well for the harness.

mod circuit;
mod prover;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use circom_proofs_core::backend::{
    CircuitArtifacts, CircuitEvaluation, ConstraintCheck, PrerequisiteError, ProvingBackend,
    WitnessEngine,
};
use circom_proofs_core::error::{CircomProofsError, Result};
use circom_proofs_core::store;
use circom_proofs_core::types::{
    Proof, ProofBundle, ProofInput, PublicSignals, VerificationKey, Witness,
};

pub use prover::SnarkjsRun;

fn scratch_dir() -> Result<TempDir> {
    Ok(tempfile::Builder::new().prefix("circom-proofs").tempdir()?)
}

fn missing(tools: &[(&str, &str)]) -> std::result::Result<(), Vec<PrerequisiteError>> {
    let missing: Vec<_> = tools
        .iter()
        .filter(|(name, _)| which::which(name).is_err())
        .map(|(name, install)| PrerequisiteError {
            tool_name: (*name).into(),
            install_instructions: (*install).into(),
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

const SNARKJS: (&str, &str) = ("snarkjs", "npm install -g snarkjs");
const NODE: (&str, &str) = ("node", "https://nodejs.org/");
const CIRCOM: (&str, &str) = ("circom", "https://docs.circom.io/getting-started/installation/");

/// Read a JSON file snarkjs just wrote into the scratch directory.
fn read_output<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| {
        CircomProofsError::Backend(format!("failed to parse {}: {e}", path.display()))
    })
}

async fn witness_from_wtns(wtns: &Path, scratch: &Path) -> Result<Witness> {
    let json_path = scratch.join("witness.json");
    prover::export_witness_json(wtns, &json_path).await?;
    read_output(&json_path)
}

/// Groth16 proving backend driving the `snarkjs` CLI.
pub struct SnarkjsBackend;

impl Default for SnarkjsBackend {
    fn default() -> Self {
        Self
    }
}

impl SnarkjsBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvingBackend for SnarkjsBackend {
    fn name(&self) -> &'static str {
        "snarkjs"
    }

    fn check_prerequisites(&self) -> std::result::Result<(), Vec<PrerequisiteError>> {
        missing(&[SNARKJS, NODE])
    }

    async fn compute_witness_and_proof(
        &self,
        artifacts: &CircuitArtifacts,
        input: &ProofInput,
    ) -> Result<ProofBundle> {
        let scratch = scratch_dir()?;
        let dir = scratch.path();

        let input_path = dir.join("input.json");
        store::write_json(input, &input_path)?;

        let wtns = dir.join("witness.wtns");
        tracing::info!("computing witness");
        prover::calculate_witness(&artifacts.execution_binary, &input_path, &wtns).await?;

        let proof_path = dir.join("proof.json");
        let public_path = dir.join("public.json");
        tracing::info!("generating Groth16 proof");
        prover::prove(&artifacts.proving_key, &wtns, &proof_path, &public_path).await?;

        let witness = witness_from_wtns(&wtns, dir).await?;
        let proof: Proof = read_output(&proof_path)?;
        let public_signals: PublicSignals = read_output(&public_path)?;

        Ok(ProofBundle {
            proof,
            public_signals,
            witness,
        })
    }

    async fn verify(
        &self,
        verification_key: &VerificationKey,
        public_signals: &PublicSignals,
        proof: &Proof,
    ) -> Result<bool> {
        let scratch = scratch_dir()?;
        let dir = scratch.path();

        let vk_path = dir.join("verification_key.json");
        let public_path = dir.join("public.json");
        let proof_path = dir.join("proof.json");
        store::write_json(verification_key, &vk_path)?;
        store::write_json(public_signals, &public_path)?;
        store::write_json(proof, &proof_path)?;

        prover::verify(&vk_path, &public_path, &proof_path).await
    }
}

/// Compiles `.circom` sources on demand for the witness harness.
#[derive(Debug, Clone, Default)]
pub struct CircomEngine {
    include_paths: Vec<PathBuf>,
}

impl CircomEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library search paths passed to `circom -l` (e.g. `node_modules`).
    pub fn with_include_paths(mut self, include_paths: Vec<PathBuf>) -> Self {
        self.include_paths = include_paths;
        self
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }
}

#[async_trait]
impl WitnessEngine for CircomEngine {
    fn name(&self) -> &'static str {
        "circom"
    }

    fn check_prerequisites(&self) -> std::result::Result<(), Vec<PrerequisiteError>> {
        missing(&[CIRCOM, SNARKJS, NODE])
    }

    async fn load(&self, source: &Path) -> Result<Box<dyn CircuitEvaluation>> {
        if !source.exists() {
            return Err(CircomProofsError::Backend(format!(
                "circuit source not found: {}",
                source.display()
            )));
        }

        let build = scratch_dir()?;
        tracing::info!("compiling circuit: {}", source.display());
        circuit::compile_circom(source, build.path(), &self.include_paths).await?;

        let name = circuit::circuit_stem(source);
        let wasm = circuit::witness_wasm_path(build.path(), name);
        let r1cs = circuit::r1cs_path(build.path(), name);
        Ok(Box::new(CompiledCircuit {
            build,
            wasm,
            r1cs,
            witnesses: Mutex::new(Vec::new()),
            next_run: AtomicUsize::new(0),
        }))
    }
}

/// A circuit compiled into a temporary directory; removed on drop.
///
/// Binary witnesses are kept next to the build so `check_constraints` can
/// hand snarkjs the exact `.wtns` a witness came from.
struct CompiledCircuit {
    build: TempDir,
    wasm: PathBuf,
    r1cs: PathBuf,
    witnesses: Mutex<Vec<(Witness, PathBuf)>>,
    next_run: AtomicUsize,
}

#[async_trait]
impl CircuitEvaluation for CompiledCircuit {
    async fn calculate_witness(&self, input: &ProofInput) -> Result<Witness> {
        let run = self.next_run.fetch_add(1, Ordering::Relaxed);
        let dir = self.build.path().join(format!("eval-{run}"));
        std::fs::create_dir_all(&dir)?;
        let input_path = dir.join("input.json");
        store::write_json(input, &input_path)?;

        let wtns = dir.join("witness.wtns");
        prover::calculate_witness(&self.wasm, &input_path, &wtns).await?;
        let witness = witness_from_wtns(&wtns, &dir).await?;

        self.witnesses
            .lock()
            .map_err(|_| CircomProofsError::Backend("witness cache poisoned".into()))?
            .push((witness.clone(), wtns));
        Ok(witness)
    }

    async fn check_constraints(&self, witness: &Witness) -> Result<ConstraintCheck> {
        let wtns = self
            .witnesses
            .lock()
            .map_err(|_| CircomProofsError::Backend("witness cache poisoned".into()))?
            .iter()
            .find(|(w, _)| w == witness)
            .map(|(_, path)| path.clone())
            .ok_or_else(|| {
                CircomProofsError::Backend(
                    "witness was not computed by this circuit evaluation".into(),
                )
            })?;
        prover::check_witness(&self.r1cs, &wtns).await
    }
}
