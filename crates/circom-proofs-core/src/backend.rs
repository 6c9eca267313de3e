use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::artifacts::CircuitDescriptor;
use crate::error::Result;
use crate::types::{Proof, ProofBundle, ProofInput, PublicSignals, VerificationKey, Witness};

/// Compiled artifacts the proving backend needs for one circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitArtifacts {
    /// Path to the witness-generator WASM.
    pub execution_binary: PathBuf,
    /// Path to the Groth16 proving key (`.zkey`).
    pub proving_key: PathBuf,
}

impl CircuitArtifacts {
    pub fn from_descriptor(descriptor: &CircuitDescriptor) -> Self {
        Self {
            execution_binary: descriptor.wasm_path().to_path_buf(),
            proving_key: descriptor.zkey_path().to_path_buf(),
        }
    }
}

/// Information about a missing prerequisite tool.
#[derive(Debug, Clone)]
pub struct PrerequisiteError {
    pub tool_name: String,
    pub install_instructions: String,
}

/// Result of checking a witness against the circuit constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintCheck {
    Satisfied,
    /// The witness breaks at least one constraint; carries the backend's report.
    Violated(String),
}

impl ConstraintCheck {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }
}

/// Proof generation and verification.
#[async_trait]
pub trait ProvingBackend: Send + Sync {
    /// Human-readable name: "snarkjs", "mock".
    fn name(&self) -> &'static str;

    /// Check that all required external tools are installed.
    fn check_prerequisites(&self) -> std::result::Result<(), Vec<PrerequisiteError>> {
        Ok(())
    }

    /// Compute the witness for `input` and a Groth16 proof over it.
    async fn compute_witness_and_proof(
        &self,
        artifacts: &CircuitArtifacts,
        input: &ProofInput,
    ) -> Result<ProofBundle>;

    /// Check a proof against a verification key.
    ///
    /// `Ok(false)` means the proof is well-formed but invalid. `Err` means the
    /// check could not be performed.
    async fn verify(
        &self,
        verification_key: &VerificationKey,
        public_signals: &PublicSignals,
        proof: &Proof,
    ) -> Result<bool>;
}

/// Builds transient circuit evaluations straight from circuit sources.
#[async_trait]
pub trait WitnessEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn check_prerequisites(&self) -> std::result::Result<(), Vec<PrerequisiteError>> {
        Ok(())
    }

    /// Compile or otherwise instantiate the circuit at `source`.
    ///
    /// The evaluation lives only as long as the returned box; nothing is
    /// written to the build tree.
    async fn load(&self, source: &Path) -> Result<Box<dyn CircuitEvaluation>>;
}

/// One instantiated circuit.
#[async_trait]
pub trait CircuitEvaluation: Send + Sync {
    async fn calculate_witness(&self, input: &ProofInput) -> Result<Witness>;

    async fn check_constraints(&self, witness: &Witness) -> Result<ConstraintCheck>;
}
