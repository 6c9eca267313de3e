//! Proof verification against a circuit's verification key.

use std::fmt;

use crate::artifacts::{ArtifactKind, ArtifactLocator};
use crate::backend::ProvingBackend;
use crate::error::Result;
use crate::store;
use crate::types::{Proof, PublicSignals, VerificationKey};

/// Answer to "is this proof valid". Errors mean the question could not be asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Valid,
    Invalid,
}

impl VerifyOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl From<bool> for VerifyOutcome {
    fn from(valid: bool) -> Self {
        if valid {
            Self::Valid
        } else {
            Self::Invalid
        }
    }
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("VALID"),
            Self::Invalid => f.write_str("INVALID"),
        }
    }
}

pub struct ProofVerifier<'a> {
    locator: ArtifactLocator,
    backend: &'a dyn ProvingBackend,
}

impl<'a> ProofVerifier<'a> {
    pub fn new(locator: ArtifactLocator, backend: &'a dyn ProvingBackend) -> Self {
        Self { locator, backend }
    }

    /// Check `proof` and `public_signals` against the circuit's verification key.
    pub async fn verify(
        &self,
        circuit_name: &str,
        proof: &Proof,
        public_signals: &PublicSignals,
    ) -> Result<VerifyOutcome> {
        tracing::info!("verifying proof for {circuit_name}");

        let descriptor = self.locator.resolve(circuit_name);
        let vkey: VerificationKey =
            store::read_json(ArtifactKind::VerificationKey, descriptor.vkey_path())?;

        let valid = self.backend.verify(&vkey, public_signals, proof).await?;
        let outcome = VerifyOutcome::from(valid);
        tracing::info!("verification result for {circuit_name}: {outcome}");
        Ok(outcome)
    }

    /// Reload the proof and public signals `prove` last wrote, then verify them.
    pub async fn verify_persisted(&self, circuit_name: &str) -> Result<VerifyOutcome> {
        let descriptor = self.locator.resolve(circuit_name);
        let proof: Proof = store::read_json(ArtifactKind::Proof, descriptor.proof_path())?;
        let public_signals: PublicSignals =
            store::read_json(ArtifactKind::PublicSignals, descriptor.public_path())?;
        self.verify(circuit_name, &proof, &public_signals).await
    }
}
