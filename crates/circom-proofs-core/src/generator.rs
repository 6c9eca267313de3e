//! Proof generation: inputs on disk to persisted proof and public signals.

use crate::artifacts::{require_exists, ArtifactKind, ArtifactLocator};
use crate::backend::{CircuitArtifacts, ProvingBackend};
use crate::circuits;
use crate::error::Result;
use crate::store;
use crate::types::{ProofBundle, ProofInput};

/// Drives the proving backend and persists its output.
pub struct ProofGenerator<'a> {
    locator: ArtifactLocator,
    backend: &'a dyn ProvingBackend,
}

impl<'a> ProofGenerator<'a> {
    pub fn new(locator: ArtifactLocator, backend: &'a dyn ProvingBackend) -> Self {
        Self { locator, backend }
    }

    /// Prove `input` against `circuit_name` and write `<name>_proof.json` and
    /// `<name>_public.json`, replacing whatever was there.
    ///
    /// The returned bundle is the same data that was written, so callers can
    /// chain straight into verification without reloading.
    pub async fn generate(&self, circuit_name: &str, input: &ProofInput) -> Result<ProofBundle> {
        tracing::info!("generating proof for {circuit_name}");

        let descriptor = self.locator.resolve(circuit_name);
        require_exists(ArtifactKind::ExecutionBinary, descriptor.wasm_path())?;
        require_exists(ArtifactKind::ProvingKey, descriptor.zkey_path())?;

        if let Ok(spec) = circuits::lookup(circuit_name) {
            for warning in spec.shape_warnings(input) {
                tracing::warn!("{circuit_name}: {warning}");
            }
        }

        let artifacts = CircuitArtifacts::from_descriptor(&descriptor);
        let bundle = self
            .backend
            .compute_witness_and_proof(&artifacts, input)
            .await?;
        tracing::debug!(
            "{}: witness has {} signals, {} public",
            self.backend.name(),
            bundle.witness.len(),
            bundle.public_signals.len()
        );

        store::write_json_pair(
            (&bundle.proof, descriptor.proof_path()),
            (&bundle.public_signals, descriptor.public_path()),
        )?;
        tracing::info!("proof saved to {}", descriptor.proof_path().display());
        tracing::info!(
            "public signals saved to {}",
            descriptor.public_path().display()
        );

        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layout;
    use crate::error::CircomProofsError;
    use crate::mock::{self, MockBackend};
    use crate::types::PublicSignals;

    #[tokio::test]
    async fn test_generate_writes_both_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ArtifactLocator::new(dir.path(), Layout::Nested);
        mock::install_setup(&locator, "tally-proof").unwrap();

        let backend = MockBackend::new();
        let generator = ProofGenerator::new(locator.clone(), &backend);
        let input = circuits::TALLY_PROOF.example_input();
        let bundle = generator.generate("tally-proof", &input).await.unwrap();

        let d = locator.resolve("tally-proof");
        let on_disk: PublicSignals =
            store::read_json(ArtifactKind::PublicSignals, d.public_path()).unwrap();
        assert_eq!(on_disk, bundle.public_signals);
        assert!(d.proof_path().exists());
    }

    #[tokio::test]
    async fn test_generate_requires_wasm() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ArtifactLocator::new(dir.path(), Layout::Flat);
        let backend = MockBackend::new();
        let generator = ProofGenerator::new(locator, &backend);

        let err = generator
            .generate("tally-proof", &ProofInput::new())
            .await
            .unwrap_err();
        match err {
            CircomProofsError::MissingArtifact { kind, path } => {
                assert_eq!(kind, ArtifactKind::ExecutionBinary);
                assert!(path.ends_with("tally-proof.wasm"));
            }
            other => panic!("expected MissingArtifact, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_requires_zkey() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ArtifactLocator::new(dir.path(), Layout::Flat);
        let d = locator.resolve("tally-proof");
        std::fs::write(d.wasm_path(), b"").unwrap();

        let backend = MockBackend::new();
        let err = ProofGenerator::new(locator, &backend)
            .generate("tally-proof", &ProofInput::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CircomProofsError::MissingArtifact { kind: ArtifactKind::ProvingKey, .. }
        ));
    }

    #[tokio::test]
    async fn test_backend_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ArtifactLocator::new(dir.path(), Layout::Nested);
        mock::install_setup(&locator, "tally-proof").unwrap();

        let backend = MockBackend::new();
        let bad = ProofInput::new().with("votes", "nope").with("expectedTotal", 1);
        let err = ProofGenerator::new(locator.clone(), &backend)
            .generate("tally-proof", &bad)
            .await
            .unwrap_err();
        assert!(matches!(err, CircomProofsError::Backend(_)));
        assert!(!locator.resolve("tally-proof").proof_path().exists());
    }
}
