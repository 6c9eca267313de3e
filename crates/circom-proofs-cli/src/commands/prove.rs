use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use circom_proofs_core::artifacts::ArtifactLocator;
use circom_proofs_core::backend::ProvingBackend;
use circom_proofs_core::config::PipelineConfig;
use circom_proofs_core::generator::ProofGenerator;
use circom_proofs_core::store;
use circom_proofs_core::types::ProofInput;
use circom_proofs_groth16::SnarkjsBackend;

use crate::output;

/// Generate a proof for `circuit` from the JSON input at `input_path`.
///
/// Writes `<circuit>_proof.json` and `<circuit>_public.json` next to the
/// circuit's other artifacts, replacing any earlier run.
pub async fn run(config: &PipelineConfig, circuit: &str, input_path: &Path) -> Result<ExitCode> {
    let backend = SnarkjsBackend::new();
    output::print_prerequisites(backend.check_prerequisites());
    run_with(config, circuit, input_path, &backend).await
}

pub(crate) async fn run_with(
    config: &PipelineConfig,
    circuit: &str,
    input_path: &Path,
    backend: &dyn ProvingBackend,
) -> Result<ExitCode> {
    output::print_header(&format!("circom-proofs prove: {circuit}"));
    output::print_key_value("Input", &input_path.display().to_string());
    output::print_key_value("Layout", config.layout.as_str());

    output::print_step(1, 2, "Reading input...");
    let input: ProofInput = store::read_input(input_path)?;

    output::print_step(2, 2, "Generating proof...");
    let locator = ArtifactLocator::from_config(config);
    let bundle = ProofGenerator::new(locator.clone(), backend)
        .generate(circuit, &input)
        .await
        .with_context(|| format!("proving {circuit} failed"))?;

    let descriptor = locator.resolve(circuit);
    output::print_success("Proof generated");
    output::print_key_value("Proof file", &descriptor.proof_path().display().to_string());
    output::print_key_value(
        "Public signals",
        &descriptor.public_path().display().to_string(),
    );
    output::print_key_value("Public inputs", &bundle.public_signals.len().to_string());

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use circom_proofs_core::error::CircomProofsError;
    use circom_proofs_core::mock::{self, MockBackend};

    fn config(dir: &Path) -> PipelineConfig {
        PipelineConfig::default().with_build_root(dir.join("build"))
    }

    #[tokio::test]
    async fn test_prove_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let locator = ArtifactLocator::from_config(&config);
        mock::install_setup(&locator, "tally-proof").unwrap();

        let input = dir.path().join("input.json");
        std::fs::write(&input, r#"{"votes":[1,1,0,0,0,0,0,0,0,0],"expectedTotal":2}"#).unwrap();

        let code = run_with(&config, "tally-proof", &input, &MockBackend::new())
            .await
            .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(locator.resolve("tally-proof").proof_path().exists());
        assert!(locator.resolve("tally-proof").public_path().exists());
    }

    #[tokio::test]
    async fn test_prove_rejects_malformed_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        mock::install_setup(&ArtifactLocator::from_config(&config), "tally-proof").unwrap();

        let input = dir.path().join("input.json");
        std::fs::write(&input, "{ votes: ").unwrap();

        let err = run_with(&config, "tally-proof", &input, &MockBackend::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CircomProofsError>(),
            Some(CircomProofsError::MalformedInput { .. })
        ));
    }

    #[tokio::test]
    async fn test_prove_missing_input_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        mock::install_setup(&ArtifactLocator::from_config(&config), "tally-proof").unwrap();

        let input = dir.path().join("my-input.json");
        let err = run_with(&config, "tally-proof", &input, &MockBackend::new())
            .await
            .unwrap_err();
        let line = format!("{err:#}");
        assert!(line.contains("my-input.json"), "{line}");
        assert!(matches!(
            err.downcast_ref::<CircomProofsError>(),
            Some(CircomProofsError::InputNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_prove_without_setup_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.json");
        std::fs::write(&input, "{}").unwrap();

        let err = run_with(&config(dir.path()), "tally-proof", &input, &MockBackend::new())
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("WASM file not found"));
    }
}
