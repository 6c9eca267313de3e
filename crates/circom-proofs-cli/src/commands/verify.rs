use std::process::ExitCode;

use anyhow::Result;

use circom_proofs_core::artifacts::ArtifactLocator;
use circom_proofs_core::backend::ProvingBackend;
use circom_proofs_core::config::PipelineConfig;
use circom_proofs_core::verifier::{ProofVerifier, VerifyOutcome};
use circom_proofs_groth16::SnarkjsBackend;

use crate::output;

/// Verify the proof `prove` last wrote for `circuit`.
///
/// Exits 0 when the proof is valid and 1 when it is not. Missing or
/// unreadable artifacts are errors and also end in exit code 1.
pub async fn run(config: &PipelineConfig, circuit: &str) -> Result<ExitCode> {
    let backend = SnarkjsBackend::new();
    output::print_prerequisites(backend.check_prerequisites());
    run_with(config, circuit, &backend).await
}

pub(crate) async fn run_with(
    config: &PipelineConfig,
    circuit: &str,
    backend: &dyn ProvingBackend,
) -> Result<ExitCode> {
    output::print_header(&format!("circom-proofs verify: {circuit}"));

    let locator = ArtifactLocator::from_config(config);
    let outcome = ProofVerifier::new(locator, backend)
        .verify_persisted(circuit)
        .await?;

    Ok(report(circuit, outcome))
}

/// Print the verdict and map it to an exit code.
pub(crate) fn report(circuit: &str, outcome: VerifyOutcome) -> ExitCode {
    match outcome {
        VerifyOutcome::Valid => {
            output::print_success(&format!("{circuit}: proof is {outcome}"));
            ExitCode::SUCCESS
        }
        VerifyOutcome::Invalid => {
            output::print_failure(&format!("{circuit}: proof is {outcome}"));
            ExitCode::FAILURE
        }
    }
}
