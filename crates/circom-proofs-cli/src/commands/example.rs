use std::process::ExitCode;

use anyhow::Result;

use circom_proofs_core::artifacts::ArtifactLocator;
use circom_proofs_core::backend::ProvingBackend;
use circom_proofs_core::circuits;
use circom_proofs_core::config::PipelineConfig;
use circom_proofs_core::generator::ProofGenerator;
use circom_proofs_core::verifier::ProofVerifier;
use circom_proofs_groth16::SnarkjsBackend;

use crate::output;

/// Prove the circuit's built-in example input, then verify the result.
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
    let spec = circuits::lookup(circuit)?;
    output::print_header(&format!("circom-proofs example: {}", spec.name));
    output::print_key_value("Circuit", spec.summary);
    output::print_key_value("Backend", backend.name());

    let locator = ArtifactLocator::from_config(config);

    output::print_step(1, 2, "Generating proof...");
    let bundle = ProofGenerator::new(locator.clone(), backend)
        .generate(spec.name, &spec.example_input())
        .await?;
    output::print_key_value("Public signals", &bundle.public_signals.0.join(", "));

    output::print_step(2, 2, "Verifying proof...");
    let outcome = ProofVerifier::new(locator, backend)
        .verify(spec.name, &bundle.proof, &bundle.public_signals)
        .await?;

    Ok(super::verify::report(spec.name, outcome))
}
