use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;

use circom_proofs_core::backend::WitnessEngine;
use circom_proofs_core::circuits::{self, CircuitSpec};
use circom_proofs_core::config::PipelineConfig;
use circom_proofs_core::harness::{FailurePolicy, SuiteReport, WitnessAssertionHarness};
use circom_proofs_groth16::CircomEngine;

use crate::output;

/// Run the witness-level scenario batteries.
///
/// With no `--circuit` every known circuit is checked. `keep_going` runs all
/// scenarios and reports every failure instead of stopping at the first one.
pub async fn run(
    config: &PipelineConfig,
    circuit_names: &[String],
    keep_going: bool,
    include_paths: &[PathBuf],
) -> Result<ExitCode> {
    let engine = CircomEngine::new().with_include_paths(include_paths.to_vec());
    output::print_prerequisites(engine.check_prerequisites());
    run_with(config, circuit_names, keep_going, &engine).await
}

pub(crate) async fn run_with(
    config: &PipelineConfig,
    circuit_names: &[String],
    keep_going: bool,
    engine: &dyn WitnessEngine,
) -> Result<ExitCode> {
    let selected = select(circuit_names)?;
    let policy = if keep_going {
        FailurePolicy::CollectAll
    } else {
        FailurePolicy::FailFast
    };

    output::print_header("circom-proofs check");
    output::print_key_value("Circuits dir", &config.circuits_dir.display().to_string());
    output::print_key_value("Engine", engine.name());

    let report = WitnessAssertionHarness::new(engine, config.circuits_dir.clone())
        .with_policy(policy)
        .run_suite(&selected)
        .await?;

    print_report(&report);
    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn select(names: &[String]) -> Result<Vec<CircuitSpec>> {
    if names.is_empty() {
        return Ok(circuits::ALL.to_vec());
    }
    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        selected.push(*circuits::lookup(name)?);
    }
    Ok(selected)
}

fn print_report(report: &SuiteReport) {
    for scenario in &report.scenarios {
        let label = format!("{} / {}", scenario.circuit, scenario.scenario);
        match &scenario.result {
            Ok(()) => output::print_success(&label),
            Err(e) => output::print_failure(&format!("{label}: {e}")),
        }
    }

    let failed = report.scenarios.len() - report.passed();
    println!();
    output::print_key_value("Passed", &report.passed().to_string());
    output::print_key_value("Failed", &failed.to_string());
}
