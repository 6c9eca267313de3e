use std::process::ExitCode;

use anyhow::Result;

use circom_proofs_core::artifacts::{self, ArtifactKind, ArtifactLocator};
use circom_proofs_core::circuits;
use circom_proofs_core::config::PipelineConfig;

use crate::output;

/// Print where every artifact of `circuit` lives and whether it exists.
pub fn run(config: &PipelineConfig, circuit: &str) -> Result<ExitCode> {
    output::print_header(&format!("circom-proofs status: {circuit}"));
    if circuits::lookup(circuit).is_err() {
        output::print_warning(&format!("{circuit} is not a known circuit"));
    }

    let descriptor = ArtifactLocator::from_config(config).resolve(circuit);
    output::print_key_value("Layout", config.layout.as_str());
    output::print_key_value("Directory", &descriptor.dir().display().to_string());

    for kind in ArtifactKind::ALL {
        let path = descriptor.path(kind);
        let state = if path.exists() { "present" } else { "missing" };
        output::print_key_value(&kind.to_string(), &format!("{} ({state})", path.display()));
    }

    let missing = artifacts::missing_setup(&descriptor);
    if missing.is_empty() {
        output::print_success("Trusted setup artifacts in place");
    } else {
        let names: Vec<_> = missing.iter().map(ToString::to_string).collect();
        output::print_warning(&format!("Run setup first. Missing: {}", names.join(", ")));
    }

    Ok(ExitCode::SUCCESS)
}
