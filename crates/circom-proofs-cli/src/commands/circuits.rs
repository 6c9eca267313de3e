use std::process::ExitCode;

use anyhow::Result;

use circom_proofs_core::circuits::{self, CircuitSpec};

use crate::output;

/// List the known circuits and the input signals each one expects.
pub fn run() -> Result<ExitCode> {
    output::print_header("circom-proofs circuits");
    for spec in circuits::ALL {
        println!();
        println!("{}", spec.name);
        output::print_key_value("Summary", spec.summary);
        output::print_key_value("Source", spec.source);
        output::print_key_value("Output slot", &format!("witness[{}]", spec.output_slot));
        output::print_key_value("Inputs", &describe_inputs(spec));
    }
    Ok(ExitCode::SUCCESS)
}

fn describe_inputs(spec: &CircuitSpec) -> String {
    spec.inputs
        .iter()
        .map(|field| match field.arity {
            1 => field.name.to_string(),
            n => format!("{}[{n}]", field.name),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
