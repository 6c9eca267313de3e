//! The circuits this toolkit knows about.
//!
//! Paths come from the name alone (see [`crate::artifacts`]); this table adds
//! what the name cannot tell you: where the source lives, which witness slot
//! carries the output, what the input looks like, and a worked example.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::{CircomProofsError, Result};
use crate::types::ProofInput;

/// Depth of the Merkle-inclusion circuit.
pub const MERKLE_LEVELS: usize = 10;

/// Number of ballots the tally circuit sums.
pub const TALLY_VOTES: usize = 10;

/// A top-level input signal and how many values it takes (1 for scalars).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputField {
    pub name: &'static str,
    pub arity: usize,
}

/// Static metadata for one circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitSpec {
    pub name: &'static str,
    /// Circom source file, relative to the circuits directory.
    pub source: &'static str,
    /// Witness slot holding the output signal.
    pub output_slot: usize,
    pub inputs: &'static [InputField],
    pub summary: &'static str,
}

pub const MERKLE_PROOF: CircuitSpec = CircuitSpec {
    name: "merkle-proof",
    source: "merkle-proof.circom",
    output_slot: 1,
    inputs: &[
        InputField { name: "leaf", arity: 1 },
        InputField { name: "pathElements", arity: MERKLE_LEVELS },
        InputField { name: "pathIndices", arity: 1 },
    ],
    summary: "Merkle inclusion of a leaf in a 10-level tree",
};

pub const TALLY_PROOF: CircuitSpec = CircuitSpec {
    name: "tally-proof",
    source: "tally-proof.circom",
    output_slot: 1,
    inputs: &[
        InputField { name: "votes", arity: TALLY_VOTES },
        InputField { name: "expectedTotal", arity: 1 },
    ],
    summary: "Claimed total equals the sum of 10 yes/no votes",
};

pub const ALL: &[CircuitSpec] = &[MERKLE_PROOF, TALLY_PROOF];

/// Look up a circuit by name.
pub fn lookup(name: &str) -> Result<&'static CircuitSpec> {
    ALL.iter()
        .find(|c| c.name == name)
        .ok_or_else(|| CircomProofsError::UnknownCircuit(name.to_string()))
}

impl CircuitSpec {
    pub fn source_path(&self, circuits_dir: &Path) -> PathBuf {
        circuits_dir.join(self.source)
    }

    /// The literal input `example` proves and verifies.
    pub fn example_input(&self) -> ProofInput {
        match self.name {
            "tally-proof" => ProofInput::new()
                .with("votes", json!([1, 0, 1, 1, 0, 1, 0, 1, 1, 0]))
                .with("expectedTotal", 6),
            _ => ProofInput::new()
                .with("leaf", "12345678901234567890")
                .with(
                    "pathElements",
                    json!([
                        "1111111111111111111",
                        "2222222222222222222",
                        "3333333333333333333",
                        "4444444444444444444",
                        "5555555555555555555",
                        "6666666666666666666",
                        "7777777777777777777",
                        "8888888888888888888",
                        "9999999999999999999",
                        "1010101010101010101",
                    ]),
                )
                .with("pathIndices", 341),
        }
    }

    /// Differences between `input` and the expected signal shape.
    ///
    /// Advisory only: the backend is the authority on what it accepts.
    pub fn shape_warnings(&self, input: &ProofInput) -> Vec<String> {
        let mut warnings = Vec::new();
        for field in self.inputs {
            match input.get(field.name) {
                None => warnings.push(format!("missing input signal '{}'", field.name)),
                Some(value) if field.arity > 1 => {
                    let len = value.as_array().map(Vec::len);
                    if len != Some(field.arity) {
                        warnings.push(format!(
                            "input signal '{}' should be an array of {} values",
                            field.name, field.arity
                        ));
                    }
                }
                Some(_) => {}
            }
        }
        for signal in input.signals() {
            if !self.inputs.iter().any(|f| f.name == signal) {
                warnings.push(format!("unexpected input signal '{signal}'"));
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_and_unknown() {
        assert_eq!(lookup("tally-proof").unwrap().name, "tally-proof");
        assert_eq!(lookup("merkle-proof").unwrap().output_slot, 1);
        let err = lookup("range-proof").unwrap_err();
        assert!(err.to_string().contains("unknown circuit: range-proof"));
    }

    #[test]
    fn test_source_path() {
        let p = TALLY_PROOF.source_path(Path::new("src"));
        assert_eq!(p, PathBuf::from("src/tally-proof.circom"));
    }

    #[test]
    fn test_examples_match_their_shape() {
        for spec in ALL {
            let input = spec.example_input();
            assert!(
                spec.shape_warnings(&input).is_empty(),
                "{} example does not match its own shape",
                spec.name
            );
        }
    }

    #[test]
    fn test_shape_warnings() {
        let input = ProofInput::new()
            .with("votes", json!([1, 0, 1]))
            .with("bogus", 1);
        let warnings = TALLY_PROOF.shape_warnings(&input);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("'votes' should be an array of 10"));
        assert!(warnings[1].contains("missing input signal 'expectedTotal'"));
        assert!(warnings[2].contains("unexpected input signal 'bogus'"));
    }
}
