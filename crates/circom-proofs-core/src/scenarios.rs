//! Fixed witness scenarios for each circuit.

use serde_json::json;

use crate::circuits::{CircuitSpec, MERKLE_PROOF, TALLY_PROOF};
use crate::types::{Outcome, ProofInput};

/// What a scenario asserts about the computed witness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// The output slot equals this outcome.
    Outcome(Outcome),
    /// Two evaluations of the same input produce identical witnesses.
    Deterministic,
}

/// A named input together with the expected result.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: &'static str,
    pub input: ProofInput,
    pub expectation: Expectation,
}

impl Scenario {
    fn new(name: &'static str, input: ProofInput, expectation: Expectation) -> Self {
        Self {
            name,
            input,
            expectation,
        }
    }
}

/// The scenario battery for `circuit`; empty for circuits outside the table.
pub fn battery(circuit: &CircuitSpec) -> Vec<Scenario> {
    match circuit.name {
        n if n == TALLY_PROOF.name => tally(),
        n if n == MERKLE_PROOF.name => merkle(),
        _ => Vec::new(),
    }
}

fn tally_input(votes: [u8; 10], expected_total: u32) -> ProofInput {
    ProofInput::new()
        .with("votes", json!(votes))
        .with("expectedTotal", expected_total)
}

fn tally() -> Vec<Scenario> {
    let mixed = [1, 0, 1, 1, 0, 1, 0, 1, 1, 0];
    vec![
        Scenario::new(
            "valid tally (6 yes votes)",
            tally_input(mixed, 6),
            Expectation::Outcome(Outcome::Valid),
        ),
        Scenario::new(
            "all yes votes",
            tally_input([1; 10], 10),
            Expectation::Outcome(Outcome::Valid),
        ),
        Scenario::new(
            "all no votes",
            tally_input([0; 10], 0),
            Expectation::Outcome(Outcome::Valid),
        ),
        Scenario::new(
            "invalid tally (claims 5 of 6)",
            tally_input(mixed, 5),
            Expectation::Outcome(Outcome::Invalid),
        ),
    ]
}

fn merkle_input(leaf: &str, path: [&str; 10], indices: u32, root: &str) -> ProofInput {
    ProofInput::new()
        .with("leaf", leaf)
        .with("pathElements", json!(path))
        .with("pathIndices", indices)
        .with("root", root)
}

fn merkle() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "10-level proof",
            merkle_input(
                "12345",
                [
                    "1111", "2222", "3333", "4444", "5555", "6666", "7777", "8888", "9999",
                    "1010",
                ],
                5,
                "21663839004416932945382355908790599225266501822907911457504978515578255421292",
            ),
            Expectation::Deterministic,
        ),
        Scenario::new(
            "different path indices",
            merkle_input(
                "54321",
                [
                    "5555", "6666", "7777", "8888", "9999", "1111", "2222", "3333", "4444",
                    "5555",
                ],
                10,
                "12345678901234567890123456789012345678901234567890123456789012345678901234567890",
            ),
            Expectation::Deterministic,
        ),
        Scenario::new(
            "all left path",
            merkle_input(
                "99999",
                [
                    "1000", "2000", "3000", "4000", "5000", "6000", "7000", "8000", "9000",
                    "1001",
                ],
                0,
                "11111111111111111111111111111111111111111111111111111111111111111111111111111111",
            ),
            Expectation::Deterministic,
        ),
        Scenario::new(
            "all right path",
            merkle_input(
                "88888",
                [
                    "9000", "8000", "7000", "6000", "5000", "4000", "3000", "2000", "1000",
                    "9001",
                ],
                1023,
                "22222222222222222222222222222222222222222222222222222222222222222222222222222222",
            ),
            Expectation::Deterministic,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits;

    #[test]
    fn test_tally_battery() {
        let scenarios = battery(&TALLY_PROOF);
        assert_eq!(scenarios.len(), 4);
        let invalid: Vec<_> = scenarios
            .iter()
            .filter(|s| s.expectation == Expectation::Outcome(Outcome::Invalid))
            .collect();
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].input.get("expectedTotal"), Some(&json!(5)));
    }

    #[test]
    fn test_merkle_battery_is_deterministic_only() {
        let scenarios = battery(&MERKLE_PROOF);
        assert_eq!(scenarios.len(), 4);
        assert!(scenarios
            .iter()
            .all(|s| s.expectation == Expectation::Deterministic));
        let indices: Vec<_> = scenarios
            .iter()
            .map(|s| s.input.get("pathIndices").cloned().unwrap())
            .collect();
        assert_eq!(indices, vec![json!(5), json!(10), json!(0), json!(1023)]);
    }

    #[test]
    fn test_every_circuit_has_a_battery() {
        for spec in circuits::ALL {
            assert!(!battery(spec).is_empty(), "{} has no scenarios", spec.name);
        }
    }
}
