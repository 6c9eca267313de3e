//! Witness-level assertions over the fixed scenario batteries.
//!
//! For each scenario the harness computes a witness from a transient circuit
//! evaluation, checks it against the circuit constraints, and compares the
//! output slot with the expected outcome. Constraint failures and outcome
//! mismatches are reported as different errors.

use std::path::{Path, PathBuf};

use crate::backend::{CircuitEvaluation, ConstraintCheck, WitnessEngine};
use crate::circuits::CircuitSpec;
use crate::error::{CircomProofsError, Result};
use crate::scenarios::{self, Expectation, Scenario};
use crate::types::Witness;

/// What to do after a scenario fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failing scenario.
    #[default]
    FailFast,
    /// Run every scenario and report all failures.
    CollectAll,
}

/// Scenario name recorded when a circuit fails to load under `CollectAll`.
pub const LOAD_SCENARIO: &str = "<load>";

/// Result of one scenario.
#[derive(Debug)]
pub struct ScenarioReport {
    pub circuit: &'static str,
    pub scenario: &'static str,
    pub result: Result<()>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Results of a harness run, in execution order.
#[derive(Debug, Default)]
pub struct SuiteReport {
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioReport> {
        self.scenarios.iter().filter(|s| !s.passed())
    }

    pub fn is_success(&self) -> bool {
        self.scenarios.iter().all(ScenarioReport::passed)
    }
}

pub struct WitnessAssertionHarness<'a> {
    engine: &'a dyn WitnessEngine,
    circuits_dir: PathBuf,
    policy: FailurePolicy,
}

impl<'a> WitnessAssertionHarness<'a> {
    pub fn new(engine: &'a dyn WitnessEngine, circuits_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            circuits_dir: circuits_dir.into(),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Load the circuit at `source` and check a single scenario against it.
    pub async fn assert_scenario(
        &self,
        source: &Path,
        output_slot: usize,
        scenario: &Scenario,
    ) -> Result<()> {
        let evaluation = self.engine.load(source).await?;
        check_scenario(evaluation.as_ref(), output_slot, scenario).await
    }

    /// Run the batteries of `circuits` in order.
    ///
    /// Scenario failures are recorded in the report. A circuit that cannot be
    /// loaded is an error under `FailFast`; under `CollectAll` it is recorded
    /// as a [`LOAD_SCENARIO`] entry and the next circuit runs.
    pub async fn run_suite(&self, circuits: &[CircuitSpec]) -> Result<SuiteReport> {
        let mut report = SuiteReport::default();
        for circuit in circuits {
            let stop = self.run_circuit(circuit, &mut report).await?;
            if stop {
                break;
            }
        }
        Ok(report)
    }

    /// Returns `true` when the policy says to stop.
    async fn run_circuit(&self, circuit: &CircuitSpec, report: &mut SuiteReport) -> Result<bool> {
        let source = circuit.source_path(&self.circuits_dir);
        tracing::info!("testing {} ({})", circuit.name, source.display());
        let evaluation = match self.engine.load(&source).await {
            Ok(evaluation) => evaluation,
            Err(e) if self.policy == FailurePolicy::CollectAll => {
                tracing::debug!("{}: failed to load: {e}", circuit.name);
                report.scenarios.push(ScenarioReport {
                    circuit: circuit.name,
                    scenario: LOAD_SCENARIO,
                    result: Err(e),
                });
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        for scenario in scenarios::battery(circuit) {
            let result = check_scenario(evaluation.as_ref(), circuit.output_slot, &scenario).await;
            match &result {
                Ok(()) => tracing::info!("{}: '{}' passed", circuit.name, scenario.name),
                Err(e) => tracing::debug!("{}: {e}", circuit.name),
            }
            let failed = result.is_err();
            report.scenarios.push(ScenarioReport {
                circuit: circuit.name,
                scenario: scenario.name,
                result,
            });
            if failed && self.policy == FailurePolicy::FailFast {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

async fn witness_for(evaluation: &dyn CircuitEvaluation, scenario: &Scenario) -> Result<Witness> {
    let witness = evaluation.calculate_witness(&scenario.input).await?;
    match evaluation.check_constraints(&witness).await? {
        ConstraintCheck::Satisfied => Ok(witness),
        ConstraintCheck::Violated(detail) => Err(CircomProofsError::ConstraintViolation {
            scenario: scenario.name.to_string(),
            detail,
        }),
    }
}

async fn check_scenario(
    evaluation: &dyn CircuitEvaluation,
    output_slot: usize,
    scenario: &Scenario,
) -> Result<()> {
    let witness = witness_for(evaluation, scenario).await?;

    match scenario.expectation {
        Expectation::Outcome(expected) => {
            let actual = witness.get(output_slot).ok_or_else(|| {
                CircomProofsError::OutcomeMismatch {
                    scenario: scenario.name.to_string(),
                    expected: expected.to_string(),
                    actual: format!("no signal at witness[{output_slot}]"),
                }
            })?;
            if *actual != expected.as_field() {
                return Err(CircomProofsError::OutcomeMismatch {
                    scenario: scenario.name.to_string(),
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                });
            }
        }
        Expectation::Deterministic => {
            let again = witness_for(evaluation, scenario).await?;
            if again != witness {
                let slot = witness
                    .values()
                    .iter()
                    .zip(again.values())
                    .position(|(a, b)| a != b)
                    .unwrap_or(witness.len().min(again.len()));
                return Err(CircomProofsError::OutcomeMismatch {
                    scenario: scenario.name.to_string(),
                    expected: "identical witnesses across runs".to_string(),
                    actual: format!("witness[{slot}] differs"),
                });
            }
        }
    }
    Ok(())
}
