//! In-process backend for tests.
//!
//! Evaluates the two known circuits natively instead of running compiled
//! artifacts:
//! - `tally-proof`: output is `1` iff `expectedTotal == sum(votes)`;
//! - `merkle-proof`: output is the root folded from the leaf with a SHA-256
//!   compression reduced into the BN254 scalar field.
//!
//! "Proofs" bind the key tag to the public signals with SHA-256, so a proof
//! checks out only against the key of the setup that produced it.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::artifacts::ArtifactLocator;
use crate::backend::{
    CircuitArtifacts, CircuitEvaluation, ConstraintCheck, ProvingBackend, WitnessEngine,
};
use crate::circuits::{MERKLE_LEVELS, MERKLE_PROOF, TALLY_PROOF, TALLY_VOTES};
use crate::error::{CircomProofsError, Result};
use crate::store;
use crate::types::{Proof, ProofBundle, ProofInput, PublicSignals, VerificationKey, Witness};

/// BN254 scalar field modulus.
pub const BN254_MODULUS: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

fn modulus() -> BigUint {
    // The literal above is a valid decimal number.
    BigUint::parse_bytes(BN254_MODULUS.as_bytes(), 10).unwrap_or_default()
}

static SETUPS: AtomicU64 = AtomicU64::new(0);

/// Contents of the mock `.zkey` and verification key files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MockKey {
    circuit: String,
    tag: String,
}

/// Write mock setup artifacts (wasm, zkey, vkey) for `circuit_name`.
///
/// Stands in for the compile + trusted-setup step. Each call generates a
/// fresh key tag, so proofs from an earlier setup stop verifying.
pub fn install_setup(locator: &ArtifactLocator, circuit_name: &str) -> Result<()> {
    let d = locator.resolve(circuit_name);
    std::fs::create_dir_all(d.dir())?;
    std::fs::write(d.wasm_path(), b"\0asm\x01\0\0\0")?;

    let nonce = SETUPS.fetch_add(1, Ordering::Relaxed);
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let key = MockKey {
        circuit: circuit_name.to_string(),
        tag: hex::encode(Sha256::digest(format!(
            "{circuit_name}:{}:{now}:{nonce}",
            std::process::id()
        ))),
    };
    store::write_json(&key, d.zkey_path())?;
    store::write_json(
        &json!({ "protocol": "groth16", "curve": "bn128", "circuit": key.circuit, "tag": key.tag }),
        d.vkey_path(),
    )
}

/// Deterministic backend that never leaves the process.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    verify_fails: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose `verify` call errors instead of answering.
    pub fn failing_verify() -> Self {
        Self { verify_fails: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockCircuit {
    Merkle,
    Tally,
}

impl MockCircuit {
    fn from_name(name: &str) -> Result<Self> {
        match name {
            n if n == MERKLE_PROOF.name => Ok(Self::Merkle),
            n if n == TALLY_PROOF.name => Ok(Self::Tally),
            other => Err(CircomProofsError::Backend(format!(
                "mock backend cannot evaluate circuit '{other}'"
            ))),
        }
    }

    /// Witness layout: `[1, out, inputs..., intermediates...]`.
    fn witness(&self, input: &ProofInput) -> Result<Witness> {
        match self {
            Self::Tally => {
                let votes = field_array(input, "votes", TALLY_VOTES)?;
                let expected = field(input, "expectedTotal")?;
                let sum: BigUint = votes.iter().sum::<BigUint>() % modulus();
                let out = if sum == expected {
                    BigUint::one()
                } else {
                    BigUint::zero()
                };
                let mut values = vec![BigUint::one(), out];
                values.extend(votes);
                values.push(expected);
                values.push(sum);
                Ok(Witness::new(values))
            }
            Self::Merkle => {
                let leaf = field(input, "leaf")?;
                let path = field_array(input, "pathElements", MERKLE_LEVELS)?;
                let indices = field(input, "pathIndices")?;
                let levels = fold_levels(&leaf, &path, &indices);
                let root = levels.last().cloned().unwrap_or_else(|| leaf.clone());
                let mut values = vec![BigUint::one(), root, leaf];
                values.extend(path);
                values.push(indices);
                values.extend(levels);
                Ok(Witness::new(values))
            }
        }
    }

    fn check(&self, witness: &Witness) -> ConstraintCheck {
        if !witness.has_constant_one() {
            return ConstraintCheck::Violated("witness[0] != 1".into());
        }
        let w = witness.values();
        match self {
            Self::Tally => {
                if w.len() != TALLY_VOTES + 4 {
                    return ConstraintCheck::Violated(format!(
                        "expected {} signals, got {}",
                        TALLY_VOTES + 4,
                        w.len()
                    ));
                }
                let votes = &w[2..2 + TALLY_VOTES];
                if let Some(i) = votes.iter().position(|v| *v > BigUint::one()) {
                    return ConstraintCheck::Violated(format!("votes[{i}] * (votes[{i}] - 1) != 0"));
                }
                let sum: BigUint = votes.iter().sum();
                if w[TALLY_VOTES + 3] != sum {
                    return ConstraintCheck::Violated("sum != votes[0] + ... + votes[9]".into());
                }
                let out = if w[TALLY_VOTES + 2] == sum {
                    BigUint::one()
                } else {
                    BigUint::zero()
                };
                if w[1] != out {
                    return ConstraintCheck::Violated("out != (sum == expectedTotal)".into());
                }
                ConstraintCheck::Satisfied
            }
            Self::Merkle => {
                let n = MERKLE_LEVELS;
                if w.len() != 2 * n + 4 {
                    return ConstraintCheck::Violated(format!(
                        "expected {} signals, got {}",
                        2 * n + 4,
                        w.len()
                    ));
                }
                if w[n + 3].bits() > n as u64 {
                    return ConstraintCheck::Violated(format!("pathIndices exceeds {n} bits"));
                }
                let levels = fold_levels(&w[2], &w[3..3 + n], &w[n + 3]);
                if levels[..] != w[n + 4..] || w[1] != levels[n - 1] {
                    return ConstraintCheck::Violated("root != hash chain of pathElements".into());
                }
                ConstraintCheck::Satisfied
            }
        }
    }

    /// Public signals: outputs first, then public inputs.
    fn public_signals(&self, witness: &Witness) -> PublicSignals {
        let w = witness.values();
        let mut signals = vec![w[1].to_string()];
        if *self == Self::Tally {
            signals.push(w[TALLY_VOTES + 2].to_string());
        }
        PublicSignals(signals)
    }
}

fn to_field(signal: &str, value: &Value) -> Result<BigUint> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().map(BigUint::from),
        Value::String(s) => BigUint::parse_bytes(s.as_bytes(), 10),
        _ => None,
    };
    let n = parsed.ok_or_else(|| {
        CircomProofsError::Backend(format!("invalid field element for '{signal}': {value}"))
    })?;
    if n >= modulus() {
        return Err(CircomProofsError::Backend(format!(
            "'{signal}' is not below the field modulus"
        )));
    }
    Ok(n)
}

fn field(input: &ProofInput, signal: &str) -> Result<BigUint> {
    let value = input.get(signal).ok_or_else(|| {
        CircomProofsError::Backend(format!("Not enough values for input signal {signal}"))
    })?;
    to_field(signal, value)
}

fn field_array(input: &ProofInput, signal: &str, arity: usize) -> Result<Vec<BigUint>> {
    let values = input
        .get(signal)
        .and_then(Value::as_array)
        .filter(|a| a.len() == arity)
        .ok_or_else(|| {
            CircomProofsError::Backend(format!(
                "input signal {signal} must be an array of {arity} values"
            ))
        })?;
    values.iter().map(|v| to_field(signal, v)).collect()
}

fn compress(left: &BigUint, right: &BigUint) -> BigUint {
    let mut hasher = Sha256::new();
    for v in [left, right] {
        let bytes = v.to_bytes_be();
        let mut padded = [0u8; 32];
        padded[32 - bytes.len().min(32)..].copy_from_slice(&bytes[bytes.len().saturating_sub(32)..]);
        hasher.update(padded);
    }
    BigUint::from_bytes_be(&hasher.finalize()) % modulus()
}

/// Hash from the leaf up; bit `i` of `indices` set means the node is a right child.
fn fold_levels(leaf: &BigUint, path: &[BigUint], indices: &BigUint) -> Vec<BigUint> {
    let bits = indices.to_u64().unwrap_or(u64::MAX);
    let mut current = leaf.clone();
    path.iter()
        .enumerate()
        .map(|(i, sibling)| {
            current = if (bits >> i) & 1 == 1 {
                compress(sibling, &current)
            } else {
                compress(&current, sibling)
            };
            current.clone()
        })
        .collect()
}

fn binding(tag: &str, public_signals: &PublicSignals) -> String {
    let mut hasher = Sha256::new();
    hasher.update(tag.as_bytes());
    for s in public_signals.iter() {
        hasher.update(b"|");
        hasher.update(s.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ProvingBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn compute_witness_and_proof(
        &self,
        artifacts: &CircuitArtifacts,
        input: &ProofInput,
    ) -> Result<ProofBundle> {
        let key: MockKey = store::read_json(
            crate::artifacts::ArtifactKind::ProvingKey,
            &artifacts.proving_key,
        )?;
        let circuit = MockCircuit::from_name(&key.circuit)?;
        let witness = circuit.witness(input)?;
        if let ConstraintCheck::Violated(detail) = circuit.check(&witness) {
            return Err(CircomProofsError::Backend(format!(
                "Error: Assert Failed. {detail}"
            )));
        }
        let public_signals = circuit.public_signals(&witness);
        let proof = Proof(json!({
            "pi_a": [binding(&key.tag, &public_signals)],
            "protocol": "groth16",
            "curve": "bn128",
        }));
        Ok(ProofBundle {
            proof,
            public_signals,
            witness,
        })
    }

    async fn verify(
        &self,
        verification_key: &VerificationKey,
        public_signals: &PublicSignals,
        proof: &Proof,
    ) -> Result<bool> {
        if self.verify_fails {
            return Err(CircomProofsError::Backend("mock verifier crashed".into()));
        }
        let tag = verification_key.0["tag"]
            .as_str()
            .ok_or_else(|| CircomProofsError::Backend("verification key has no tag".into()))?;
        let claimed = proof.0["pi_a"][0]
            .as_str()
            .ok_or_else(|| CircomProofsError::Backend("proof.pi_a must be an array".into()))?;
        Ok(claimed == binding(tag, public_signals))
    }
}

struct MockEvaluation(MockCircuit);

#[async_trait]
impl CircuitEvaluation for MockEvaluation {
    async fn calculate_witness(&self, input: &ProofInput) -> Result<Witness> {
        self.0.witness(input)
    }

    async fn check_constraints(&self, witness: &Witness) -> Result<ConstraintCheck> {
        Ok(self.0.check(witness))
    }
}

#[async_trait]
impl WitnessEngine for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn load(&self, source: &Path) -> Result<Box<dyn CircuitEvaluation>> {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        Ok(Box::new(MockEvaluation(MockCircuit::from_name(stem)?)))
    }
}
