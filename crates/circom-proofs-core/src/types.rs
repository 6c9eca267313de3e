//! Values that flow between the pipeline and the proving backend.
//!
//! Proofs and verification keys are opaque to this crate: they are produced and
//! consumed by the backend and only round-tripped through JSON here.

use std::fmt;

use num_bigint::BigUint;
use num_traits::{Num, One, Zero};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named circuit signals mapped to field-element values, in file order.
///
/// Values are whatever JSON the caller supplied (decimal strings, integers,
/// arrays). Malformed inputs are rejected by the backend, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofInput(Map<String, Value>);

impl ProofInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, signal: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(signal.into(), value.into());
        self
    }

    pub fn get(&self, signal: &str) -> Option<&Value> {
        self.0.get(signal)
    }

    pub fn signals(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ProofInput {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// An opaque proof object (curve points, protocol tag).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proof(pub Value);

/// An opaque verification key object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationKey(pub Value);

/// The proof's public inputs/outputs as decimal strings. Order is fixed by the circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicSignals(pub Vec<String>);

impl PublicSignals {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Complete signal assignment of one circuit evaluation.
///
/// Index 0 is always the constant `1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Vec<String>")]
pub struct Witness(Vec<BigUint>);

impl Witness {
    pub fn new(values: Vec<BigUint>) -> Self {
        Self(values)
    }

    /// Parse witness values from decimal strings (the snarkjs `wtns export json` format).
    pub fn from_decimal_strings<I, S>(values: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let s = s.as_ref();
                BigUint::from_str_radix(s, 10)
                    .map_err(|e| format!("witness[{i}] is not a decimal field element: {s}: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&BigUint> {
        self.0.get(slot)
    }

    pub fn values(&self) -> &[BigUint] {
        &self.0
    }

    /// Whether slot 0 holds the constant `1` every valid witness starts with.
    pub fn has_constant_one(&self) -> bool {
        self.0.first().is_some_and(One::is_one)
    }
}

impl TryFrom<Vec<Value>> for Witness {
    type Error = String;

    fn try_from(values: Vec<Value>) -> Result<Self, Self::Error> {
        let strings = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| match v {
                Value::String(s) => Ok(s),
                Value::Number(n) if n.is_u64() => Ok(n.to_string()),
                other => Err(format!("witness[{i}] must be a decimal string, got {other}")),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_decimal_strings(strings)
    }
}

impl From<Witness> for Vec<String> {
    fn from(witness: Witness) -> Self {
        witness.0.iter().map(BigUint::to_string).collect()
    }
}

/// Boolean outcome carried by a circuit's output signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Invalid,
    Valid,
}

impl Outcome {
    pub fn from_bool(valid: bool) -> Self {
        if valid {
            Self::Valid
        } else {
            Self::Invalid
        }
    }

    /// The field element a circuit emits for this outcome.
    pub fn as_field(&self) -> BigUint {
        match self {
            Self::Invalid => BigUint::zero(),
            Self::Valid => BigUint::one(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => f.write_str("0 (invalid)"),
            Self::Valid => f.write_str("1 (valid)"),
        }
    }
}

/// Everything the backend's combined witness-and-proof call returns.
#[derive(Debug, Clone, PartialEq)]
pub struct ProofBundle {
    pub proof: Proof,
    pub public_signals: PublicSignals,
    pub witness: Witness,
}
