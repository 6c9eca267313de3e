//! Unified error types for the circom-proofs toolkit.

use std::path::PathBuf;
use thiserror::Error;

use crate::artifacts::ArtifactKind;

/// All errors that can occur while proving, verifying, or checking witnesses.
#[derive(Error, Debug)]
pub enum CircomProofsError {
    // --- Artifacts ---

    /// A required file does not exist. Detected by an explicit `stat` before use.
    #[error("{kind} not found: {}. Run setup first.", path.display())]
    MissingArtifact { kind: ArtifactKind, path: PathBuf },

    /// An artifact exists but could not be read.
    #[error("failed to read {kind} {}", path.display())]
    UnreadableArtifact {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted artifact (proof, public signals, verification key) is not valid JSON.
    ///
    /// A truncated file left by a concurrent writer also lands here.
    #[error("failed to parse {}", path.display())]
    MalformedArtifact {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // --- Input ---

    /// The input file for proof generation is missing or unreadable.
    #[error("failed to read input {}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input file for proof generation is not valid JSON.
    #[error("failed to parse input {}", path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The circuit name is not in the circuit table.
    #[error("unknown circuit: {0} (supported: merkle-proof, tally-proof)")]
    UnknownCircuit(String),

    // --- Backend ---

    /// A required external tool (e.g., `snarkjs`, `circom`) is not installed.
    #[error("required tool '{name}' not found. Install: {install}")]
    MissingTool { name: String, install: String },

    /// The witness, proving, or verify call itself failed. Passed through verbatim.
    #[error("{0}")]
    Backend(String),

    // --- Witness assertions ---

    /// The computed witness does not satisfy the circuit constraints.
    #[error("scenario '{scenario}': witness violates circuit constraints: {detail}")]
    ConstraintViolation { scenario: String, detail: String },

    /// Constraints hold but the output signal disagrees with the expected value.
    #[error("scenario '{scenario}': expected {expected}, got {actual}")]
    OutcomeMismatch {
        scenario: String,
        expected: String,
        actual: String,
    },

    // --- General ---

    /// A filesystem I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A catch-all for errors from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Alias for `Result<T, CircomProofsError>`.
pub type Result<T> = std::result::Result<T, CircomProofsError>;
