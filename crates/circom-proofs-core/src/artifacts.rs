//! Artifact locations for a circuit.
//!
//! Every path a command reads or writes is derived here from the circuit name,
//! so `prove` and `verify` always agree on where a circuit's files live.
//!
//! ## Nested layout (default)
//! ```text
//! build/<name>/
//! ├── <name>.wasm                    # execution binary
//! ├── <name>_0001.zkey               # proving key
//! ├── <name>_verification_key.json   # verification key
//! ├── <name>_proof.json              # written by prove
//! └── <name>_public.json             # written by prove
//! ```
//!
//! The flat layout drops the `<name>/` directory.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{Layout, PipelineConfig};
use crate::error::{CircomProofsError, Result};

/// The five artifact classes a circuit owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    ExecutionBinary,
    ProvingKey,
    VerificationKey,
    Proof,
    PublicSignals,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ExecutionBinary => "WASM file",
            Self::ProvingKey => "Proving key",
            Self::VerificationKey => "Verification key",
            Self::Proof => "Proof file",
            Self::PublicSignals => "Public signals file",
        };
        f.write_str(label)
    }
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        Self::ExecutionBinary,
        Self::ProvingKey,
        Self::VerificationKey,
        Self::Proof,
        Self::PublicSignals,
    ];
}

/// Resolved artifact paths for one circuit.
///
/// Only [`ArtifactLocator::resolve`] builds these, so every path in a
/// descriptor belongs to the same circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitDescriptor {
    name: String,
    dir: PathBuf,
    wasm: PathBuf,
    zkey: PathBuf,
    vkey: PathBuf,
    proof: PathBuf,
    public: PathBuf,
}

impl CircuitDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the circuit's artifacts live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::ExecutionBinary => &self.wasm,
            ArtifactKind::ProvingKey => &self.zkey,
            ArtifactKind::VerificationKey => &self.vkey,
            ArtifactKind::Proof => &self.proof,
            ArtifactKind::PublicSignals => &self.public,
        }
    }

    pub fn wasm_path(&self) -> &Path {
        &self.wasm
    }

    pub fn zkey_path(&self) -> &Path {
        &self.zkey
    }

    pub fn vkey_path(&self) -> &Path {
        &self.vkey
    }

    pub fn proof_path(&self) -> &Path {
        &self.proof
    }

    pub fn public_path(&self) -> &Path {
        &self.public
    }
}

/// Derives [`CircuitDescriptor`]s from a build root and layout.
#[derive(Debug, Clone)]
pub struct ArtifactLocator {
    build_root: PathBuf,
    layout: Layout,
}

impl ArtifactLocator {
    pub fn new(build_root: impl Into<PathBuf>, layout: Layout) -> Self {
        Self {
            build_root: build_root.into(),
            layout,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.build_root, config.layout)
    }

    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Pure path construction; never touches the filesystem.
    pub fn resolve(&self, circuit_name: &str) -> CircuitDescriptor {
        let dir = match self.layout {
            Layout::Nested => self.build_root.join(circuit_name),
            Layout::Flat => self.build_root.clone(),
        };
        let file = |suffix: &str| dir.join(format!("{circuit_name}{suffix}"));

        CircuitDescriptor {
            name: circuit_name.to_string(),
            wasm: file(".wasm"),
            zkey: file("_0001.zkey"),
            vkey: file("_verification_key.json"),
            proof: file("_proof.json"),
            public: file("_public.json"),
            dir,
        }
    }
}

/// Fail with [`CircomProofsError::MissingArtifact`] unless `path` exists.
pub fn require_exists(kind: ArtifactKind, path: &Path) -> Result<&Path> {
    if path.exists() {
        Ok(path)
    } else {
        Err(CircomProofsError::MissingArtifact {
            kind,
            path: path.to_path_buf(),
        })
    }
}

/// Setup artifacts (wasm, zkey, vkey) that are not on disk yet.
pub fn missing_setup(descriptor: &CircuitDescriptor) -> Vec<ArtifactKind> {
    [
        ArtifactKind::ExecutionBinary,
        ArtifactKind::ProvingKey,
        ArtifactKind::VerificationKey,
    ]
    .into_iter()
    .filter(|kind| !descriptor.path(*kind).exists())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_nested() {
        let locator = ArtifactLocator::new("build", Layout::Nested);
        let d = locator.resolve("tally-proof");
        assert_eq!(d.name(), "tally-proof");
        assert_eq!(d.dir(), Path::new("build/tally-proof"));
        assert_eq!(d.wasm_path(), Path::new("build/tally-proof/tally-proof.wasm"));
        assert_eq!(
            d.zkey_path(),
            Path::new("build/tally-proof/tally-proof_0001.zkey")
        );
        assert_eq!(
            d.vkey_path(),
            Path::new("build/tally-proof/tally-proof_verification_key.json")
        );
        assert_eq!(
            d.proof_path(),
            Path::new("build/tally-proof/tally-proof_proof.json")
        );
        assert_eq!(
            d.public_path(),
            Path::new("build/tally-proof/tally-proof_public.json")
        );
    }

    #[test]
    fn test_resolve_flat() {
        let locator = ArtifactLocator::new("build", Layout::Flat);
        let d = locator.resolve("merkle-proof");
        assert_eq!(d.dir(), Path::new("build"));
        assert_eq!(d.wasm_path(), Path::new("build/merkle-proof.wasm"));
        assert_eq!(d.proof_path(), Path::new("build/merkle-proof_proof.json"));
    }

    #[test]
    fn test_resolve_is_pure() {
        let locator = ArtifactLocator::new("/nonexistent/build/root", Layout::Nested);
        assert_eq!(locator.resolve("a"), locator.resolve("a"));
        assert_ne!(locator.resolve("a"), locator.resolve("b"));
    }

    #[test]
    fn test_path_by_kind_matches_accessors() {
        let d = ArtifactLocator::new("build", Layout::Nested).resolve("c");
        assert_eq!(d.path(ArtifactKind::ExecutionBinary), d.wasm_path());
        assert_eq!(d.path(ArtifactKind::ProvingKey), d.zkey_path());
        assert_eq!(d.path(ArtifactKind::VerificationKey), d.vkey_path());
        assert_eq!(d.path(ArtifactKind::Proof), d.proof_path());
        assert_eq!(d.path(ArtifactKind::PublicSignals), d.public_path());
    }

    #[test]
    fn test_require_exists_missing() {
        let path = Path::new("/tmp/nonexistent_circom_proofs/x.zkey");
        let err = require_exists(ArtifactKind::ProvingKey, path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Proving key not found"));
        assert!(msg.contains("x.zkey"));
        assert!(msg.contains("Run setup first"));
    }

    #[test]
    fn test_require_exists_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.wasm");
        std::fs::write(&path, b"\0asm").unwrap();
        assert_eq!(
            require_exists(ArtifactKind::ExecutionBinary, &path).unwrap(),
            path.as_path()
        );
    }

    #[test]
    fn test_missing_setup() {
        let dir = tempfile::tempdir().unwrap();
        let d = ArtifactLocator::new(dir.path(), Layout::Flat).resolve("c");
        assert_eq!(missing_setup(&d).len(), 3);

        std::fs::write(d.wasm_path(), b"").unwrap();
        std::fs::write(d.vkey_path(), b"{}").unwrap();
        assert_eq!(missing_setup(&d), vec![ArtifactKind::ProvingKey]);
    }
}
