//! Core library for the circom-proofs toolkit.
//!
//! Covers the proof-artifact lifecycle for the `merkle-proof` and `tally-proof`
//! circuits: locating compiled artifacts, generating and persisting proofs,
//! reloading and verifying them, and asserting expected outputs at the
//! witness level.
//!
//! The cryptography lives behind the [`backend::ProvingBackend`] and
//! [`backend::WitnessEngine`] traits. The Circom + snarkjs implementation is in
//! [`circom_proofs_groth16`](https://docs.rs/circom-proofs-groth16);
//! [`mock::MockBackend`] evaluates both circuits in-process for tests.

pub mod artifacts;
pub mod backend;
pub mod circuits;
pub mod config;
pub mod error;
pub mod generator;
pub mod harness;
pub mod mock;
pub mod scenarios;
pub mod store;
pub mod types;
pub mod verifier;
