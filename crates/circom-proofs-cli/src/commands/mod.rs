//! Subcommand implementations (`circom-proofs <command>`).
//!
//! Each `run` returns the process exit code on completion; errors bubble up
//! to `main`, which prints them and exits with 1.

pub mod check;
pub mod circuits;
pub mod example;
pub mod prove;
pub mod status;
pub mod verify;
