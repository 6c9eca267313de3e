use std::path::Path;

use tokio::process::Command;

use circom_proofs_core::backend::ConstraintCheck;
use circom_proofs_core::error::{CircomProofsError, Result};

/// Compute a witness from the circuit WASM and an input JSON file.
pub async fn calculate_witness(wasm_path: &Path, input_path: &Path, wtns_output: &Path) -> Result<()> {
    run_snarkjs(&[
        "wtns",
        "calculate",
        &wasm_path.display().to_string(),
        &input_path.display().to_string(),
        &wtns_output.display().to_string(),
    ])
    .await?
    .into_result()?;
    Ok(())
}

/// Export a binary `.wtns` file as a JSON array of decimal strings.
pub async fn export_witness_json(wtns_path: &Path, json_output: &Path) -> Result<()> {
    run_snarkjs(&[
        "wtns",
        "export",
        "json",
        &wtns_path.display().to_string(),
        &json_output.display().to_string(),
    ])
    .await?
    .into_result()?;
    Ok(())
}

/// Generate a Groth16 proof from a proving key and a computed witness.
pub async fn prove(
    zkey_path: &Path,
    wtns_path: &Path,
    proof_output: &Path,
    public_output: &Path,
) -> Result<()> {
    run_snarkjs(&[
        "groth16",
        "prove",
        &zkey_path.display().to_string(),
        &wtns_path.display().to_string(),
        &proof_output.display().to_string(),
        &public_output.display().to_string(),
    ])
    .await?
    .into_result()?;
    Ok(())
}

/// Verify a Groth16 proof. `Ok(false)` when snarkjs reports an invalid proof.
pub async fn verify(vk_path: &Path, public_path: &Path, proof_path: &Path) -> Result<bool> {
    let run = run_snarkjs(&[
        "groth16",
        "verify",
        &vk_path.display().to_string(),
        &public_path.display().to_string(),
        &proof_path.display().to_string(),
    ])
    .await?;
    classify_verify(&run)
}

/// Check a witness against the circuit's R1CS constraints.
pub async fn check_witness(r1cs_path: &Path, wtns_path: &Path) -> Result<ConstraintCheck> {
    let run = run_snarkjs(&[
        "wtns",
        "check",
        &r1cs_path.display().to_string(),
        &wtns_path.display().to_string(),
    ])
    .await?;
    classify_check(&run)
}

/// Captured output of one snarkjs invocation.
#[derive(Debug, Clone)]
pub struct SnarkjsRun {
    pub command: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl SnarkjsRun {
    fn mentions(&self, needle: &str) -> bool {
        self.stdout.contains(needle) || self.stderr.contains(needle)
    }

    /// Treat any non-zero exit as a backend failure.
    pub fn into_result(self) -> Result<String> {
        if self.success {
            Ok(self.stdout)
        } else {
            Err(self.failure())
        }
    }

    fn failure(&self) -> CircomProofsError {
        CircomProofsError::Backend(format!(
            "snarkjs {} failed:\nstdout: {}\nstderr: {}",
            self.command,
            self.stdout.trim_end(),
            self.stderr.trim_end()
        ))
    }
}

pub(crate) fn classify_verify(run: &SnarkjsRun) -> Result<bool> {
    if run.mentions("Invalid proof") {
        return Ok(false);
    }
    if run.success && run.mentions("OK") {
        return Ok(true);
    }
    Err(run.failure())
}

pub(crate) fn classify_check(run: &SnarkjsRun) -> Result<ConstraintCheck> {
    if run.mentions("WITNESS IS NOT CORRECT") || run.mentions("Constraint doesn't match") {
        let detail = run
            .stdout
            .lines()
            .chain(run.stderr.lines())
            .find(|l| l.contains("Constraint doesn't match"))
            .unwrap_or("WITNESS IS NOT CORRECT")
            .trim()
            .to_string();
        return Ok(ConstraintCheck::Violated(detail));
    }
    if run.success && run.mentions("WITNESS IS CORRECT") {
        return Ok(ConstraintCheck::Satisfied);
    }
    Err(run.failure())
}

/// Run a snarkjs command and capture its output.
async fn run_snarkjs(args: &[&str]) -> Result<SnarkjsRun> {
    tracing::debug!("snarkjs {}", args.join(" "));

    let command = args.iter().take(2).copied().collect::<Vec<_>>().join(" ");
    let output = Command::new("snarkjs").args(args).output().await;

    match output {
        Ok(out) => Ok(SnarkjsRun {
            command,
            success: out.status.success(),
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CircomProofsError::MissingTool {
            name: "snarkjs".into(),
            install: "npm install -g snarkjs".into(),
        }),
        Err(e) => Err(CircomProofsError::Backend(format!(
            "failed to run snarkjs: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(success: bool, stdout: &str, stderr: &str) -> SnarkjsRun {
        SnarkjsRun {
            command: "groth16 verify".into(),
            success,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    #[test]
    fn test_verify_ok() {
        assert!(classify_verify(&run(true, "[INFO]  snarkJS: OK!\n", "")).unwrap());
    }

    #[test]
    fn test_verify_invalid_is_false_not_error() {
        let r = run(false, "[ERROR] snarkJS: Invalid proof\n", "");
        assert!(!classify_verify(&r).unwrap());
    }

    #[test]
    fn test_verify_crash_is_error() {
        let r = run(false, "", "TypeError: Cannot read properties of undefined (reading 'curve')");
        let err = classify_verify(&r).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("snarkjs groth16 verify failed"));
        assert!(msg.contains("TypeError"));
    }

    #[test]
    fn test_check_correct() {
        let r = run(true, "[INFO]  snarkJS: WITNESS CHECKING FINISHED SUCCESSFULLY\n[INFO]  snarkJS: WITNESS IS CORRECT\n", "");
        assert_eq!(classify_check(&r).unwrap(), ConstraintCheck::Satisfied);
    }

    #[test]
    fn test_check_violation_carries_detail() {
        let r = run(
            false,
            "[ERROR] snarkJS: Constraint doesn't match 12: 1 * 3 != 2\n[INFO]  snarkJS: WITNESS IS NOT CORRECT\n",
            "",
        );
        match classify_check(&r).unwrap() {
            ConstraintCheck::Violated(detail) => {
                assert!(detail.starts_with("[ERROR] snarkJS: Constraint doesn't match 12"));
            }
            other => panic!("expected violation, got {other:?}"),
        }
    }

    #[test]
    fn test_check_unreadable_r1cs_is_error() {
        let r = run(false, "", "Error: ENOENT: no such file or directory");
        assert!(classify_check(&r).is_err());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(run(true, "out", "").into_result().unwrap(), "out");
        assert!(run(false, "", "boom").into_result().is_err());
    }
}
