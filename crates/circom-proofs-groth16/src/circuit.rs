use std::path::{Path, PathBuf};

use tokio::process::Command;

use circom_proofs_core::error::{CircomProofsError, Result};

/// Compile a Circom circuit to R1CS and WASM.
pub async fn compile_circom(
    circuit_path: &Path,
    output_dir: &Path,
    include_paths: &[PathBuf],
) -> Result<()> {
    let mut cmd = Command::new("circom");
    cmd.arg(circuit_path)
        .arg("--r1cs")
        .arg("--wasm")
        .arg("-o")
        .arg(output_dir);
    for include in include_paths {
        cmd.arg("-l").arg(include);
    }
    tracing::debug!("circom {}", circuit_path.display());

    match cmd.output().await {
        Ok(out) if out.status.success() => {
            tracing::info!("circom compilation succeeded");
            Ok(())
        }
        Ok(out) => {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let stdout = String::from_utf8_lossy(&out.stdout);
            Err(CircomProofsError::Backend(format!(
                "circom compilation of {} failed:\n{}{}",
                circuit_path.display(),
                stdout,
                stderr
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CircomProofsError::MissingTool {
            name: "circom".into(),
            install: "https://docs.circom.io/getting-started/installation/".into(),
        }),
        Err(e) => Err(CircomProofsError::Backend(e.to_string())),
    }
}

/// Circuit name used in circom's output file names.
pub fn circuit_stem(circuit_path: &Path) -> &str {
    circuit_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("main")
}

/// Get the path to the witness-generator WASM produced by circom.
///
/// Circom outputs the WASM to `<output_dir>/<circuit_name>_js/<circuit_name>.wasm`.
pub fn witness_wasm_path(output_dir: &Path, circuit_name: &str) -> PathBuf {
    output_dir
        .join(format!("{circuit_name}_js"))
        .join(format!("{circuit_name}.wasm"))
}

/// Get the path to the R1CS file produced by circom.
pub fn r1cs_path(output_dir: &Path, circuit_name: &str) -> PathBuf {
    output_dir.join(format!("{circuit_name}.r1cs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths() {
        let out = Path::new("/tmp/c");
        assert_eq!(
            witness_wasm_path(out, "tally-proof"),
            PathBuf::from("/tmp/c/tally-proof_js/tally-proof.wasm")
        );
        assert_eq!(
            r1cs_path(out, "tally-proof"),
            PathBuf::from("/tmp/c/tally-proof.r1cs")
        );
    }

    #[test]
    fn test_circuit_stem() {
        assert_eq!(circuit_stem(Path::new("src/merkle-proof.circom")), "merkle-proof");
        assert_eq!(circuit_stem(Path::new("")), "main");
    }
}
