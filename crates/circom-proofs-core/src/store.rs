//! JSON persistence for artifacts shared between `prove` and `verify`.
//!
//! Outputs are written to a temporary file in the destination directory and
//! renamed into place, so a reader never observes a half-written file. The
//! proof/public pair is staged together and renamed back to back; a crash
//! between the two renames still leaves one file from the previous run.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::artifacts::{require_exists, ArtifactKind};
use crate::error::{CircomProofsError, Result};

/// Load and parse a JSON artifact, failing fast if it is absent.
pub fn read_json<T: DeserializeOwned>(kind: ArtifactKind, path: &Path) -> Result<T> {
    require_exists(kind, path)?;
    let contents =
        std::fs::read_to_string(path).map_err(|e| CircomProofsError::UnreadableArtifact {
            kind,
            path: path.to_path_buf(),
            source: e,
        })?;
    serde_json::from_str(&contents).map_err(|e| CircomProofsError::MalformedArtifact {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read a caller-supplied input file.
///
/// Parse failures are [`CircomProofsError::MalformedInput`]; a missing file is
/// [`CircomProofsError::InputNotFound`], not a missing build artifact.
pub fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| CircomProofsError::InputNotFound {
            path: path.to_path_buf(),
            source: e,
        })?;
    serde_json::from_str(&contents).map_err(|e| CircomProofsError::MalformedInput {
        path: path.to_path_buf(),
        source: e,
    })
}

/// A pretty-printed JSON document waiting to be renamed into place.
struct Staged {
    file: NamedTempFile,
    target: PathBuf,
}

fn stage<T: Serialize + ?Sized>(value: &T, target: &Path) -> Result<Staged> {
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(value).map_err(|e| {
        CircomProofsError::Other(anyhow::anyhow!(
            "failed to serialize {}: {e}",
            target.display()
        ))
    })?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.as_file().sync_all()?;

    Ok(Staged {
        file,
        target: target.to_path_buf(),
    })
}

fn commit(staged: Staged) -> Result<()> {
    staged
        .file
        .persist(&staged.target)
        .map_err(|e| CircomProofsError::Io(e.error))?;
    tracing::debug!("wrote {}", staged.target.display());
    Ok(())
}

/// Replace `target` with `value` as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(value: &T, target: &Path) -> Result<()> {
    commit(stage(value, target)?)
}

/// Replace two files, staging both before either is renamed.
pub fn write_json_pair<A, B>(first: (&A, &Path), second: (&B, &Path)) -> Result<()>
where
    A: Serialize + ?Sized,
    B: Serialize + ?Sized,
{
    let a = stage(first.0, first.1)?;
    let b = stage(second.0, second.1)?;
    commit(a)?;
    commit(b)
}
