//! Pipeline configuration.
//!
//! There is no configuration file: the CLI builds a [`PipelineConfig`] from its
//! flags and hands it to the locator, generator, verifier, and harness.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How a circuit's artifacts are arranged under the build root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `<build_root>/<name>/<name>.wasm` and friends.
    #[default]
    Nested,
    /// `<build_root>/<name>.wasm` and friends.
    Flat,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nested => "nested",
            Self::Flat => "flat",
        }
    }
}

/// Settings shared by every stage of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Root of the compiled artifact tree (`build`).
    pub build_root: PathBuf,
    /// Per-circuit subdirectories or a flat directory.
    pub layout: Layout,
    /// Directory holding the `.circom` sources used by the witness harness.
    pub circuits_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            build_root: PathBuf::from("build"),
            layout: Layout::Nested,
            circuits_dir: PathBuf::from("src"),
        }
    }
}

impl PipelineConfig {
    pub fn with_build_root(mut self, build_root: impl Into<PathBuf>) -> Self {
        self.build_root = build_root.into();
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_circuits_dir(mut self, circuits_dir: impl Into<PathBuf>) -> Self {
        self.circuits_dir = circuits_dir.into();
        self
    }
}
