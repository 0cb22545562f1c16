//! Extraction Configuration
//!
//! Optional toml file with an `[extract]` table. Command-line values are
//! merged on top: lists are extended, scalars replaced.
//!
//! ```toml
//! [extract]
//! inputs = ["src/bindings.rs"]
//! folders = ["src/ffi"]
//! workspace = "Cargo.toml"
//! output = "imports.txt"
//! format = "sexpr"
//! jobs = 4
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::ports::descriptor_emitter::OutputFormat;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    pub inputs: Vec<String>,
    pub folders: Vec<String>,
    pub workspace: Option<String>,
    /// Output file; stdout when absent.
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub jobs: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    extract: ExtractConfig,
}

impl ExtractConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text).context("Invalid em-import config")?;
        Ok(file.extract)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("In config file {}", path.display()))
    }

    /// Apply overrides on top of this configuration.
    pub fn merge(mut self, overrides: ExtractConfig) -> Self {
        self.inputs.extend(overrides.inputs);
        self.folders.extend(overrides.folders);
        self.workspace = overrides.workspace.or(self.workspace);
        self.output = overrides.output.or(self.output);
        self.format = overrides.format.or(self.format);
        self.jobs = overrides.jobs.or(self.jobs);
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    pub fn has_sources(&self) -> bool {
        !self.inputs.is_empty() || !self.folders.is_empty() || self.workspace.is_some()
    }
}
