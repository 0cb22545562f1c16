//! Source Loading
//!
//! Turns files, folders and cargo workspaces into translation units. Each
//! unit carries the module path its items live under, derived from the
//! file's place below the source root (`src/audio.rs` → `crate::audio`,
//! `src/a/mod.rs` → `crate::a`).

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use cargo_metadata::MetadataCommand;
use tracing::{debug, info};

/// One translation unit: (module_path, file_path, file_content).
pub type SourceUnit = (String, String, String);

/// Target kinds whose sources are scanned.
const SOURCE_TARGETS: &[&str] = &["lib", "bin", "proc-macro"];

pub struct ProjectLoader;

impl ProjectLoader {
    /// Load a single source file as the root of a crate named after its stem.
    pub fn load_file(path: &str) -> Result<SourceUnit> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path))?;
        let crate_name = Path::new(path)
            .file_stem()
            .map(|stem| crate_ident(&stem.to_string_lossy()))
            .unwrap_or_default();
        Ok((crate_name, path.to_string(), content))
    }

    /// Load every `.rs` file under a folder, sorted by path.
    /// A trailing `src` directory takes its crate name from the parent.
    pub fn load_folder(dir: &str) -> Result<Vec<SourceUnit>> {
        let root = Path::new(dir);
        if !root.is_dir() {
            anyhow::bail!("Input folder not found: {}", dir);
        }
        let canonical = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let named = if canonical.ends_with("src") {
            canonical.parent().unwrap_or(&canonical)
        } else {
            canonical.as_path()
        };
        let crate_name = named
            .file_name()
            .map(|name| crate_ident(&name.to_string_lossy()))
            .unwrap_or_default();

        let files = load_tree(&crate_name, root)?;
        debug!(folder = dir, files = files.len(), "loaded folder");
        Ok(files)
    }

    /// Load the lib, bin and proc-macro sources of every workspace member.
    pub fn load_workspace(manifest_path: &str) -> Result<Vec<SourceUnit>> {
        let metadata = MetadataCommand::new()
            .manifest_path(manifest_path)
            .no_deps()
            .exec()
            .context("Failed to execute cargo metadata")?;

        let mut files = Vec::new();
        for package in metadata.workspace_packages() {
            let crate_name = crate_ident(&package.name);
            let roots: BTreeSet<PathBuf> = package
                .targets
                .iter()
                .filter(|target| target.kind.iter().any(|k| SOURCE_TARGETS.contains(&k.as_str())))
                .filter_map(|target| target.src_path.parent())
                .map(|dir| dir.as_std_path().to_path_buf())
                .collect();
            for root in &roots {
                files.extend(load_tree(&crate_name, root)?);
            }
        }

        // Nested roots (src/bin under src) see the same files; the shallower root wins.
        files.sort_by(|a, b| a.1.cmp(&b.1));
        files.dedup_by(|a, b| a.1 == b.1);

        info!(manifest = manifest_path, files = files.len(), "workspace collected");
        Ok(files)
    }
}

/// Read all Rust files below `src_root` as units of `crate_name`, sorted by path.
fn load_tree(crate_name: &str, src_root: &Path) -> Result<Vec<SourceUnit>> {
    let mut paths = Vec::new();
    if src_root.is_dir() {
        find_rust_files(src_root, &mut paths)?;
    }
    paths.sort();
    paths
        .iter()
        .map(|file| read_unit(crate_name, src_root, file))
        .collect()
}

fn find_rust_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            if !(path.ends_with("target") || path.ends_with(".git")) {
                find_rust_files(&path, out)?;
            }
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
    Ok(())
}

fn read_unit(crate_name: &str, src_root: &Path, file: &Path) -> Result<SourceUnit> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read file {}", file.display()))?;
    Ok((
        module_path(crate_name, src_root, file),
        file.display().to_string(),
        content,
    ))
}

/// Module path of `file` relative to its source root. `lib.rs`/`main.rs`
/// at the root and `mod.rs` anywhere name their directory's module.
pub fn module_path(crate_name: &str, src_root: &Path, file: &Path) -> String {
    let relative = file
        .strip_prefix(src_root)
        .unwrap_or_else(|_| Path::new(file.file_name().unwrap_or_default()));
    let parts: Vec<String> = relative
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(crate_ident(&part.to_string_lossy())),
            _ => None,
        })
        .collect();

    let mut segments = vec![crate_name.to_string()];
    let last = parts.len().saturating_sub(1);
    for (i, part) in parts.iter().enumerate() {
        let names_parent = i == last && (part == "mod" || (i == 0 && (part == "lib" || part == "main")));
        if !names_parent {
            segments.push(part.clone());
        }
    }
    segments.join("::")
}

/// Crate names use `_` in paths even when the package name has `-`.
fn crate_ident(name: &str) -> String {
    name.replace('-', "_")
}
