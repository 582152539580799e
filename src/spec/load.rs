use crate::Result;
use crate::graph::Program;
use crate::spec::ProgramSpec;
use anyhow::{Context, bail};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Read every `*.json` descriptor under `dir` (recursively) into programs.
///
/// Files are read in sorted path order; other files are skipped. Ids must be
/// unique across the whole tree.
pub fn load_templates(dir: &Path) -> Result<Vec<Program>> {
    let paths = collect_json_files(dir)
        .with_context(|| format!("scan templates directory {}", dir.display()))?;

    let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut programs = Vec::with_capacity(paths.len());
    for path in paths {
        let program = load_descriptor(&path)?;
        if let Some(prev) = seen.insert(program.id.clone(), path.clone()) {
            bail!(
                "duplicate program id {:?} in {} and {}",
                program.id,
                prev.display(),
                path.display()
            );
        }
        debug!(program = %program.id, path = %path.display(), "loaded descriptor");
        programs.push(program);
    }

    info!(count = programs.len(), dir = %dir.display(), "loaded program descriptors");
    Ok(programs)
}

/// Parse and validate a single descriptor file.
pub fn load_descriptor(path: &Path) -> Result<Program> {
    let text = fs::read_to_string(path).with_context(|| format!("read descriptor {}", path.display()))?;
    let spec: ProgramSpec =
        serde_json::from_str(&text).with_context(|| format!("parse descriptor {}", path.display()))?;
    spec.validate_and_build()
        .with_context(|| format!("invalid descriptor {}", path.display()))
}

/// Symlinks are not followed, so a link back up the tree cannot loop.
fn collect_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "json") {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}
