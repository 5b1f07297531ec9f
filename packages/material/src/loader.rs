//! Bulk material loading.
//!
//! Loading never aborts on a bad entry: unreadable files, invalid JSON and
//! descriptors without a type are logged and counted as skipped.

use crate::error::{MaterialError, MaterialResult};
use crate::store::MaterialStore;
use lowcode_schema::MaterialDescriptor;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File suffix of material description files
pub const MATERIAL_FILE_SUFFIX: &str = ".material.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
}

/// Collect every descriptor from `materials` into `store`
pub fn load_materials<I>(store: &mut MaterialStore, materials: I) -> LoadSummary
where
    I: IntoIterator<Item = MaterialDescriptor>,
{
    let mut summary = LoadSummary::default();
    for material in materials {
        if store.collect(material) {
            summary.loaded += 1;
        } else {
            summary.skipped += 1;
        }
    }
    summary
}

/// Recursively scan `dir` for `*.material.json` files and collect them.
///
/// A file may hold a single descriptor or an array of descriptors. Only a
/// missing directory is an error.
pub fn load_dir(store: &mut MaterialStore, dir: &Path) -> MaterialResult<LoadSummary> {
    if !dir.is_dir() {
        return Err(MaterialError::DirectoryNotFound(dir.to_path_buf()));
    }

    info!(dir = %dir.display(), "Loading materials");

    let mut summary = LoadSummary::default();
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_material_file(path))
        .collect();
    files.sort();

    for path in files {
        match read_material_file(&path) {
            Ok(materials) => {
                debug!(path = %path.display(), count = materials.len(), "Read material file");
                let file_summary = load_materials(store, materials);
                summary.loaded += file_summary.loaded;
                summary.skipped += file_summary.skipped;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping material file");
                summary.skipped += 1;
            }
        }
    }

    info!(
        loaded = summary.loaded,
        skipped = summary.skipped,
        "Material loading finished"
    );
    Ok(summary)
}

fn is_material_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(MATERIAL_FILE_SUFFIX))
}

/// Parse one material file: either a descriptor object or an array of them
pub fn read_material_file(path: &Path) -> MaterialResult<Vec<MaterialDescriptor>> {
    let content = fs::read_to_string(path).map_err(|source| MaterialError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| MaterialError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;

    let materials = if value.is_array() {
        serde_json::from_value::<Vec<MaterialDescriptor>>(value)
    } else {
        serde_json::from_value::<MaterialDescriptor>(value).map(|m| vec![m])
    }
    .map_err(|source| MaterialError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(materials)
}
