pub mod materials;
pub mod render;
pub mod validate;

pub use materials::{materials, MaterialsArgs};
pub use render::{render, RenderArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::{Context, Result};
use colored::Colorize;
use lowcode_material::{load_dir, MaterialStore};
use lowcode_registry::builtins::{builtin_components, builtin_registrations};
use lowcode_registry::ComponentRegistry;
use lowcode_schema::PageSchema;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Collect the materials of `dir`, or an empty store without one
pub(crate) fn load_store(dir: Option<&PathBuf>) -> Result<MaterialStore> {
    let mut store = MaterialStore::new();
    if let Some(dir) = dir {
        let summary = load_dir(&mut store, dir)
            .with_context(|| format!("Failed to load materials from {}", dir.display()))?;
        eprintln!(
            "   Materials: {} loaded, {} skipped",
            summary.loaded.to_string().green(),
            if summary.skipped > 0 {
                summary.skipped.to_string().yellow()
            } else {
                summary.skipped.to_string().normal()
            }
        );
    }
    Ok(store)
}

/// Every collected material a built-in can render, plus the built-in
/// primitives no material describes
pub(crate) fn build_registry(store: &MaterialStore) -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry.bind_materials(store, &builtin_components(), None);
    let missing: Vec<_> = builtin_registrations()
        .into_iter()
        .filter(|registration| !registry.contains(registration.component_type()))
        .collect();
    registry.register_many(missing);
    debug!(components = registry.len(), "Built component registry");
    registry
}

pub(crate) fn read_schema(path: &Path) -> Result<PageSchema> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    PageSchema::from_json(&source).with_context(|| format!("Invalid page schema in {}", path.display()))
}
