//! # Material Store
//!
//! Canonical catalogue of the component types available to the editor,
//! keyed by descriptor `type`.
//!
//! ## Ordering
//!
//! Snapshots come back in insertion order. Re-collecting a type overwrites
//! the descriptor in place, so it keeps its original position; the overwrite
//! is logged.
//!
//! ## Ownership
//!
//! The store owns its descriptors. Queries hand out clones, so callers can
//! keep snapshots without pinning the store.

use lowcode_schema::MaterialDescriptor;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Group name used for descriptors that do not declare one
pub const DEFAULT_GROUP: &str = "default";

#[derive(Debug, Clone, Default)]
pub struct MaterialStore {
    materials: Vec<MaterialDescriptor>,
    index: HashMap<String, usize>,
}

impl MaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the descriptor keyed by its `type`.
    ///
    /// A descriptor without a type is dropped with a warning and `false` is
    /// returned, so bulk loads can carry on.
    pub fn collect(&mut self, descriptor: MaterialDescriptor) -> bool {
        if descriptor.type_name.trim().is_empty() {
            warn!(
                component_id = %descriptor.component_id,
                name = %descriptor.name,
                "Material has no type, skipping"
            );
            return false;
        }

        match self.index.get(&descriptor.type_name) {
            Some(&position) => {
                warn!(material_type = %descriptor.type_name, "Overwriting existing material");
                self.materials[position] = descriptor;
            }
            None => {
                debug!(material_type = %descriptor.type_name, "Collected material");
                self.index
                    .insert(descriptor.type_name.clone(), self.materials.len());
                self.materials.push(descriptor);
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn contains(&self, material_type: &str) -> bool {
        self.index.contains_key(material_type)
    }

    /// Snapshot of every descriptor, in insertion order
    pub fn get_all(&self) -> Vec<MaterialDescriptor> {
        self.materials.clone()
    }

    /// Borrowing iterator over the descriptors, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &MaterialDescriptor> {
        self.materials.iter()
    }

    pub fn get_by_type(&self, material_type: &str) -> Option<&MaterialDescriptor> {
        self.index
            .get(material_type)
            .map(|&position| &self.materials[position])
    }

    /// Descriptors whose group is exactly `group`
    pub fn get_by_group(&self, group: &str) -> Vec<MaterialDescriptor> {
        self.materials
            .iter()
            .filter(|m| m.group.as_deref() == Some(group))
            .cloned()
            .collect()
    }

    /// Descriptors tagged with `tag`
    pub fn get_by_tag(&self, tag: &str) -> Vec<MaterialDescriptor> {
        self.materials
            .iter()
            .filter(|m| m.tags.contains(tag))
            .cloned()
            .collect()
    }

    pub fn get_by_category(&self, category: &str) -> Vec<MaterialDescriptor> {
        self.materials
            .iter()
            .filter(|m| m.category == category)
            .cloned()
            .collect()
    }

    /// Group name to descriptors; ungrouped materials go under [`DEFAULT_GROUP`]
    pub fn group_materials(&self) -> BTreeMap<String, Vec<MaterialDescriptor>> {
        let mut groups: BTreeMap<String, Vec<MaterialDescriptor>> = BTreeMap::new();
        for material in &self.materials {
            let group = material
                .group
                .clone()
                .filter(|g| !g.is_empty())
                .unwrap_or_else(|| DEFAULT_GROUP.to_string());
            groups.entry(group).or_default().push(material.clone());
        }
        groups
    }

    /// Default props of a collected type, if the type is known
    pub fn default_props(&self, material_type: &str) -> Option<lowcode_schema::Props> {
        self.get_by_type(material_type)
            .map(lowcode_schema::get_default_props)
    }
}
