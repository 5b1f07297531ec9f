//! # Component Registry
//!
//! The only place a component type identifier is resolved to something
//! renderable.
//!
//! ## Keys
//!
//! Every registration is reachable under two keys: its descriptor's
//! `componentId` and, when present, its `type`. The keys live in separate
//! maps pointing at one shared `Arc<Registration>`:
//!
//! - Lookups try the id map first, then the type map.
//! - Re-registering an id replaces the record under both of its keys.
//! - A type key may be taken over by a registration with a different id;
//!   the two id entries then stay independent (last write wins per key).
//! - Unregistering an id drops every type key still pointing at it.
//!
//! ## Usage
//!
//! ```rust
//! use lowcode_registry::{builtins, ComponentRegistry};
//!
//! let mut registry = ComponentRegistry::new();
//! for registration in builtins::builtin_registrations() {
//!     registry.register(registration).unwrap();
//! }
//! assert!(registry.get_component("button").is_some());
//! ```

use crate::component::{Component, ComponentLoader, Registration};
use crate::error::{RegistryError, RegistryResult};
use lowcode_material::MaterialStore;
use lowcode_schema::MaterialSource;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    registration: Arc<Registration>,
}

#[derive(Debug, Default, Clone)]
pub struct ComponentRegistry {
    by_id: HashMap<String, Entry>,
    by_type: HashMap<String, Entry>,
    next_seq: u64,
}

/// Outcome of [`ComponentRegistry::bind_materials`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindSummary {
    pub builtin: usize,
    pub dynamic: usize,
    pub skipped: usize,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register strictly: the descriptor must carry a component id.
    pub fn register(&mut self, registration: Registration) -> RegistryResult<()> {
        let component_id = registration.descriptor.component_id.clone();
        if component_id.trim().is_empty() {
            return Err(RegistryError::MissingComponentId {
                name: registration.descriptor.name.clone(),
            });
        }

        let type_name = registration.descriptor.type_name.clone();
        let registration = Arc::new(registration);

        let seq = match self.by_id.get(&component_id) {
            Some(previous) => {
                warn!(component_id = %component_id, "Overwriting registered component");
                let stale = previous.registration.clone();
                self.by_type
                    .retain(|_, entry| !Arc::ptr_eq(&entry.registration, &stale));
                previous.seq
            }
            None => {
                self.next_seq += 1;
                self.next_seq
            }
        };

        let entry = Entry { seq, registration };
        if !type_name.is_empty() {
            if let Some(previous) = self.by_type.get(&type_name) {
                if previous.registration.component_id() != component_id {
                    warn!(
                        component_type = %type_name,
                        previous_id = %previous.registration.component_id(),
                        component_id = %component_id,
                        "Type key now points at a different component"
                    );
                }
            }
            self.by_type.insert(type_name.clone(), entry.clone());
        }
        self.by_id.insert(component_id.clone(), entry);

        debug!(component_id = %component_id, component_type = %type_name, "Registered component");
        Ok(())
    }

    /// Register each item in turn. Failures are logged and skipped; earlier
    /// successes stay in place. Returns the number registered.
    pub fn register_many(&mut self, registrations: impl IntoIterator<Item = Registration>) -> usize {
        let mut registered = 0;
        for registration in registrations {
            match self.register(registration) {
                Ok(()) => registered += 1,
                Err(e) => warn!(error = %e, "Skipping registration"),
            }
        }
        registered
    }

    /// Look up by component id, then by type
    pub fn get_component(&self, id_or_type: &str) -> Option<Arc<Registration>> {
        self.by_id
            .get(id_or_type)
            .or_else(|| self.by_type.get(id_or_type))
            .map(|entry| entry.registration.clone())
    }

    pub fn contains(&self, id_or_type: &str) -> bool {
        self.by_id.contains_key(id_or_type) || self.by_type.contains_key(id_or_type)
    }

    /// Every distinct registration, in first-registration order
    pub fn get_all_components(&self) -> Vec<Arc<Registration>> {
        let mut entries: Vec<&Entry> = self.by_id.values().collect();
        entries.sort_by_key(|entry| entry.seq);
        entries
            .into_iter()
            .map(|entry| entry.registration.clone())
            .collect()
    }

    pub fn get_components_by_group(&self, group: &str) -> Vec<Arc<Registration>> {
        self.get_all_components()
            .into_iter()
            .filter(|r| r.descriptor.group.as_deref() == Some(group))
            .collect()
    }

    pub fn get_components_by_category(&self, category: &str) -> Vec<Arc<Registration>> {
        self.get_all_components()
            .into_iter()
            .filter(|r| r.descriptor.category == category)
            .collect()
    }

    /// Remove a registration by id. Unknown ids are ignored.
    pub fn unregister_component(&mut self, component_id: &str) -> bool {
        let Some(entry) = self.by_id.remove(component_id) else {
            return false;
        };

        self.by_type
            .retain(|_, typed| !Arc::ptr_eq(&typed.registration, &entry.registration));
        debug!(component_id = %component_id, "Unregistered component");
        true
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
        self.by_type.clear();
        debug!("Cleared component registry");
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Register every collected material that is not registered yet.
    ///
    /// A built-in implementation for the material's type wins; otherwise a
    /// local import path becomes a dynamic registration through `loader`.
    /// Remote and sourceless materials without a built-in are skipped.
    /// Materials without a component id are keyed by their type.
    pub fn bind_materials(
        &mut self,
        store: &MaterialStore,
        builtins: &HashMap<String, Arc<dyn Component>>,
        loader: Option<Arc<dyn ComponentLoader>>,
    ) -> BindSummary {
        let mut summary = BindSummary::default();

        for material in store.iter() {
            if self.contains(&material.type_name) {
                continue;
            }

            let mut descriptor = material.clone();
            if descriptor.component_id.is_empty() {
                descriptor.component_id = descriptor.type_name.clone();
            }

            let registration = if let Some(component) = builtins.get(&descriptor.type_name) {
                summary.builtin += 1;
                Registration::builtin(descriptor, component.clone())
            } else {
                match (&descriptor.source, &loader) {
                    (Some(MaterialSource::Local { import }), Some(loader)) => {
                        summary.dynamic += 1;
                        let path = import.path.clone();
                        Registration::dynamic(descriptor, path, loader.clone())
                    }
                    _ => {
                        warn!(
                            component_type = %descriptor.type_name,
                            "No implementation available for material"
                        );
                        summary.skipped += 1;
                        continue;
                    }
                }
            };

            if let Err(e) = self.register(registration) {
                warn!(error = %e, "Skipping material");
                summary.skipped += 1;
            }
        }

        info!(
            builtin = summary.builtin,
            dynamic = summary.dynamic,
            skipped = summary.skipped,
            "Bound materials to implementations"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::{builtin_components, ElementComponent};
    use crate::component::StaticLoader;
    use lowcode_schema::{ImportSpec, MaterialDescriptor};

    fn registration(id: &str, type_name: &str) -> Registration {
        Registration::builtin(
            MaterialDescriptor::new(id, type_name),
            Arc::new(ElementComponent::new(type_name, "div")),
        )
    }

    #[test]
    fn test_dual_key_lookup() {
        let mut registry = ComponentRegistry::new();
        registry.register(registration("a", "btn")).unwrap();

        assert_eq!(registry.get_component("a").unwrap().component_id(), "a");
        assert_eq!(registry.get_component("btn").unwrap().component_id(), "a");
        assert_eq!(registry.get_all_components().len(), 1);

        registry.unregister_component("a");
        assert!(registry.get_component("a").is_none());
        assert!(registry.get_component("btn").is_none());
    }

    #[test]
    fn test_missing_id_rejected() {
        let mut registry = ComponentRegistry::new();
        let result = registry.register(registration("", "btn"));
        assert!(matches!(result, Err(RegistryError::MissingComponentId { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_many_keeps_partial_progress() {
        let mut registry = ComponentRegistry::new();
        let count = registry.register_many(vec![
            registration("a", "one"),
            registration("", "two"),
            registration("c", "three"),
        ]);
        assert_eq!(count, 2);
        assert!(registry.get_component("three").is_some());
        assert!(registry.get_component("two").is_none());
    }

    #[test]
    fn test_type_key_taken_over() {
        let mut registry = ComponentRegistry::new();
        registry.register(registration("a", "btn")).unwrap();
        registry.register(registration("b", "btn")).unwrap();

        assert_eq!(registry.get_component("btn").unwrap().component_id(), "b");
        assert_eq!(registry.get_component("a").unwrap().component_id(), "a");
        assert_eq!(registry.get_all_components().len(), 2);

        registry.unregister_component("a");
        assert_eq!(registry.get_component("btn").unwrap().component_id(), "b");
    }

    #[test]
    fn test_reregister_moves_type_key() {
        let mut registry = ComponentRegistry::new();
        registry.register(registration("a", "btn")).unwrap();
        registry.register(registration("x", "other")).unwrap();
        registry.register(registration("a", "card")).unwrap();

        assert!(registry.get_component("btn").is_none());
        assert_eq!(registry.get_component("card").unwrap().component_id(), "a");

        let order: Vec<String> = registry
            .get_all_components()
            .iter()
            .map(|r| r.component_id().to_string())
            .collect();
        assert_eq!(order, vec!["a", "x"]);
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let mut registry = ComponentRegistry::new();
        registry.register(registration("a", "btn")).unwrap();
        assert!(!registry.unregister_component("zzz"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_group_and_category_filters() {
        let mut registry = ComponentRegistry::new();
        let mut grouped = registration("a", "btn");
        grouped.descriptor.group = Some("basic".to_string());
        grouped.descriptor.category = "action".to_string();
        registry.register(grouped).unwrap();
        registry.register(registration("b", "card")).unwrap();

        assert_eq!(registry.get_components_by_group("basic").len(), 1);
        assert_eq!(registry.get_components_by_category("action").len(), 1);
        assert_eq!(registry.get_components_by_category("basic").len(), 1);

        registry.clear();
        assert!(registry.get_all_components().is_empty());
    }

    #[test]
    fn test_bind_materials() {
        let mut store = MaterialStore::new();
        store.collect(MaterialDescriptor::new("", "button"));

        let mut chart = MaterialDescriptor::new("chart-1", "chart");
        chart.source = Some(MaterialSource::Local {
            import: ImportSpec {
                path: "@/materials/Chart".to_string(),
                export_name: None,
                destructuring: false,
            },
        });
        store.collect(chart);
        store.collect(MaterialDescriptor::new("map-1", "map"));

        let mut registry = ComponentRegistry::new();
        let loader: Arc<dyn ComponentLoader> = Arc::new(StaticLoader::new());
        let summary = registry.bind_materials(&store, &builtin_components(), Some(loader));

        assert_eq!(
            summary,
            BindSummary {
                builtin: 1,
                dynamic: 1,
                skipped: 1
            }
        );
        assert_eq!(registry.get_component("button").unwrap().component_id(), "button");
        assert!(registry.get_component("chart").unwrap().is_dynamic());
        assert!(registry.get_component("map").is_none());
    }
}
