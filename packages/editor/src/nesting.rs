//! # Nesting Rules
//!
//! Placement constraints declared by material descriptors:
//!
//! - `childWhitelist` on the parent: only these types may be direct children
//! - `parentWhitelist` on the child: only these types may be its parent
//! - `descendantBlacklist` on any ancestor: these types may not appear below it
//! - `ancestorWhitelist` on the child: at least one ancestor must be of these types
//! - slot `allowComponentTypes` / `allowComponents` on the target slot
//!
//! Types without a descriptor carry no rules. Empty lists mean no constraint.

use crate::mutations::MutationError;
use lowcode_schema::{ancestor_types, find_node_by_id, Container, ComponentNode, MaterialDescriptor};
use std::collections::HashMap;

/// Descriptors the document checks placements against, keyed by type
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    descriptors: HashMap<String, MaterialDescriptor>,
}

fn listed(list: &Option<Vec<String>>) -> Option<&[String]> {
    list.as_deref().filter(|types| !types.is_empty())
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, descriptor: MaterialDescriptor) {
        self.descriptors
            .insert(descriptor.type_name.clone(), descriptor);
    }

    pub fn descriptor(&self, component_type: &str) -> Option<&MaterialDescriptor> {
        self.descriptors.get(component_type)
    }

    pub fn is_container(&self, component_type: &str) -> bool {
        self.descriptor(component_type)
            .map_or(false, MaterialDescriptor::accepts_children)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Check that a node of `child_type` may go into `container` of `parent_id`
    pub fn check_placement(
        &self,
        root: &ComponentNode,
        parent_id: &str,
        container: &Container,
        child_type: &str,
    ) -> Result<(), MutationError> {
        let parent = find_node_by_id(root, parent_id)
            .ok_or_else(|| MutationError::NodeNotFound(parent_id.to_string()))?;
        let parent_type = parent.component_type.as_str();

        let violation = |reason: String| MutationError::NestingViolation {
            child: child_type.to_string(),
            parent: parent_type.to_string(),
            reason,
        };

        match container {
            Container::Children => {
                if !self.is_container(parent_type) {
                    return Err(MutationError::NotAContainer(parent_id.to_string()));
                }
            }
            Container::Slot(name) => {
                if let Some(slot) = self.descriptor(parent_type).and_then(|d| d.slot(name)) {
                    if !slot.accepts(child_type) {
                        return Err(violation(format!("slot '{}' does not accept it", name)));
                    }
                }
            }
        }

        if let Some(rule) = self.descriptor(parent_type).and_then(|d| d.nesting_rule()) {
            if let Some(allowed) = listed(&rule.child_whitelist) {
                if !allowed.iter().any(|t| t == child_type) {
                    return Err(violation("not in the parent's child whitelist".to_string()));
                }
            }
        }

        // The parent followed by its own ancestors, nearest first
        let mut ancestors = vec![parent_type.to_string()];
        ancestors.extend(ancestor_types(root, parent_id).unwrap_or_default());

        for ancestor in &ancestors {
            let blacklisted = self
                .descriptor(ancestor)
                .and_then(|d| d.nesting_rule())
                .and_then(|rule| listed(&rule.descendant_blacklist))
                .map_or(false, |blocked| blocked.iter().any(|t| t == child_type));
            if blacklisted {
                return Err(violation(format!("'{}' forbids it as a descendant", ancestor)));
            }
        }

        if let Some(rule) = self.descriptor(child_type).and_then(|d| d.nesting_rule()) {
            if let Some(allowed) = listed(&rule.parent_whitelist) {
                if !allowed.iter().any(|t| t == parent_type) {
                    return Err(violation("parent is not in its parent whitelist".to_string()));
                }
            }
            if let Some(allowed) = listed(&rule.ancestor_whitelist) {
                if !ancestors.iter().any(|a| allowed.contains(a)) {
                    return Err(violation("no ancestor is in its ancestor whitelist".to_string()));
                }
            }
        }

        Ok(())
    }
}

impl FromIterator<MaterialDescriptor> for Catalog {
    fn from_iter<I: IntoIterator<Item = MaterialDescriptor>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for descriptor in iter {
            catalog.insert(descriptor);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowcode_schema::{ComponentCapabilities, ComponentConfigure, NestingRule, SlotDescriptor};

    fn with_rule(descriptor: MaterialDescriptor, rule: NestingRule) -> MaterialDescriptor {
        let mut descriptor = descriptor;
        descriptor.configure = Some(ComponentConfigure {
            component: Some(ComponentCapabilities {
                nesting_rule: Some(rule),
                ..Default::default()
            }),
            ..Default::default()
        });
        descriptor
    }

    fn catalog() -> Catalog {
        let form = with_rule(
            MaterialDescriptor::new("form", "form").container(),
            NestingRule {
                descendant_blacklist: Some(vec!["form".to_string()]),
                ..Default::default()
            },
        );
        let list = with_rule(
            MaterialDescriptor::new("list", "list").container(),
            NestingRule {
                child_whitelist: Some(vec!["list-item".to_string()]),
                ..Default::default()
            },
        );
        let item = with_rule(
            MaterialDescriptor::new("list-item", "list-item").container(),
            NestingRule {
                parent_whitelist: Some(vec!["list".to_string()]),
                ..Default::default()
            },
        );
        let submit = with_rule(
            MaterialDescriptor::new("submit", "submit"),
            NestingRule {
                ancestor_whitelist: Some(vec!["form".to_string()]),
                ..Default::default()
            },
        );
        let mut card = MaterialDescriptor::new("card", "card").container();
        card.slots.push(SlotDescriptor {
            name: "header".to_string(),
            label: String::new(),
            description: None,
            is_default: false,
            allow_components: None,
            allow_component_types: Some(vec!["text".to_string()]),
        });

        vec![
            MaterialDescriptor::new("container", "container").container(),
            MaterialDescriptor::new("text", "text"),
            form,
            list,
            item,
            submit,
            card,
        ]
        .into_iter()
        .collect()
    }

    fn tree() -> ComponentNode {
        ComponentNode::new("container", "root")
            .with_child(
                ComponentNode::new("form", "f")
                    .with_child(ComponentNode::new("container", "f-box")),
            )
            .with_child(ComponentNode::new("list", "l"))
            .with_child(ComponentNode::new("card", "c"))
            .with_child(ComponentNode::new("text", "t"))
    }

    #[test]
    fn test_plain_container_accepts_anything() {
        let catalog = catalog();
        assert!(catalog
            .check_placement(&tree(), "root", &Container::Children, "text")
            .is_ok());
    }

    #[test]
    fn test_leaf_is_not_a_container() {
        let result = catalog().check_placement(&tree(), "t", &Container::Children, "text");
        assert_eq!(result, Err(MutationError::NotAContainer("t".to_string())));
    }

    #[test]
    fn test_descendant_blacklist_applies_to_deep_ancestors() {
        let result = catalog().check_placement(&tree(), "f-box", &Container::Children, "form");
        assert!(matches!(result, Err(MutationError::NestingViolation { .. })));
    }

    #[test]
    fn test_child_and_parent_whitelists() {
        let catalog = catalog();
        assert!(catalog
            .check_placement(&tree(), "l", &Container::Children, "text")
            .is_err());
        assert!(catalog
            .check_placement(&tree(), "l", &Container::Children, "list-item")
            .is_ok());
        assert!(catalog
            .check_placement(&tree(), "root", &Container::Children, "list-item")
            .is_err());
    }

    #[test]
    fn test_ancestor_whitelist() {
        let catalog = catalog();
        assert!(catalog
            .check_placement(&tree(), "f-box", &Container::Children, "submit")
            .is_ok());
        assert!(catalog
            .check_placement(&tree(), "root", &Container::Children, "submit")
            .is_err());
    }

    #[test]
    fn test_slot_allow_list() {
        let catalog = catalog();
        let header = Container::Slot("header".to_string());
        assert!(catalog.check_placement(&tree(), "c", &header, "text").is_ok());
        assert!(catalog.check_placement(&tree(), "c", &header, "form").is_err());
    }
}
