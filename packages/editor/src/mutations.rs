//! # Schema Mutations
//!
//! Structural operations on a page tree. These are the only way the
//! document store changes a schema.
//!
//! ## Mutation Semantics
//!
//! ### Placement
//! - `inside` appends to the target's children; the target must be a container
//! - `before` / `after` insert next to the target in whichever list holds it
//!   (children or a named slot)
//! - The root has no siblings: `before` / `after` on the root fail
//!
//! ### Move
//! - Atomic relocation: validated before anything is detached
//! - Fails if the target is the source or lies inside the source
//!
//! ### Remove / Duplicate
//! - Removes or copies the whole subtree
//! - The root can be neither removed nor duplicated
//!
//! ### SetProp
//! - Atomic replacement of one prop value
//! - Values of declared properties must match the declared type

use crate::nesting::Catalog;
use lowcode_render::DropPosition;
use lowcode_schema::{
    clone_component_node, create_component_node, find_node_by_id, find_node_by_id_mut,
    get_default_props, is_descendant, locate_node, take_node_by_id, ComponentNode, Container,
    NodeLocation, Props,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Semantic mutations of a page tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    /// Create a node of `component_type` relative to `target_node_id`
    #[serde(rename_all = "camelCase")]
    AddComponent {
        component_type: String,
        target_node_id: String,
        position: DropPosition,
        #[serde(default)]
        props: Props,
    },

    #[serde(rename_all = "camelCase")]
    MoveComponent {
        source_node_id: String,
        target_node_id: String,
        position: DropPosition,
    },

    #[serde(rename_all = "camelCase")]
    RemoveComponent { node_id: String },

    #[serde(rename_all = "camelCase")]
    SetProp {
        node_id: String,
        prop_name: String,
        prop_value: Value,
    },

    /// Deep copy with fresh ids, inserted right after the original
    #[serde(rename_all = "camelCase")]
    DuplicateComponent { node_id: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("The root node cannot be {0}")]
    RootNode(&'static str),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Node '{0}' cannot hold children")]
    NotAContainer(String),

    #[error("'{child}' cannot be placed in '{parent}': {reason}")]
    NestingViolation {
        child: String,
        parent: String,
        reason: String,
    },

    #[error("Component type must not be empty")]
    EmptyComponentType,

    #[error("Invalid value for prop '{prop_name}': expected {expected}")]
    InvalidPropValue {
        prop_name: String,
        expected: String,
    },
}

impl Mutation {
    /// Id of the node the mutation is about, when it already exists
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Mutation::AddComponent { .. } => None,
            Mutation::MoveComponent { source_node_id, .. } => Some(source_node_id),
            Mutation::RemoveComponent { node_id }
            | Mutation::SetProp { node_id, .. }
            | Mutation::DuplicateComponent { node_id } => Some(node_id),
        }
    }

    /// Whether the mutation changes the shape of the tree
    pub fn is_structural(&self) -> bool {
        !matches!(self, Mutation::SetProp { .. })
    }

    /// Apply to `root` with validation. Returns the id of the node created,
    /// moved or edited.
    ///
    /// Nothing is modified when validation fails.
    pub fn apply(&self, root: &mut ComponentNode, catalog: &Catalog) -> Result<String, MutationError> {
        self.validate(root, catalog)?;

        match self {
            Mutation::AddComponent {
                component_type,
                target_node_id,
                position,
                props,
            } => Self::apply_add(root, catalog, component_type, target_node_id, *position, props),

            Mutation::MoveComponent {
                source_node_id,
                target_node_id,
                position,
            } => Self::apply_move(root, source_node_id, target_node_id, *position),

            Mutation::RemoveComponent { node_id } => {
                take_node_by_id(root, node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                Ok(node_id.clone())
            }

            Mutation::SetProp {
                node_id,
                prop_name,
                prop_value,
            } => {
                let node = find_node_by_id_mut(root, node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                node.props.insert(prop_name.clone(), prop_value.clone());
                Ok(node_id.clone())
            }

            Mutation::DuplicateComponent { node_id } => Self::apply_duplicate(root, node_id),
        }
    }

    /// Check every precondition without touching the tree
    pub fn validate(&self, root: &ComponentNode, catalog: &Catalog) -> Result<(), MutationError> {
        match self {
            Mutation::AddComponent {
                component_type,
                target_node_id,
                position,
                ..
            } => {
                if component_type.trim().is_empty() {
                    return Err(MutationError::EmptyComponentType);
                }
                let (parent_id, container, _) = placement(root, target_node_id, *position)?;
                catalog.check_placement(root, &parent_id, &container, component_type)
            }

            Mutation::MoveComponent {
                source_node_id,
                target_node_id,
                position,
            } => {
                let source = find_node_by_id(root, source_node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(source_node_id.clone()))?;
                if source_node_id == &root.id {
                    return Err(MutationError::RootNode("moved"));
                }
                if source_node_id == target_node_id || is_descendant(root, source_node_id, target_node_id) {
                    return Err(MutationError::CycleDetected);
                }
                let (parent_id, container, _) = placement(root, target_node_id, *position)?;
                catalog.check_placement(root, &parent_id, &container, &source.component_type)
            }

            Mutation::RemoveComponent { node_id } | Mutation::DuplicateComponent { node_id } => {
                if node_id == &root.id {
                    let action = if matches!(self, Mutation::RemoveComponent { .. }) {
                        "removed"
                    } else {
                        "duplicated"
                    };
                    return Err(MutationError::RootNode(action));
                }
                if find_node_by_id(root, node_id).is_none() {
                    return Err(MutationError::NodeNotFound(node_id.clone()));
                }
                Ok(())
            }

            Mutation::SetProp {
                node_id,
                prop_name,
                prop_value,
            } => {
                let node = find_node_by_id(root, node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                let declared = catalog
                    .descriptor(&node.component_type)
                    .and_then(|d| d.property(prop_name));
                match declared {
                    Some(property)
                        if !lowcode_schema::validate_property_value(Some(prop_value), property) =>
                    {
                        Err(MutationError::InvalidPropValue {
                            prop_name: prop_name.clone(),
                            expected: property.property_type.as_str().to_string(),
                        })
                    }
                    _ => Ok(()),
                }
            }
        }
    }

    fn apply_add(
        root: &mut ComponentNode,
        catalog: &Catalog,
        component_type: &str,
        target_node_id: &str,
        position: DropPosition,
        props: &Props,
    ) -> Result<String, MutationError> {
        let node = match catalog.descriptor(component_type) {
            Some(descriptor) => {
                let mut merged = get_default_props(descriptor);
                for (name, value) in props {
                    merged.insert(name.clone(), value.clone());
                }
                let mut node = create_component_node(component_type, merged, None);
                node.children = descriptor
                    .initial_children()
                    .iter()
                    .map(|child| clone_component_node(child, true))
                    .collect();
                node
            }
            None => create_component_node(component_type, props.clone(), None),
        };

        let id = node.id.clone();
        insert_at(root, target_node_id, position, node)?;
        Ok(id)
    }

    fn apply_move(
        root: &mut ComponentNode,
        source_node_id: &str,
        target_node_id: &str,
        position: DropPosition,
    ) -> Result<String, MutationError> {
        let original = locate_node(root, source_node_id)
            .ok_or_else(|| MutationError::NodeNotFound(source_node_id.to_string()))?;
        let node = take_node_by_id(root, source_node_id)
            .ok_or_else(|| MutationError::NodeNotFound(source_node_id.to_string()))?;

        if let Err(e) = insert_at(root, target_node_id, position, node.clone()) {
            restore(root, original, node);
            return Err(e);
        }
        Ok(source_node_id.to_string())
    }

    fn apply_duplicate(root: &mut ComponentNode, node_id: &str) -> Result<String, MutationError> {
        let original = find_node_by_id(root, node_id)
            .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
        let copy = clone_component_node(original, true);
        let id = copy.id.clone();
        insert_at(root, node_id, DropPosition::After, copy)?;
        Ok(id)
    }
}

/// Resolve a drop position to `(parent id, container, index)`
fn placement(
    root: &ComponentNode,
    target_node_id: &str,
    position: DropPosition,
) -> Result<(String, Container, usize), MutationError> {
    let target = find_node_by_id(root, target_node_id)
        .ok_or_else(|| MutationError::NodeNotFound(target_node_id.to_string()))?;

    match position {
        DropPosition::Inside => Ok((
            target.id.clone(),
            Container::Children,
            target.children.len(),
        )),
        DropPosition::Before | DropPosition::After => {
            let location = locate_node(root, target_node_id)
                .ok_or(MutationError::RootNode("given siblings"))?;
            let index = if position == DropPosition::After {
                location.index + 1
            } else {
                location.index
            };
            Ok((location.parent_id, location.container, index))
        }
    }
}

fn insert_at(
    root: &mut ComponentNode,
    target_node_id: &str,
    position: DropPosition,
    node: ComponentNode,
) -> Result<(), MutationError> {
    let (parent_id, container, index) = placement(root, target_node_id, position)?;
    let parent = find_node_by_id_mut(root, &parent_id)
        .ok_or_else(|| MutationError::NodeNotFound(parent_id.clone()))?;
    let list = parent
        .container_mut(&container)
        .ok_or_else(|| MutationError::NodeNotFound(parent_id.clone()))?;
    list.insert(index.min(list.len()), node);
    Ok(())
}

fn restore(root: &mut ComponentNode, location: NodeLocation, node: ComponentNode) {
    if let Some(parent) = find_node_by_id_mut(root, &location.parent_id) {
        if let Some(list) = parent.container_mut(&location.container) {
            list.insert(location.index.min(list.len()), node);
        }
    }
}
