//! Node resolution: schema tree to resolved render tree.
//!
//! Resolution is a pure function of the node, the registry, the load cache
//! and the prop transformers. It never fails: a missing registration, a
//! pending load and a failed load are all first-class resolved states.

use crate::cache::{ComponentCache, LoadState};
use lowcode_registry::{Component, ComponentImpl, ComponentRegistry, PropMapper};
use lowcode_schema::{get_default_props, ComponentNode, Props};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Everything resolution reads
pub struct ResolveContext<'a> {
    pub registry: &'a ComponentRegistry,
    pub cache: &'a ComponentCache,
    pub prop_transformers: &'a HashMap<String, PropMapper>,
}

#[derive(Clone)]
pub enum Resolution {
    Ready(Arc<dyn Component>),
    Missing,
    Loading { import_path: String },
    Failed { message: String },
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Ready(component) => f.debug_tuple("Ready").field(&component.name()).finish(),
            Resolution::Missing => f.write_str("Missing"),
            Resolution::Loading { import_path } => f
                .debug_struct("Loading")
                .field("import_path", import_path)
                .finish(),
            Resolution::Failed { message } => {
                f.debug_struct("Failed").field("message", message).finish()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedNode {
    pub node_id: String,
    pub component_type: String,
    /// Nesting depth, root = 0
    pub level: usize,
    /// Effective props after defaults and transformers
    pub props: Props,
    pub events: BTreeMap<String, String>,
    pub is_container: bool,
    /// Descriptor title, or the component type when unregistered
    pub title: String,
    pub resolution: Resolution,
    pub children: Vec<ResolvedNode>,
    /// Named-slot content in declaration order
    pub slots: Vec<(String, Vec<ResolvedNode>)>,
}

impl ResolvedNode {
    pub fn has_content(&self) -> bool {
        !self.children.is_empty() || self.slots.iter().any(|(_, nodes)| !nodes.is_empty())
    }

    /// Depth-first search by node id
    pub fn find(&self, node_id: &str) -> Option<&ResolvedNode> {
        if self.node_id == node_id {
            return Some(self);
        }
        self.children
            .iter()
            .chain(self.slots.iter().flat_map(|(_, nodes)| nodes.iter()))
            .find_map(|child| child.find(node_id))
    }

    /// Types whose dynamic implementation is still loading, in tree order
    pub fn loading_types(&self) -> Vec<String> {
        let mut types = Vec::new();
        self.collect_loading(&mut types);
        types
    }

    fn collect_loading(&self, types: &mut Vec<String>) {
        if matches!(self.resolution, Resolution::Loading { .. })
            && !types.contains(&self.component_type)
        {
            types.push(self.component_type.clone());
        }
        for child in &self.children {
            child.collect_loading(types);
        }
        for (_, nodes) in &self.slots {
            for node in nodes {
                node.collect_loading(types);
            }
        }
    }
}

/// Resolve `node` and its whole subtree, starting at depth `level`
pub fn resolve_tree(node: &ComponentNode, ctx: &ResolveContext<'_>, level: usize) -> ResolvedNode {
    let registration = ctx.registry.get_component(&node.component_type);

    let mut props = node.props.clone();
    let (resolution, is_container, title) = match &registration {
        None => (
            Resolution::Missing,
            false,
            node.component_type.clone(),
        ),
        Some(registration) => {
            if props.is_empty() {
                props = get_default_props(&registration.descriptor);
            }
            props = registration.map_props(props);

            let resolution = match &registration.implementation {
                ComponentImpl::BuiltIn(component) => Resolution::Ready(component.clone()),
                ComponentImpl::Dynamic { import_path, .. } => {
                    match ctx.cache.state(&node.component_type) {
                        Some(LoadState::Ready(component)) => Resolution::Ready(component.clone()),
                        Some(LoadState::Failed(message)) => Resolution::Failed {
                            message: message.clone(),
                        },
                        Some(LoadState::Pending) | None => Resolution::Loading {
                            import_path: import_path.clone(),
                        },
                    }
                }
            };

            (
                resolution,
                registration.descriptor.accepts_children(),
                registration.descriptor.display_title().to_string(),
            )
        }
    };

    if let Some(transformer) = ctx.prop_transformers.get(&node.component_type) {
        props = transformer(props);
    }

    ResolvedNode {
        node_id: node.id.clone(),
        component_type: node.component_type.clone(),
        level,
        props,
        events: node.events.clone(),
        is_container,
        title,
        resolution,
        children: node
            .children
            .iter()
            .map(|child| resolve_tree(child, ctx, level + 1))
            .collect(),
        slots: node
            .slots
            .iter()
            .map(|(name, nodes)| {
                (
                    name.to_string(),
                    nodes
                        .iter()
                        .map(|child| resolve_tree(child, ctx, level + 1))
                        .collect(),
                )
            })
            .collect(),
    }
}
