//! Tree utilities over [`ComponentNode`].
//!
//! Search order everywhere is depth-first: `children` first, then each slot
//! in declaration order. Absence is reported as `None` / `false`, never as an
//! error.

use crate::id::generate_id;
use crate::node::{ComponentNode, Props};
use crate::visitor::{walk_node, Visitor};
use std::collections::BTreeMap;

/// Build a new node with no children. An id is generated when `id` is `None`.
pub fn create_component_node(
    component_type: impl Into<String>,
    props: Props,
    id: Option<String>,
) -> ComponentNode {
    let mut node = ComponentNode::new(component_type, id.unwrap_or_else(generate_id));
    node.props = props;
    node
}

/// Deep-clone a node with its children and slots.
///
/// With `generate_new_ids` every node of the copy gets a fresh id and loses
/// its position back-references (`parentId`, `index`, slot markers), since
/// the copy is about to be placed somewhere else. Without it the copy is
/// exact.
pub fn clone_component_node(node: &ComponentNode, generate_new_ids: bool) -> ComponentNode {
    if !generate_new_ids {
        return node.clone();
    }

    ComponentNode {
        id: generate_id(),
        component_type: node.component_type.clone(),
        props: node.props.clone(),
        events: node.events.clone(),
        children: node
            .children
            .iter()
            .map(|child| clone_component_node(child, true))
            .collect(),
        slots: node
            .slots
            .iter()
            .map(|(name, nodes)| {
                (
                    name.to_string(),
                    nodes.iter().map(|n| clone_component_node(n, true)).collect(),
                )
            })
            .collect(),
        parent_id: None,
        index: None,
        is_slot_content: false,
        slot_name: None,
    }
}

/// Find the first node with `id`, including `root` itself
pub fn find_node_by_id<'a>(root: &'a ComponentNode, id: &str) -> Option<&'a ComponentNode> {
    if root.id == id {
        return Some(root);
    }

    for child in &root.children {
        if let Some(found) = find_node_by_id(child, id) {
            return Some(found);
        }
    }

    for (_, nodes) in root.slots.iter() {
        for node in nodes {
            if let Some(found) = find_node_by_id(node, id) {
                return Some(found);
            }
        }
    }

    None
}

/// Mutable variant of [`find_node_by_id`]
pub fn find_node_by_id_mut<'a>(
    root: &'a mut ComponentNode,
    id: &str,
) -> Option<&'a mut ComponentNode> {
    let path = path_to(root, id)?;

    let mut current = root;
    for step in path {
        current = match step {
            Step::Child(index) => current.children.get_mut(index)?,
            Step::Slot(slot, index) => current.slots.nth_mut(slot)?.get_mut(index)?,
        };
    }
    Some(current)
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Child(usize),
    Slot(usize, usize),
}

fn path_to(root: &ComponentNode, id: &str) -> Option<Vec<Step>> {
    if root.id == id {
        return Some(Vec::new());
    }

    for (index, child) in root.children.iter().enumerate() {
        if let Some(mut path) = path_to(child, id) {
            path.insert(0, Step::Child(index));
            return Some(path);
        }
    }

    for (slot, (_, nodes)) in root.slots.iter().enumerate() {
        for (index, node) in nodes.iter().enumerate() {
            if let Some(mut path) = path_to(node, id) {
                path.insert(0, Step::Slot(slot, index));
                return Some(path);
            }
        }
    }

    None
}

/// Remove the node with `id` from anywhere below `root`.
///
/// Returns `false` when no such node exists. The root itself is never
/// removed; callers reject that case before calling.
pub fn remove_node_by_id(root: &mut ComponentNode, id: &str) -> bool {
    take_node_by_id(root, id).is_some()
}

/// Detach the node with `id` from below `root` and hand it back
pub fn take_node_by_id(root: &mut ComponentNode, id: &str) -> Option<ComponentNode> {
    if let Some(position) = root.children.iter().position(|c| c.id == id) {
        return Some(root.children.remove(position));
    }

    for child in &mut root.children {
        if let Some(removed) = take_node_by_id(child, id) {
            return Some(removed);
        }
    }

    for (_, nodes) in root.slots.iter_mut() {
        if let Some(position) = nodes.iter().position(|n| n.id == id) {
            return Some(nodes.remove(position));
        }

        for node in nodes.iter_mut() {
            if let Some(removed) = take_node_by_id(node, id) {
                return Some(removed);
            }
        }
    }

    None
}

/// Which list of its parent a node lives in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container {
    Children,
    Slot(String),
}

/// Position of a non-root node in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLocation {
    pub parent_id: String,
    pub container: Container,
    pub index: usize,
}

/// Locate the parent list and index of `id`. `None` for the root or a missing id.
pub fn locate_node(root: &ComponentNode, id: &str) -> Option<NodeLocation> {
    if let Some(index) = root.children.iter().position(|c| c.id == id) {
        return Some(NodeLocation {
            parent_id: root.id.clone(),
            container: Container::Children,
            index,
        });
    }

    for child in &root.children {
        if let Some(location) = locate_node(child, id) {
            return Some(location);
        }
    }

    for (name, nodes) in root.slots.iter() {
        if let Some(index) = nodes.iter().position(|n| n.id == id) {
            return Some(NodeLocation {
                parent_id: root.id.clone(),
                container: Container::Slot(name.to_string()),
                index,
            });
        }

        for node in nodes {
            if let Some(location) = locate_node(node, id) {
                return Some(location);
            }
        }
    }

    None
}

impl ComponentNode {
    /// The node list addressed by `container`, if present
    pub fn container(&self, container: &Container) -> Option<&Vec<ComponentNode>> {
        match container {
            Container::Children => Some(&self.children),
            Container::Slot(name) => self.slots.get(name),
        }
    }

    pub fn container_mut(&mut self, container: &Container) -> Option<&mut Vec<ComponentNode>> {
        match container {
            Container::Children => Some(&mut self.children),
            Container::Slot(name) => self.slots.get_mut(name),
        }
    }
}

pub fn contains_node(root: &ComponentNode, id: &str) -> bool {
    find_node_by_id(root, id).is_some()
}

/// Whether `id` lies strictly inside the subtree rooted at `ancestor_id`
pub fn is_descendant(root: &ComponentNode, ancestor_id: &str, id: &str) -> bool {
    match find_node_by_id(root, ancestor_id) {
        Some(ancestor) => ancestor.id != id && contains_node(ancestor, id),
        None => false,
    }
}

/// Every id in the tree, in search order
pub fn collect_ids(root: &ComponentNode) -> Vec<String> {
    struct IdCollector(Vec<String>);

    impl Visitor for IdCollector {
        fn visit_node(&mut self, node: &ComponentNode) {
            self.0.push(node.id.clone());
            walk_node(self, node);
        }
    }

    let mut collector = IdCollector(Vec::new());
    collector.visit_node(root);
    collector.0
}

/// Number of occurrences of each component type in the tree
pub fn count_component_types(root: &ComponentNode) -> BTreeMap<String, usize> {
    struct TypeCounter(BTreeMap<String, usize>);

    impl Visitor for TypeCounter {
        fn visit_node(&mut self, node: &ComponentNode) {
            *self.0.entry(node.component_type.clone()).or_insert(0) += 1;
            walk_node(self, node);
        }
    }

    let mut counter = TypeCounter(BTreeMap::new());
    counter.visit_node(root);
    counter.0
}

/// Component types of the ancestors of `id`, nearest first.
///
/// `None` when `id` is not in the tree; an empty list for the root.
pub fn ancestor_types(root: &ComponentNode, id: &str) -> Option<Vec<String>> {
    let path = path_to(root, id)?;

    let mut types = Vec::with_capacity(path.len());
    let mut current = root;
    for step in path {
        types.push(current.component_type.clone());
        current = match step {
            Step::Child(index) => &current.children[index],
            Step::Slot(slot, index) => &current.slots.nth(slot)?[index],
        };
    }
    types.reverse();
    Some(types)
}

/// Recompute `parentId`, `index`, `isSlotContent` and `slotName` for the whole tree
pub fn reindex(root: &mut ComponentNode) {
    root.parent_id = None;
    root.index = None;
    root.is_slot_content = false;
    root.slot_name = None;
    reindex_children(root);
}

fn reindex_children(node: &mut ComponentNode) {
    let parent_id = node.id.clone();

    for (index, child) in node.children.iter_mut().enumerate() {
        child.parent_id = Some(parent_id.clone());
        child.index = Some(index);
        child.is_slot_content = false;
        child.slot_name = None;
        reindex_children(child);
    }

    for (name, nodes) in node.slots.iter_mut() {
        for (index, child) in nodes.iter_mut().enumerate() {
            child.parent_id = Some(parent_id.clone());
            child.index = Some(index);
            child.is_slot_content = true;
            child.slot_name = Some(name.to_string());
            reindex_children(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn sample_tree() -> ComponentNode {
        ComponentNode::new("container", "root")
            .with_child(
                ComponentNode::new("container", "a")
                    .with_child(ComponentNode::new("text", "a1"))
                    .with_child(ComponentNode::new("text", "a2")),
            )
            .with_child(ComponentNode::new("button", "b").with_prop("text", "Go"))
            .with_slot_child(
                "footer",
                ComponentNode::new("card", "c")
                    .with_slot_child("header", ComponentNode::new("text", "c-h")),
            )
    }

    #[test]
    fn test_create_generates_id_when_missing() {
        let node = create_component_node("text", Props::new(), None);
        assert!(node.id.starts_with("node_"));
        assert!(node.children.is_empty());

        let node = create_component_node("text", Props::new(), Some("fixed".to_string()));
        assert_eq!(node.id, "fixed");
    }

    #[test]
    fn test_find_in_children_and_slots() {
        let root = sample_tree();
        assert_eq!(find_node_by_id(&root, "root").unwrap().id, "root");
        assert_eq!(find_node_by_id(&root, "a2").unwrap().component_type, "text");
        assert_eq!(find_node_by_id(&root, "c-h").unwrap().id, "c-h");
        assert!(find_node_by_id(&root, "missing").is_none());
    }

    #[test]
    fn test_find_terminates_on_empty_tree() {
        let root = ComponentNode::new("container", "only");
        assert!(find_node_by_id(&root, "x").is_none());
    }

    #[test]
    fn test_find_mut_edits_in_place() {
        let mut root = sample_tree();
        find_node_by_id_mut(&mut root, "c-h")
            .unwrap()
            .props
            .insert("content".to_string(), json!("Title"));

        assert_eq!(
            find_node_by_id(&root, "c-h").unwrap().props["content"],
            json!("Title")
        );
        assert!(find_node_by_id_mut(&mut root, "nope").is_none());
    }

    #[test]
    fn test_remove_then_remove_again() {
        let mut root = sample_tree();
        assert!(remove_node_by_id(&mut root, "a1"));
        assert!(find_node_by_id(&root, "a1").is_none());
        assert!(!remove_node_by_id(&mut root, "a1"));

        assert!(remove_node_by_id(&mut root, "c-h"));
        assert!(find_node_by_id(&root, "c").is_some());
        assert!(find_node_by_id(&root, "c-h").is_none());
    }

    #[test]
    fn test_remove_does_not_touch_root() {
        let mut root = sample_tree();
        assert!(!remove_node_by_id(&mut root, "root"));
        assert_eq!(root.id, "root");
    }

    #[test]
    fn test_take_returns_subtree() {
        let mut root = sample_tree();
        let taken = take_node_by_id(&mut root, "a").unwrap();
        assert_eq!(taken.children.len(), 2);
        assert!(find_node_by_id(&root, "a2").is_none());
    }

    #[test]
    fn test_clone_with_new_ids_is_unique() {
        let root = sample_tree();
        let copy = clone_component_node(&root, true);

        let original: HashSet<String> = collect_ids(&root).into_iter().collect();
        let copied = collect_ids(&copy);
        let unique: HashSet<&String> = copied.iter().collect();

        assert_eq!(copied.len(), original.len());
        assert_eq!(unique.len(), copied.len());
        assert!(copied.iter().all(|id| !original.contains(id)));
        assert_eq!(
            find_node_by_id(&copy, &copy.children[1].id).unwrap().props["text"],
            json!("Go")
        );
        assert_eq!(copy.slots.names().collect::<Vec<_>>(), vec!["footer"]);
    }

    #[test]
    fn test_clone_keeping_ids_is_exact() {
        let mut root = sample_tree();
        reindex(&mut root);
        assert_eq!(clone_component_node(&root, false), root);
    }

    #[test]
    fn test_locate_node() {
        let root = sample_tree();
        assert_eq!(
            locate_node(&root, "a2"),
            Some(NodeLocation {
                parent_id: "a".to_string(),
                container: Container::Children,
                index: 1,
            })
        );
        assert_eq!(
            locate_node(&root, "c").unwrap().container,
            Container::Slot("footer".to_string())
        );
        assert!(locate_node(&root, "root").is_none());
        assert!(locate_node(&root, "zzz").is_none());
    }

    #[test]
    fn test_ancestor_types() {
        let root = sample_tree();
        assert_eq!(
            ancestor_types(&root, "c-h").unwrap(),
            vec!["card".to_string(), "container".to_string()]
        );
        assert_eq!(ancestor_types(&root, "root").unwrap(), Vec::<String>::new());
        assert!(ancestor_types(&root, "zzz").is_none());
    }

    #[test]
    fn test_is_descendant() {
        let root = sample_tree();
        assert!(is_descendant(&root, "a", "a2"));
        assert!(is_descendant(&root, "root", "c-h"));
        assert!(!is_descendant(&root, "a", "a"));
        assert!(!is_descendant(&root, "a", "b"));
        assert!(!is_descendant(&root, "zzz", "a"));
    }

    #[test]
    fn test_reindex_sets_back_references() {
        let mut root = sample_tree();
        reindex(&mut root);

        let a2 = find_node_by_id(&root, "a2").unwrap();
        assert_eq!(a2.parent_id.as_deref(), Some("a"));
        assert_eq!(a2.index, Some(1));
        assert!(!a2.is_slot_content);

        let c = find_node_by_id(&root, "c").unwrap();
        assert!(c.is_slot_content);
        assert_eq!(c.slot_name.as_deref(), Some("footer"));
        assert_eq!(c.parent_id.as_deref(), Some("root"));
    }

    #[test]
    fn test_count_component_types() {
        let counts = count_component_types(&sample_tree());
        assert_eq!(counts["text"], 3);
        assert_eq!(counts["container"], 2);
        assert_eq!(counts["card"], 1);
    }
}
