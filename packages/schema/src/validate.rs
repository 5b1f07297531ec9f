//! Structural checks over a page tree.

use crate::node::ComponentNode;
use crate::visitor::{walk_node, Visitor};
use std::collections::HashSet;
use std::fmt;

/// A structural problem found in a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaIssue {
    DuplicateId { id: String },
    EmptyId { component_type: String },
    EmptyComponentType { id: String },
    EmptySlotName { owner_id: String },
    /// Slot markers on a node disagree with the list it actually sits in
    MisplacedSlotContent { id: String, slot_name: Option<String> },
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaIssue::DuplicateId { id } => write!(f, "duplicate node id '{}'", id),
            SchemaIssue::EmptyId { component_type } => {
                write!(f, "node of type '{}' has an empty id", component_type)
            }
            SchemaIssue::EmptyComponentType { id } => {
                write!(f, "node '{}' has no component type", id)
            }
            SchemaIssue::EmptySlotName { owner_id } => {
                write!(f, "node '{}' has a slot with an empty name", owner_id)
            }
            SchemaIssue::MisplacedSlotContent { id, slot_name } => match slot_name {
                Some(slot) => write!(f, "node '{}' is marked as content of slot '{}'", id, slot),
                None => write!(f, "node '{}' is marked as slot content outside a slot", id),
            },
        }
    }
}

/// Collect every structural issue in the tree rooted at `root`
pub fn validate_schema(root: &ComponentNode) -> Vec<SchemaIssue> {
    struct Checker {
        seen: HashSet<String>,
        issues: Vec<SchemaIssue>,
    }

    impl Visitor for Checker {
        fn visit_node(&mut self, node: &ComponentNode) {
            if node.id.is_empty() {
                self.issues.push(SchemaIssue::EmptyId {
                    component_type: node.component_type.clone(),
                });
            } else if !self.seen.insert(node.id.clone()) {
                self.issues.push(SchemaIssue::DuplicateId {
                    id: node.id.clone(),
                });
            }

            if node.component_type.trim().is_empty() {
                self.issues.push(SchemaIssue::EmptyComponentType {
                    id: node.id.clone(),
                });
            }

            for child in &node.children {
                if child.is_slot_content || child.slot_name.is_some() {
                    self.issues.push(SchemaIssue::MisplacedSlotContent {
                        id: child.id.clone(),
                        slot_name: child.slot_name.clone(),
                    });
                }
            }

            walk_node(self, node);
        }

        fn visit_slot(&mut self, owner: &ComponentNode, name: &str, nodes: &[ComponentNode]) {
            if name.is_empty() {
                self.issues.push(SchemaIssue::EmptySlotName {
                    owner_id: owner.id.clone(),
                });
            }
            for node in nodes {
                if let Some(slot_name) = &node.slot_name {
                    if slot_name != name {
                        self.issues.push(SchemaIssue::MisplacedSlotContent {
                            id: node.id.clone(),
                            slot_name: Some(slot_name.clone()),
                        });
                    }
                }
                self.visit_node(node);
            }
        }
    }

    let mut checker = Checker {
        seen: HashSet::new(),
        issues: Vec::new(),
    };
    checker.visit_node(root);
    checker.issues
}
