//! # Lowcode Schema
//!
//! Data model shared by every other crate in the workspace.
//!
//! ## Contents
//!
//! - **Page schema**: [`PageSchema`] and the recursive [`ComponentNode`] tree
//!   it owns. Serializes to plain JSON with no cycles.
//! - **Material descriptors**: [`MaterialDescriptor`] and its property, event
//!   and slot descriptions. Implementation agnostic.
//! - **Tree utilities**: id generation, node creation, cloning, lookup and
//!   removal over a [`ComponentNode`] tree.
//! - **Property helpers**: default-prop extraction and per-type value
//!   validation.
//!
//! ## Ownership
//!
//! The tree is single-writer. Read-only helpers take `&ComponentNode`;
//! the few in-place operations (`remove_node_by_id`, `reindex`) take
//! `&mut ComponentNode` and are only called by the editor's document store.
//!
//! ```rust
//! use lowcode_schema::{create_component_node, find_node_by_id, remove_node_by_id};
//! use serde_json::Map;
//!
//! let mut root = create_component_node("container", Map::new(), Some("root".to_string()));
//! let child = create_component_node("text", Map::new(), None);
//! let child_id = child.id.clone();
//! root.children.push(child);
//!
//! assert!(find_node_by_id(&root, &child_id).is_some());
//! assert!(remove_node_by_id(&mut root, &child_id));
//! assert!(find_node_by_id(&root, &child_id).is_none());
//! ```

pub mod descriptor;
pub mod error;
pub mod id;
pub mod node;
pub mod props;
pub mod tree;
pub mod validate;
pub mod visitor;

pub use descriptor::*;
pub use error::*;
pub use id::generate_id;
pub use node::*;
pub use props::{fill_defaults, get_default_props, validate_property_value, with_defaults};
pub use tree::*;
pub use validate::{validate_schema, SchemaIssue};
pub use visitor::*;
