//! # Lowcode Editor
//!
//! Document store for page schemas.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ render: canvas gestures → RenderEvent       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: PageDocument + mutations            │
//! │  - Map intents to mutations                 │
//! │  - Enforce nesting rules and slot lists     │
//! │  - Apply, reindex, version                  │
//! │  - Import / export / save                   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ render: set_schema → re-render              │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Single writer**: only the document changes the schema
//! 2. **Validate, then apply**: rejected mutations leave no trace
//! 3. **Declarative nesting**: rules come from material descriptors
//!
//! ## Usage
//!
//! ```rust
//! use lowcode_editor::{Mutation, PageDocument};
//! use lowcode_render::DropPosition;
//! use lowcode_schema::{ComponentNode, MaterialDescriptor, PageSchema, Props};
//!
//! let root = ComponentNode::new("container", "root");
//! let mut doc = PageDocument::new(PageSchema::new("page", "Page", root));
//! doc.register_descriptors([MaterialDescriptor::new("container", "container").container()]);
//!
//! let added = doc
//!     .apply(Mutation::AddComponent {
//!         component_type: "text".to_string(),
//!         target_node_id: "root".to_string(),
//!         position: DropPosition::Inside,
//!         props: Props::new(),
//!     })
//!     .unwrap();
//! assert_eq!(added.version, 1);
//! ```

mod document;
mod errors;
mod mutations;
mod nesting;

pub use document::{MutationResult, PageDocument};
pub use errors::{EditorError, EditorResult};
pub use mutations::{Mutation, MutationError};
pub use nesting::Catalog;
