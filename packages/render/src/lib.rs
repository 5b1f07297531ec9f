//! # Lowcode Render
//!
//! Renders a page schema through the component registry and provides the
//! canvas interaction model.
//!
//! ## Pipeline
//!
//! ```text
//! PageSchema ──resolve──▶ ResolvedNode tree ──wrap──▶ VNode tree
//!                │                                   │
//!        ComponentRegistry                 RenderOptions + selection
//!        ComponentCache
//! ```
//!
//! - [`resolve`]: pure lookup of every node's implementation and effective
//!   props. Missing, loading and failed components are ordinary states.
//! - [`wrapper`]: editor affordances around each node.
//! - [`engine`]: owns the schema copy, selection, event bus and load cache.
//! - [`drag`]: pointer-to-drop-position classification.
//!
//! ## Features
//!
//! - `async`: [`RenderEngine::load_pending`], driving dynamic loads under a
//!   tokio timeout.

pub mod cache;
pub mod drag;
pub mod engine;
pub mod error;
pub mod events;
pub mod options;
pub mod resolve;
pub mod wrapper;

pub use cache::{ComponentCache, LoadState};
pub use drag::{classify_drop_position, is_position_allowed, DropBounds};
pub use engine::{LoadReport, RenderEngine};
pub use error::{RenderError, RenderResult};
pub use events::{DragEvent, DragPhase, DropPosition, EventBus, RenderEvent};
pub use options::{EventHandler, RenderMode, RenderOptions, DEFAULT_LOAD_TIMEOUT_MS};
pub use resolve::{resolve_tree, Resolution, ResolveContext, ResolvedNode};
pub use wrapper::{render_wrapped, WrapperContext, WrapperFlags, WrapperOverrides};
