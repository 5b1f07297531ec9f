//! # Lowcode Registry
//!
//! Binds component types to renderable implementations.
//!
//! - [`ComponentRegistry`]: dual-keyed (id and type) registration table
//! - [`Component`] / [`ComponentLoader`]: synchronous implementations and
//!   asynchronous factories for dynamically imported ones
//! - [`VNode`]: render tree produced by components
//! - [`builtins`]: framework primitives (`container`, `form`, `input`,
//!   `text`, `button`)
//!
//! Dynamic loads are not cached here; the render layer owns that cache.

pub mod builtins;
pub mod component;
pub mod error;
pub mod registry;
pub mod vdom;

pub use component::*;
pub use error::*;
pub use registry::*;
pub use vdom::VNode;
