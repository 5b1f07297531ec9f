//! # Lowcode Material
//!
//! Catalogue of component types ("materials") available to the editor.
//!
//! - [`MaterialStore`]: descriptors keyed by type, insertion ordered
//! - [`loader`]: bulk loading from iterators and `*.material.json` files
//! - [`AssetBundle`]: distributable material library with packages and
//!   palette sort lists
//!
//! ```rust
//! use lowcode_material::MaterialStore;
//! use lowcode_schema::MaterialDescriptor;
//!
//! let mut store = MaterialStore::new();
//! store.collect(MaterialDescriptor::new("btn", "button").with_group("basic"));
//!
//! assert!(store.get_by_type("button").is_some());
//! assert_eq!(store.get_by_group("basic").len(), 1);
//! ```

pub mod assets;
pub mod error;
pub mod loader;
pub mod store;

pub use assets::*;
pub use error::*;
pub use loader::{load_dir, load_materials, LoadSummary};
pub use store::*;
