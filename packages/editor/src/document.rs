//! # Page Document
//!
//! The single writer of a page schema.
//!
//! Canvas gestures and property edits arrive as render events or explicit
//! [`Mutation`]s; the document validates them against the material catalog,
//! applies them and bumps its version. Consumers re-render from
//! [`PageDocument::schema`].
//!
//! A document is memory-backed or file-backed:
//!
//! ```text
//! load(path) ─▶ apply / apply_event ─▶ export_json / save
//!                       │
//!                 reindex + touch
//! ```

use crate::errors::{EditorError, EditorResult};
use crate::mutations::Mutation;
use crate::nesting::Catalog;
use lowcode_render::RenderEvent;
use lowcode_schema::{
    reindex, validate_schema, ComponentNode, ImportReport, MaterialDescriptor, PageSchema, Props,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of an applied mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationResult {
    /// Document version after the mutation
    pub version: u64,
    /// Node created, moved or edited
    pub node_id: String,
}

/// Editable page document
#[derive(Debug)]
pub struct PageDocument {
    /// Backing file, if any
    pub path: Option<PathBuf>,

    /// Incremented by every applied mutation and import
    pub version: u64,

    schema: PageSchema,
    catalog: Catalog,
    dirty: bool,
}

/// Structural issues of a schema as it was received, before any reindexing
/// rewrites its slot markers.
fn check_structure(schema: &PageSchema) -> EditorResult<()> {
    let issues = validate_schema(&schema.root);
    if issues.is_empty() {
        return Ok(());
    }
    let message = issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    Err(EditorError::InvalidSchema(message))
}

impl PageDocument {
    /// Memory-backed document over a trusted tree. Structural issues are
    /// logged, not rejected; use [`PageDocument::try_new`] for untrusted
    /// input.
    pub fn new(mut schema: PageSchema) -> Self {
        if let Err(e) = check_structure(&schema) {
            warn!(page = %schema.id, error = %e, "Document created over an invalid tree");
        }
        reindex(&mut schema.root);
        Self {
            path: None,
            version: 0,
            schema,
            catalog: Catalog::new(),
            dirty: false,
        }
    }

    /// Memory-backed document, refusing duplicate ids and misplaced slot
    /// content.
    pub fn try_new(schema: PageSchema) -> EditorResult<Self> {
        check_structure(&schema)?;
        Ok(Self::new(schema))
    }

    pub fn from_json(json: &str) -> EditorResult<Self> {
        Self::try_new(PageSchema::from_json(json)?)
    }

    /// File-backed document
    pub fn load(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let mut document = Self::from_json(&source)?;
        document.path = Some(path.to_path_buf());
        debug!(path = %path.display(), "Loaded page document");
        Ok(document)
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Add descriptors used for defaults and nesting checks
    pub fn register_descriptors(&mut self, descriptors: impl IntoIterator<Item = MaterialDescriptor>) {
        for descriptor in descriptors {
            self.catalog.insert(descriptor);
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn schema(&self) -> &PageSchema {
        &self.schema
    }

    pub fn root(&self) -> &ComponentNode {
        &self.schema.root
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Apply a mutation. A rejected mutation leaves the document untouched.
    pub fn apply(&mut self, mutation: Mutation) -> EditorResult<MutationResult> {
        let node_id = match mutation.apply(&mut self.schema.root, &self.catalog) {
            Ok(node_id) => node_id,
            Err(e) => {
                warn!(error = %e, "Mutation rejected");
                return Err(e.into());
            }
        };

        if mutation.is_structural() {
            reindex(&mut self.schema.root);
        }
        self.schema.touch();
        self.version += 1;
        self.dirty = true;

        debug!(version = self.version, node_id = %node_id, "Applied mutation");
        Ok(MutationResult {
            version: self.version,
            node_id,
        })
    }

    /// Apply the intent carried by a render event.
    ///
    /// Events that do not describe a schema change return `Ok(None)`.
    pub fn apply_event(&mut self, event: &RenderEvent) -> EditorResult<Option<MutationResult>> {
        let mutation = match event {
            RenderEvent::ComponentAdded {
                source_component_type,
                target_node_id,
                position,
            } => Mutation::AddComponent {
                component_type: source_component_type.clone(),
                target_node_id: target_node_id.clone(),
                position: *position,
                props: Props::new(),
            },
            RenderEvent::ComponentMoved {
                source_node_id,
                target_node_id,
                position,
            } => Mutation::MoveComponent {
                source_node_id: source_node_id.clone(),
                target_node_id: target_node_id.clone(),
                position: *position,
            },
            RenderEvent::ComponentRemoved { node_id } => Mutation::RemoveComponent {
                node_id: node_id.clone(),
            },
            RenderEvent::PropChange {
                node_id,
                prop_name,
                prop_value,
            } => Mutation::SetProp {
                node_id: node_id.clone(),
                prop_name: prop_name.clone(),
                prop_value: prop_value.clone(),
            },
            _ => return Ok(None),
        };

        self.apply(mutation).map(Some)
    }

    /// Replace the schema with serialized JSON. Invalid input leaves the
    /// document untouched.
    pub fn import_json(&mut self, json: &str) -> ImportReport {
        let mut schema = match PageSchema::from_json(json) {
            Ok(schema) => schema,
            Err(e) => {
                warn!(error = %e, "Import failed");
                return ImportReport::failed(format!("Import failed: {}", e));
            }
        };

        let issues = validate_schema(&schema.root);
        if let Some(issue) = issues.first() {
            warn!(issues = issues.len(), "Import rejected");
            return ImportReport::failed(format!("Import failed: {}", issue));
        }
        reindex(&mut schema.root);

        let name = schema.name.clone();
        self.schema = schema;
        self.version += 1;
        self.dirty = true;
        info!(page = %name, version = self.version, "Imported page schema");
        ImportReport::ok(format!("Imported page '{}'", name))
    }

    pub fn export_json(&self) -> EditorResult<String> {
        Ok(self.schema.to_json_pretty()?)
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> EditorResult<()> {
        let path = self.path.clone().ok_or(EditorError::NotFileBacked)?;
        self.save_as(path)
    }

    /// Save to `path` and make it the backing file
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> EditorResult<()> {
        let path = path.into();
        std::fs::write(&path, self.export_json()?)?;
        debug!(path = %path.display(), "Saved page document");
        self.path = Some(path);
        self.dirty = false;
        Ok(())
    }
}
