//! # Render Engine
//!
//! Turns `(PageSchema, ComponentRegistry, RenderOptions)` into a wrapped
//! [`VNode`] tree and owns the interaction model around it: selection, drag
//! classification, prop-edit intents and dynamic component loading.
//!
//! ## Single writer
//!
//! The engine owns a copy of the schema for rendering, but user gestures
//! never change it. Drops, removals and prop edits are emitted as
//! [`RenderEvent`]s; the owning document store applies them and hands the
//! result back through [`RenderEngine::set_schema`]. The only in-place edit
//! the engine makes is filling default props into nodes whose props are
//! empty, once per schema.
//!
//! ## Dynamic components
//!
//! Rendering never blocks. A dynamic registration that is not loaded yet
//! renders a loading placeholder and is queued in the [`ComponentCache`].
//! Hosts either drive the queue themselves ([`RenderEngine::pending_loads`]
//! and [`RenderEngine::complete_load`]) or, with the `async` feature, await
//! [`RenderEngine::load_pending`].
//!
//! ## Usage
//!
//! ```rust
//! use lowcode_registry::{builtins, ComponentRegistry};
//! use lowcode_render::{RenderEngine, RenderMode, RenderOptions};
//! use lowcode_schema::{ComponentNode, PageSchema};
//!
//! let mut registry = ComponentRegistry::new();
//! registry.register_many(builtins::builtin_registrations());
//!
//! let root = ComponentNode::new("container", "root")
//!     .with_child(ComponentNode::new("button", "ok"));
//! let schema = PageSchema::new("page-1", "Home", root);
//!
//! let mut engine = RenderEngine::new(schema, registry, RenderOptions::for_mode(RenderMode::Design));
//! let mut events = engine.subscribe();
//!
//! engine.select_component(Some("ok".to_string()));
//! let vnode = engine.render();
//!
//! assert!(vnode.has_class("component-wrapper"));
//! assert!(events.try_recv().is_ok());
//! ```

use crate::cache::ComponentCache;
use crate::drag::{classify_drop_position, is_position_allowed, DropBounds};
use crate::error::{RenderError, RenderResult};
use crate::events::{DragEvent, DragPhase, DropPosition, EventBus, RenderEvent};
use crate::options::{RenderMode, RenderOptions};
use crate::resolve::{resolve_tree, ResolveContext, ResolvedNode};
use crate::wrapper::{render_wrapped, WrapperContext, WrapperOverrides};
use lowcode_registry::{
    Component, ComponentImpl, ComponentRegistry, Registration, RegistryResult, VNode,
};
use lowcode_schema::{
    count_component_types, fill_defaults, find_node_by_id, get_default_props, walk_node,
    ComponentNode, MaterialDescriptor, PageSchema, Visitor,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

pub struct RenderEngine {
    schema: PageSchema,
    registry: ComponentRegistry,
    options: RenderOptions,
    selected_id: Option<String>,
    cache: ComponentCache,
    events: EventBus,
    node_overrides: HashMap<String, WrapperOverrides>,
}

/// Outcome of one [`RenderEngine::load_pending`] round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Component types now ready
    pub loaded: Vec<String>,
    /// Component types that failed or timed out
    pub failed: Vec<String>,
    /// Ids of schema nodes whose rendering changed
    pub affected_nodes: Vec<String>,
}

impl RenderEngine {
    pub fn new(schema: PageSchema, registry: ComponentRegistry, options: RenderOptions) -> Self {
        let mut engine = Self {
            schema,
            registry,
            options,
            selected_id: None,
            cache: ComponentCache::new(),
            events: EventBus::new(),
            node_overrides: HashMap::new(),
        };
        engine.fill_schema_defaults();
        engine
    }

    pub fn from_json(
        json: &str,
        registry: ComponentRegistry,
        options: RenderOptions,
    ) -> RenderResult<Self> {
        let schema = PageSchema::from_json(json)?;
        Ok(Self::new(schema, registry, options))
    }

    pub fn schema(&self) -> &PageSchema {
        &self.schema
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Registry access for late registrations.
    ///
    /// The dynamic load cache is dropped, since a type may be re-registered
    /// with a different import path. Dynamic types load again on the next
    /// render.
    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        self.cache.clear();
        &mut self.registry
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn mode(&self) -> RenderMode {
        self.options.mode
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<RenderEvent> {
        self.events.subscribe()
    }

    /// Replace the schema (typically with the store's latest version).
    ///
    /// Default props are filled in before anything renders. A selection
    /// pointing at a node that no longer exists is kept; the store decides
    /// when to clear it.
    pub fn set_schema(&mut self, schema: PageSchema) {
        self.schema = schema;
        self.fill_schema_defaults();
        debug!(schema_id = %self.schema.id, "Schema replaced");
        self.events.emit(RenderEvent::SchemaChange {
            schema: Box::new(self.schema.clone()),
        });
    }

    /// Switch render mode. Only capability flags change, never the schema.
    pub fn set_mode(&mut self, mode: RenderMode) {
        if self.options.mode != mode {
            info!(from = %self.options.mode, to = %mode, "Render mode changed");
        }
        self.options.set_mode(mode);
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    pub fn set_node_overrides(&mut self, node_id: impl Into<String>, overrides: WrapperOverrides) {
        self.node_overrides.insert(node_id.into(), overrides);
    }

    pub fn clear_node_overrides(&mut self, node_id: &str) {
        self.node_overrides.remove(node_id);
    }

    fn fill_schema_defaults(&mut self) {
        let registry = &self.registry;
        let filled = fill_defaults(&mut self.schema.root, |component_type| {
            registry
                .get_component(component_type)
                .map(|registration| get_default_props(&registration.descriptor))
        });
        if filled > 0 {
            debug!(nodes = filled, "Filled default props");
        }
    }

    /// Set the selected node, or clear it with `None`. Always notifies.
    pub fn select_component(&mut self, node_id: Option<String>) {
        self.selected_id = node_id.clone();
        self.events
            .emit(RenderEvent::ComponentSelected { node_id });
    }

    /// Selection gesture from the canvas. Ignored unless the options allow
    /// selecting; returns whether the selection was made.
    pub fn click_component(&mut self, node_id: Option<String>) -> bool {
        if !self.options.selectable {
            debug!(mode = %self.options.mode, "Canvas selection ignored");
            return false;
        }
        self.select_component(node_id);
        true
    }

    fn is_container(&self, node_id: &str) -> Option<bool> {
        let node = find_node_by_id(&self.schema.root, node_id)?;
        Some(
            self.registry
                .get_component(&node.component_type)
                .map_or(false, |registration| registration.descriptor.accepts_children()),
        )
    }

    /// Classify a pointer position over `target_id`. `None` for unknown targets.
    pub fn classify_drop(
        &self,
        target_id: &str,
        pointer_y: f64,
        top: f64,
        height: f64,
    ) -> Option<DropPosition> {
        let is_container = self.is_container(target_id)?;
        Some(classify_drop_position(
            pointer_y,
            DropBounds::new(top, height),
            is_container,
        ))
    }

    /// Forward a drag gesture and, on completion, emit the structural intent
    /// it describes. Returns that intent, if any.
    ///
    /// Nothing is emitted unless the options allow dragging.
    pub fn handle_drag_event(&mut self, event: DragEvent) -> Option<RenderEvent> {
        if !self.options.draggable {
            debug!(mode = %self.options.mode, phase = ?event.phase, "Drag ignored");
            return None;
        }

        match event.phase {
            DragPhase::Start => {
                self.events.emit(RenderEvent::DragStart(event));
                return None;
            }
            DragPhase::Over => {
                self.events.emit(RenderEvent::DragOver(event));
                return None;
            }
            DragPhase::End | DragPhase::Drop => {
                self.events.emit(RenderEvent::DragEnd(event.clone()));
            }
        }

        let position = event.position?;
        if event.target_node_id.is_empty() {
            return None;
        }

        match self.is_container(&event.target_node_id) {
            None => {
                warn!(target_node_id = %event.target_node_id, "Drop on unknown node ignored");
                return None;
            }
            Some(is_container) if !is_position_allowed(position, is_container) => {
                warn!(
                    target_node_id = %event.target_node_id,
                    "Drop inside a non-container ignored"
                );
                return None;
            }
            Some(_) => {}
        }

        let intent = if event.is_from_panel() {
            if event.source_component_type.is_empty() {
                return None;
            }
            RenderEvent::ComponentAdded {
                source_component_type: event.source_component_type,
                target_node_id: event.target_node_id,
                position,
            }
        } else {
            if event.source_node_id == event.target_node_id {
                return None;
            }
            RenderEvent::ComponentMoved {
                source_node_id: event.source_node_id,
                target_node_id: event.target_node_id,
                position,
            }
        };

        self.events.emit(intent.clone());
        Some(intent)
    }

    /// Report a property edit. The schema is not touched.
    ///
    /// Refused (returns `false`) unless the options allow editing.
    pub fn handle_prop_change(
        &mut self,
        node_id: impl Into<String>,
        prop_name: impl Into<String>,
        prop_value: Value,
    ) -> bool {
        let node_id = node_id.into();
        if !self.options.editable {
            debug!(node_id = %node_id, mode = %self.options.mode, "Prop edit refused");
            return false;
        }
        self.events.emit(RenderEvent::PropChange {
            node_id,
            prop_name: prop_name.into(),
            prop_value,
        });
        true
    }

    /// Ask the store to remove a node. The root and unknown ids are refused,
    /// as is everything when the options do not allow editing.
    pub fn remove_component(&mut self, node_id: &str) -> bool {
        if !self.options.editable {
            debug!(node_id = %node_id, mode = %self.options.mode, "Removal refused");
            return false;
        }
        if node_id == self.schema.root.id || find_node_by_id(&self.schema.root, node_id).is_none() {
            return false;
        }
        self.events.emit(RenderEvent::ComponentRemoved {
            node_id: node_id.to_string(),
        });
        true
    }

    /// Register every type in `options.component_map` that the schema uses
    /// and the registry does not know. Returns how many were registered.
    pub fn auto_register(&mut self) -> usize {
        let mut registered = 0;
        for component_type in count_component_types(&self.schema.root).keys() {
            if self.registry.contains(component_type) {
                continue;
            }
            let Some(component) = self.options.component_map.get(component_type) else {
                continue;
            };

            let descriptor = MaterialDescriptor::new(component_type.clone(), component_type.clone());
            match self
                .registry
                .register(Registration::builtin(descriptor, component.clone()))
            {
                Ok(()) => registered += 1,
                Err(e) => warn!(component_type = %component_type, error = %e, "Auto-registration failed"),
            }
        }

        if registered > 0 {
            info!(count = registered, "Auto-registered components");
            self.fill_schema_defaults();
        }
        registered
    }

    /// Route a runtime event raised by a rendered component to its handler.
    ///
    /// Returns `Ok(false)` when the node declares no handler for the event or
    /// the declared handler is not configured.
    pub fn dispatch_component_event(
        &self,
        node_id: &str,
        event_name: &str,
        payload: &Value,
    ) -> RenderResult<bool> {
        let node = find_node_by_id(&self.schema.root, node_id)
            .ok_or_else(|| RenderError::NodeNotFound(node_id.to_string()))?;

        let Some(handler_ref) = node.events.get(event_name) else {
            return Ok(false);
        };
        match self.options.event_handlers.get(handler_ref) {
            Some(handler) => {
                debug!(node_id = %node_id, event = %event_name, handler = %handler_ref, "Dispatching component event");
                handler(node_id, payload);
                Ok(true)
            }
            None => {
                warn!(node_id = %node_id, handler = %handler_ref, "No event handler configured");
                Ok(false)
            }
        }
    }

    /// Resolve the whole schema. Dynamic types seen for the first time are
    /// queued for loading.
    pub fn resolve(&mut self) -> ResolvedNode {
        let resolved = {
            let ctx = ResolveContext {
                registry: &self.registry,
                cache: &self.cache,
                prop_transformers: &self.options.prop_transformers,
            };
            resolve_tree(&self.schema.root, &ctx, 0)
        };

        for component_type in resolved.loading_types() {
            self.cache.request(&component_type);
        }
        resolved
    }

    /// Render the wrapped tree for the current mode and selection
    pub fn render(&mut self) -> VNode {
        let resolved = self.resolve();
        let ctx = WrapperContext {
            options: &self.options,
            selected_id: self.selected_id.as_deref(),
            overrides: &self.node_overrides,
        };
        render_wrapped(&resolved, &ctx)
    }

    /// Queued dynamic loads as `(component type, import path)`
    pub fn pending_loads(&self) -> Vec<(String, String)> {
        self.cache
            .pending_types()
            .into_iter()
            .filter_map(|component_type| {
                let registration = self.registry.get_component(&component_type)?;
                match &registration.implementation {
                    ComponentImpl::Dynamic { import_path, .. } => {
                        Some((component_type, import_path.clone()))
                    }
                    ComponentImpl::BuiltIn(_) => None,
                }
            })
            .collect()
    }

    /// Record the outcome of a load the host performed itself
    pub fn complete_load(
        &mut self,
        component_type: &str,
        result: RegistryResult<Arc<dyn Component>>,
    ) -> bool {
        self.cache.complete(component_type, result)
    }

    /// Ids of nodes currently using one of `types`
    fn nodes_of_types(&self, types: &[String]) -> Vec<String> {
        struct TypeMatcher<'a> {
            types: &'a [String],
            ids: Vec<String>,
        }

        impl Visitor for TypeMatcher<'_> {
            fn visit_node(&mut self, node: &ComponentNode) {
                if self.types.contains(&node.component_type) {
                    self.ids.push(node.id.clone());
                }
                walk_node(self, node);
            }
        }

        let mut matcher = TypeMatcher {
            types,
            ids: Vec::new(),
        };
        matcher.visit_node(&self.schema.root);
        matcher.ids
    }

    /// Drive every queued dynamic load concurrently, each bounded by
    /// `options.load_timeout_ms`.
    #[cfg(feature = "async")]
    pub async fn load_pending(&mut self) -> LoadReport {
        use futures::future::join_all;

        let timeout = self.options.load_timeout();
        let mut loads = Vec::new();
        for (component_type, import_path) in self.pending_loads() {
            let Some(registration) = self.registry.get_component(&component_type) else {
                continue;
            };
            if let ComponentImpl::Dynamic { loader, .. } = &registration.implementation {
                let future = loader.load(&import_path);
                loads.push(async move {
                    let outcome = tokio::time::timeout(timeout, future).await;
                    (component_type, import_path, outcome)
                });
            }
        }

        let mut report = LoadReport::default();
        for (component_type, import_path, outcome) in join_all(loads).await {
            match outcome {
                Ok(result) => {
                    let ok = result.is_ok();
                    if self.cache.complete(&component_type, result) {
                        if ok {
                            report.loaded.push(component_type);
                        } else {
                            report.failed.push(component_type);
                        }
                    }
                }
                Err(_) => {
                    let message = format!(
                        "loading '{}' timed out after {} ms",
                        import_path, self.options.load_timeout_ms
                    );
                    if self.cache.fail(&component_type, message) {
                        report.failed.push(component_type);
                    }
                }
            }
        }

        let settled: Vec<String> = report
            .loaded
            .iter()
            .chain(report.failed.iter())
            .cloned()
            .collect();
        report.affected_nodes = self.nodes_of_types(&settled);

        info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            nodes = report.affected_nodes.len(),
            "Dynamic loads settled"
        );
        report
    }
}

impl std::fmt::Debug for RenderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderEngine")
            .field("schema_id", &self.schema.id)
            .field("mode", &self.options.mode)
            .field("selected_id", &self.selected_id)
            .field("registered", &self.registry.len())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
