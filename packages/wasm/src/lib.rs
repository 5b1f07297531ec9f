//! Browser canvas bindings.
//!
//! A [`Canvas`] owns a render engine and the page document it edits. The host
//! page feeds it gestures and edits as JSON; structural intents coming out of
//! the engine are applied to the document and the new schema is pushed back
//! into the engine before the host re-renders.

use lowcode_editor::PageDocument;
use lowcode_material::MaterialStore;
use lowcode_registry::builtins::{builtin_components, builtin_registrations};
use lowcode_registry::ComponentRegistry;
use lowcode_render::{DragEvent, RenderEngine, RenderEvent, RenderMode, RenderOptions};
use lowcode_schema::{find_node_by_id, MaterialDescriptor};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

#[wasm_bindgen]
pub struct Canvas {
    engine: RenderEngine,
    document: PageDocument,
    events: UnboundedReceiver<RenderEvent>,
}

impl Canvas {
    fn create(schema_json: &str, mode: Option<String>) -> Result<Self, String> {
        let mode = match mode {
            Some(name) => name.parse::<RenderMode>()?,
            None => RenderMode::Design,
        };

        let document = PageDocument::from_json(schema_json).map_err(|e| e.to_string())?;
        let mut registry = ComponentRegistry::new();
        registry.register_many(builtin_registrations());

        let mut canvas = Self::from_parts(document, registry, RenderOptions::for_mode(mode));
        let descriptors: Vec<MaterialDescriptor> = canvas
            .engine
            .registry()
            .get_all_components()
            .iter()
            .map(|registration| registration.descriptor.clone())
            .collect();
        canvas.document.register_descriptors(descriptors);
        Ok(canvas)
    }

    fn from_parts(document: PageDocument, registry: ComponentRegistry, options: RenderOptions) -> Self {
        let mut engine = RenderEngine::new(document.schema().clone(), registry, options);
        let events = engine.subscribe();
        Self {
            engine,
            document,
            events,
        }
    }

    fn add_materials(&mut self, materials_json: &str) -> Result<usize, String> {
        let materials: Vec<MaterialDescriptor> =
            serde_json::from_str(materials_json).map_err(|e| e.to_string())?;

        let mut store = MaterialStore::new();
        for material in materials {
            store.collect(material);
        }

        // A material describing a built-in type replaces the built-in descriptor
        let registry = self.engine.registry_mut();
        for material in store.iter() {
            let replaced = registry
                .get_component(&material.type_name)
                .filter(|registration| !registration.is_dynamic())
                .map(|registration| registration.component_id().to_string());
            if let Some(component_id) = replaced {
                registry.unregister_component(&component_id);
            }
        }
        let summary = registry.bind_materials(&store, &builtin_components(), None);
        self.document.register_descriptors(store.get_all());
        self.engine.set_schema(self.document.schema().clone());
        Ok(summary.builtin + summary.dynamic)
    }

    /// Drain engine events, apply structural intents to the document and
    /// push the updated schema back. Returns every drained event.
    fn sync(&mut self) -> Vec<RenderEvent> {
        let mut drained = Vec::new();
        let mut changed = false;

        while let Ok(event) = self.events.try_recv() {
            match self.document.apply_event(&event) {
                Ok(Some(_)) => changed = true,
                Ok(None) => {}
                Err(e) => warn!(event = event.name(), error = %e, "Canvas intent rejected"),
            }
            drained.push(event);
        }

        if changed {
            self.engine.set_schema(self.document.schema().clone());
            let stale = self
                .engine
                .selected_id()
                .is_some_and(|id| find_node_by_id(self.document.root(), id).is_none());
            if stale {
                self.engine.select_component(None);
            }
            while let Ok(event) = self.events.try_recv() {
                drained.push(event);
            }
        }

        drained
    }

    fn sync_json(&mut self) -> Result<String, String> {
        serde_json::to_string(&self.sync()).map_err(|e| e.to_string())
    }

    fn drag_json(&mut self, event_json: &str) -> Result<String, String> {
        let event: DragEvent = serde_json::from_str(event_json).map_err(|e| e.to_string())?;
        self.engine.handle_drag_event(event);
        self.sync_json()
    }

    fn set_prop_json(&mut self, node_id: &str, prop_name: &str, value_json: &str) -> Result<String, String> {
        let value: Value = serde_json::from_str(value_json).map_err(|e| e.to_string())?;
        self.engine.handle_prop_change(node_id, prop_name, value);
        self.sync_json()
    }

    fn render_json(&mut self) -> Result<String, String> {
        serde_json::to_string(&self.engine.render()).map_err(|e| e.to_string())
    }
}

#[wasm_bindgen]
impl Canvas {
    /// Create a canvas over a serialized page schema. `mode` defaults to design.
    #[wasm_bindgen(constructor)]
    pub fn new(schema_json: &str, mode: Option<String>) -> Result<Canvas, JsValue> {
        Self::create(schema_json, mode).map_err(js_error)
    }

    /// Register materials (a JSON array of descriptors) that have a built-in
    /// implementation. Returns how many were bound.
    #[wasm_bindgen(js_name = registerMaterials)]
    pub fn register_materials(&mut self, materials_json: &str) -> Result<usize, JsValue> {
        self.add_materials(materials_json).map_err(js_error)
    }

    /// Render the page to a VNode tree (JSON)
    pub fn render(&mut self) -> Result<String, JsValue> {
        self.render_json().map_err(js_error)
    }

    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = mode.parse::<RenderMode>().map_err(js_error)?;
        self.engine.set_mode(mode);
        Ok(())
    }

    /// Canvas selection. Ignored when the mode does not allow selecting.
    pub fn select(&mut self, node_id: Option<String>) -> Result<String, JsValue> {
        self.engine.click_component(node_id);
        self.sync_json().map_err(js_error)
    }

    #[wasm_bindgen(js_name = selectedId)]
    pub fn selected_id(&self) -> Option<String> {
        self.engine.selected_id().map(str::to_string)
    }

    /// Drop position for a pointer over `target_id`: "before", "after",
    /// "inside", or undefined for unknown targets.
    #[wasm_bindgen(js_name = classifyDrop)]
    pub fn classify_drop(&self, target_id: &str, pointer_y: f64, top: f64, height: f64) -> Option<String> {
        self.engine
            .classify_drop(target_id, pointer_y, top, height)
            .and_then(|position| serde_json::to_value(position).ok())
            .and_then(|value| value.as_str().map(str::to_string))
    }

    /// Feed a drag gesture. Returns the events it produced (JSON array).
    pub fn drag(&mut self, event_json: &str) -> Result<String, JsValue> {
        self.drag_json(event_json).map_err(js_error)
    }

    /// Edit one property. `value_json` is any JSON value.
    #[wasm_bindgen(js_name = setProp)]
    pub fn set_prop(&mut self, node_id: &str, prop_name: &str, value_json: &str) -> Result<String, JsValue> {
        self.set_prop_json(node_id, prop_name, value_json)
            .map_err(js_error)
    }

    pub fn remove(&mut self, node_id: &str) -> Result<String, JsValue> {
        self.engine.remove_component(node_id);
        self.sync_json().map_err(js_error)
    }

    /// Document version, bumped by every applied edit
    pub fn version(&self) -> u64 {
        self.document.version
    }

    #[wasm_bindgen(js_name = exportSchema)]
    pub fn export_schema(&self) -> Result<String, JsValue> {
        self.document
            .export_json()
            .map_err(|e| js_error(e.to_string()))
    }
}
