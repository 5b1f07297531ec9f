//! Render engine configuration.

use crate::error::RenderResult;
use lowcode_registry::{Component, PropMapper};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Capability level the engine renders under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Editable, drag enabled, outlines shown
    Design,
    /// Interactive but not editable
    #[default]
    Preview,
    /// Published output, no editor affordances
    Runtime,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Design => "design",
            RenderMode::Preview => "preview",
            RenderMode::Runtime => "runtime",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "design" => Ok(RenderMode::Design),
            "preview" => Ok(RenderMode::Preview),
            "runtime" => Ok(RenderMode::Runtime),
            other => Err(format!(
                "unknown render mode '{}', expected design, preview or runtime",
                other
            )),
        }
    }
}

/// Unknown mode names fall back to preview
fn lenient_mode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RenderMode, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}

/// Runtime event handler, called with the node id and the event payload
pub type EventHandler = Arc<dyn Fn(&str, &Value) + Send + Sync>;

pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 10_000;

/// Configuration bag of a render engine.
///
/// Missing fields take the defaults of [`RenderOptions::default`]. The maps
/// hold live objects and are never serialized.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    #[serde(deserialize_with = "lenient_mode")]
    pub mode: RenderMode,
    pub editable: bool,
    pub show_placeholder: bool,
    pub draggable: bool,
    pub selectable: bool,
    pub show_outline: bool,
    /// Upper bound on a single dynamic component load
    pub load_timeout_ms: u64,

    /// Component type -> implementation, bound on demand by `auto_register`
    #[serde(skip)]
    pub component_map: HashMap<String, Arc<dyn Component>>,
    /// Component type -> extra prop transformation
    #[serde(skip)]
    pub prop_transformers: HashMap<String, PropMapper>,
    /// Handler reference (as used in `node.events`) -> handler
    #[serde(skip)]
    pub event_handlers: HashMap<String, EventHandler>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: RenderMode::Preview,
            editable: false,
            show_placeholder: true,
            draggable: false,
            selectable: true,
            show_outline: true,
            load_timeout_ms: DEFAULT_LOAD_TIMEOUT_MS,
            component_map: HashMap::new(),
            prop_transformers: HashMap::new(),
            event_handlers: HashMap::new(),
        }
    }
}

impl RenderOptions {
    /// Capability preset of a mode
    pub fn for_mode(mode: RenderMode) -> Self {
        let mut options = Self {
            mode,
            ..Self::default()
        };
        options.apply_mode_flags();
        options
    }

    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Switch mode and take over its capability flags. Maps and timeout stay.
    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
        self.apply_mode_flags();
    }

    fn apply_mode_flags(&mut self) {
        let (editable, draggable, selectable, show_outline, show_placeholder) = match self.mode {
            RenderMode::Design => (true, true, true, true, true),
            RenderMode::Preview => (false, false, true, false, false),
            RenderMode::Runtime => (false, false, false, false, false),
        };
        self.editable = editable;
        self.draggable = draggable;
        self.selectable = selectable;
        self.show_outline = show_outline;
        self.show_placeholder = show_placeholder;
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn with_component(mut self, component_type: impl Into<String>, component: Arc<dyn Component>) -> Self {
        self.component_map.insert(component_type.into(), component);
        self
    }

    pub fn with_prop_transformer<F>(mut self, component_type: impl Into<String>, transformer: F) -> Self
    where
        F: Fn(lowcode_schema::Props) -> lowcode_schema::Props + Send + Sync + 'static,
    {
        self.prop_transformers
            .insert(component_type.into(), Arc::new(transformer));
        self
    }

    pub fn with_event_handler<F>(mut self, handler_ref: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&str, &Value) + Send + Sync + 'static,
    {
        self.event_handlers.insert(handler_ref.into(), Arc::new(handler));
        self
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut component_map: Vec<&String> = self.component_map.keys().collect();
        component_map.sort();
        f.debug_struct("RenderOptions")
            .field("mode", &self.mode)
            .field("editable", &self.editable)
            .field("show_placeholder", &self.show_placeholder)
            .field("draggable", &self.draggable)
            .field("selectable", &self.selectable)
            .field("show_outline", &self.show_outline)
            .field("load_timeout_ms", &self.load_timeout_ms)
            .field("component_map", &component_map)
            .field("prop_transformers", &self.prop_transformers.len())
            .field("event_handlers", &self.event_handlers.len())
            .finish()
    }
}
