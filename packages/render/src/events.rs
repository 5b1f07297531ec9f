//! Notifications emitted by the render engine.
//!
//! The engine never mutates the schema in response to user gestures. It
//! emits intents through an [`EventBus`]; the owning store applies them.

use lowcode_schema::PageSchema;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Before,
    After,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragPhase {
    Start,
    Over,
    End,
    Drop,
}

/// A drag gesture as reported by the canvas host.
///
/// An empty `source_node_id` means a new component dragged in from the
/// palette. Serialized payloads also carry the derived `isFromPanel` flag,
/// which is ignored on input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEvent {
    pub phase: DragPhase,
    #[serde(default)]
    pub source_node_id: String,
    #[serde(default)]
    pub source_component_type: String,
    #[serde(default)]
    pub target_node_id: String,
    #[serde(default)]
    pub position: Option<DropPosition>,
}

impl DragEvent {
    /// Gesture on an existing node
    pub fn node(
        phase: DragPhase,
        source_node_id: impl Into<String>,
        source_component_type: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            source_node_id: source_node_id.into(),
            source_component_type: source_component_type.into(),
            target_node_id: String::new(),
            position: None,
        }
    }

    /// Gesture carrying a new component from the palette
    pub fn from_panel(phase: DragPhase, component_type: impl Into<String>) -> Self {
        Self::node(phase, String::new(), component_type)
    }

    pub fn over(mut self, target_node_id: impl Into<String>, position: DropPosition) -> Self {
        self.target_node_id = target_node_id.into();
        self.position = Some(position);
        self
    }

    pub fn is_from_panel(&self) -> bool {
        self.source_node_id.is_empty()
    }
}

impl Serialize for DragEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DragEvent", 6)?;
        state.serialize_field("phase", &self.phase)?;
        state.serialize_field("sourceNodeId", &self.source_node_id)?;
        state.serialize_field("sourceComponentType", &self.source_component_type)?;
        state.serialize_field("targetNodeId", &self.target_node_id)?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("isFromPanel", &self.is_from_panel())?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum RenderEvent {
    /// Emitted on every `select_component` call, changed or not
    #[serde(rename_all = "camelCase")]
    ComponentSelected { node_id: Option<String> },

    DragStart(DragEvent),
    DragOver(DragEvent),
    DragEnd(DragEvent),

    #[serde(rename_all = "camelCase")]
    PropChange {
        node_id: String,
        prop_name: String,
        prop_value: Value,
    },

    SchemaChange { schema: Box<PageSchema> },

    #[serde(rename_all = "camelCase")]
    ComponentAdded {
        source_component_type: String,
        target_node_id: String,
        position: DropPosition,
    },

    #[serde(rename_all = "camelCase")]
    ComponentRemoved { node_id: String },

    #[serde(rename_all = "camelCase")]
    ComponentMoved {
        source_node_id: String,
        target_node_id: String,
        position: DropPosition,
    },
}

impl RenderEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RenderEvent::ComponentSelected { .. } => "component-selected",
            RenderEvent::DragStart(_) => "drag-start",
            RenderEvent::DragOver(_) => "drag-over",
            RenderEvent::DragEnd(_) => "drag-end",
            RenderEvent::PropChange { .. } => "prop-change",
            RenderEvent::SchemaChange { .. } => "schema-change",
            RenderEvent::ComponentAdded { .. } => "component-added",
            RenderEvent::ComponentRemoved { .. } => "component-removed",
            RenderEvent::ComponentMoved { .. } => "component-moved",
        }
    }

    /// Whether the event asks the store to change the tree structure
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            RenderEvent::ComponentAdded { .. }
                | RenderEvent::ComponentRemoved { .. }
                | RenderEvent::ComponentMoved { .. }
        )
    }
}

/// Fan-out of render events to any number of subscribers.
///
/// Delivery is unbounded and never blocks the emitter. Subscribers whose
/// receiver was dropped are pruned on the next emit.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<UnboundedSender<RenderEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<RenderEvent> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: RenderEvent) {
        debug!(event = event.name(), subscribers = self.subscribers.len(), "Emitting render event");
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
