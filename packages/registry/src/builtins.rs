//! Framework primitives resolved synchronously.

use crate::component::{Component, Registration, RenderedSlots};
use crate::vdom::VNode;
use lowcode_schema::{MaterialDescriptor, PropertyDescriptor, PropertyType, Props};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Renders a host element carrying its props as attributes.
///
/// `text_prop`, when set, names a prop rendered as a leading text child
/// instead of an attribute. Slot content follows the default children.
#[derive(Debug, Clone)]
pub struct ElementComponent {
    name: String,
    tag: String,
    text_prop: Option<String>,
    void: bool,
}

impl ElementComponent {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            text_prop: None,
            void: false,
        }
    }

    pub fn with_text_prop(mut self, prop: impl Into<String>) -> Self {
        self.text_prop = Some(prop.into());
        self
    }

    /// Element that never renders children (e.g. `input`)
    pub fn void(mut self) -> Self {
        self.void = true;
        self
    }
}

impl Component for ElementComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, props: &Props, children: Vec<VNode>, slots: RenderedSlots) -> VNode {
        let mut node = VNode::element(&self.tag).with_class(format!("lc-{}", self.name));

        for (key, value) in props {
            if Some(key) == self.text_prop.as_ref() {
                continue;
            }
            node = node.with_attr(key.clone(), value.clone());
        }

        if self.void {
            return node;
        }

        if let Some(text) = self.text_prop.as_ref().and_then(|p| props.get(p)) {
            node = node.with_child(VNode::text(value_to_text(text)));
        }

        node = node.with_children(children);
        for (_, content) in slots {
            node = node.with_children(content);
        }
        node
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Types of the built-in primitives
pub const BUILTIN_TYPES: [&str; 5] = ["container", "form", "input", "text", "button"];

/// Built-in implementations keyed by component type
pub fn builtin_components() -> HashMap<String, Arc<dyn Component>> {
    let components: Vec<Arc<dyn Component>> = vec![
        Arc::new(ElementComponent::new("container", "div")),
        Arc::new(ElementComponent::new("form", "form")),
        Arc::new(ElementComponent::new("input", "input").void()),
        Arc::new(ElementComponent::new("text", "span").with_text_prop("content")),
        Arc::new(ElementComponent::new("button", "button").with_text_prop("text")),
    ];

    components
        .into_iter()
        .map(|component| (component.name().to_string(), component))
        .collect()
}

fn builtin_descriptor(type_name: &str) -> MaterialDescriptor {
    let descriptor = MaterialDescriptor::new(type_name, type_name).with_group("builtin");
    match type_name {
        "container" => descriptor.container().with_property(
            PropertyDescriptor::new("style", PropertyType::Object),
        ),
        "form" => descriptor
            .container()
            .with_property(PropertyDescriptor::new("layout", PropertyType::Select).with_options([
                Value::from("horizontal"),
                Value::from("vertical"),
                Value::from("inline"),
            ])),
        "input" => descriptor
            .with_category("form")
            .with_property(PropertyDescriptor::new("placeholder", PropertyType::String))
            .with_property(PropertyDescriptor::new("value", PropertyType::String)),
        "text" => descriptor.with_property(
            PropertyDescriptor::new("content", PropertyType::String).with_default("Text"),
        ),
        "button" => descriptor
            .with_property(PropertyDescriptor::new("text", PropertyType::String).with_default("Button")),
        _ => descriptor,
    }
}

/// Registrations for every built-in primitive
pub fn builtin_registrations() -> Vec<Registration> {
    let components = builtin_components();
    BUILTIN_TYPES
        .iter()
        .filter_map(|type_name| {
            components
                .get(*type_name)
                .map(|component| Registration::builtin(builtin_descriptor(type_name), component.clone()))
        })
        .collect()
}
