//! Material descriptors: implementation-agnostic component metadata.
//!
//! A descriptor says what a component type accepts (properties, events,
//! slots), how it is catalogued (category, group, tags) and where its
//! implementation can be imported from. It never holds the implementation
//! itself; the registry binds one later.

use crate::node::ComponentNode;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Declared value type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    String,
    Number,
    Boolean,
    Object,
    Array,
    Function,
    Slot,
    Node,
    Select,
    Color,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
            PropertyType::Object => "object",
            PropertyType::Array => "array",
            PropertyType::Function => "function",
            PropertyType::Slot => "slot",
            PropertyType::Node => "node",
            PropertyType::Select => "select",
            PropertyType::Color => "color",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub label: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
    /// `Some(Value::Null)` is an explicit null default; `None` means no default
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// Keeps a JSON `null` as `Some(Value::Null)` instead of collapsing it to `None`
fn present_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            property_type,
            ..Default::default()
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.options = Some(
            values
                .into_iter()
                .map(|value| SelectOption {
                    label: value.to_string(),
                    value,
                })
                .collect(),
        );
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParam {
    pub name: String,
    #[serde(rename = "type", default)]
    pub param_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<EventParam>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDescriptor {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_components: Option<bool>,
    /// Empty or absent means any type may be dropped in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_component_types: Option<Vec<String>>,
}

impl SlotDescriptor {
    /// Whether a node of `component_type` may be placed in this slot
    pub fn accepts(&self, component_type: &str) -> bool {
        if self.allow_components == Some(false) {
            return false;
        }
        match &self.allow_component_types {
            Some(types) if !types.is_empty() => types.iter().any(|t| t == component_type),
            _ => true,
        }
    }
}

/// Where a material's implementation comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MaterialSource {
    Local { import: ImportSpec },
    Remote { remote: RemoteSpec },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSpec {
    pub path: String,
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub export_name: Option<String>,
    #[serde(default)]
    pub destructuring: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSpec {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Editor-side configuration of a material
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfigure {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<ConfigureProp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentCapabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports: Option<Supports>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurePropKind {
    Field,
    Group,
}

/// One entry of the property panel
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureProp {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ConfigurePropKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ConfigureProp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_variable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_container: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_modal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nesting_rule: Option<NestingRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_minimal_render_unit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disable_behaviors: Vec<String>,
}

/// Declarative nesting constraints. Enforced by the drop-intent consumer,
/// not by the render engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestingRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_whitelist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_whitelist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descendant_blacklist: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestor_whitelist: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Supports {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub loop_: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedConfig {
    /// Children cloned into a freshly dropped instance
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub initial_children: Vec<ComponentNode>,
}

/// Ready-made subtree offered by the palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub schema: ComponentNode,
}

/// Implementation-agnostic description of one component type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDescriptor {
    /// Registry key. Required by strict registration, optional in the store.
    #[serde(default)]
    pub component_id: String,
    /// Unique key within a material store
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<SlotDescriptor>,
    #[serde(default)]
    pub is_container: bool,
    #[serde(default)]
    pub is_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MaterialSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configure: Option<ComponentConfigure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snippets: Vec<Snippet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl MaterialDescriptor {
    pub fn new(component_id: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            component_id: component_id.into(),
            name: type_name.clone(),
            title: type_name.clone(),
            type_name,
            category: "basic".to_string(),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_slot(mut self, slot: SlotDescriptor) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn container(mut self) -> Self {
        self.is_container = true;
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn slot(&self, name: &str) -> Option<&SlotDescriptor> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Title shown by palettes and placeholders, falling back to the type
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.type_name
        } else {
            &self.title
        }
    }

    /// Container flag, honouring the editor configuration override
    pub fn accepts_children(&self) -> bool {
        self.configure
            .as_ref()
            .and_then(|c| c.component.as_ref())
            .and_then(|c| c.is_container)
            .unwrap_or(self.is_container)
    }

    pub fn nesting_rule(&self) -> Option<&NestingRule> {
        self.configure
            .as_ref()
            .and_then(|c| c.component.as_ref())
            .and_then(|c| c.nesting_rule.as_ref())
    }

    pub fn initial_children(&self) -> &[ComponentNode] {
        self.configure
            .as_ref()
            .and_then(|c| c.advanced.as_ref())
            .map(|a| a.initial_children.as_slice())
            .unwrap_or(&[])
    }
}
