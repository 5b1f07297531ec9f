//! Page schema tree types.

use crate::error::{SchemaError, SchemaResult};
use serde::de::{MapAccess, Visitor as SerdeVisitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Property bag of a node (`name -> value`)
pub type Props = serde_json::Map<String, Value>;

/// One element of the page schema tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    /// Unique across the whole tree the node belongs to
    pub id: String,

    /// Foreign key into the material store / component registry
    pub component_type: String,

    #[serde(default)]
    pub props: Props,

    /// Event name -> handler reference
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, String>,

    /// Default-slot children
    #[serde(default)]
    pub children: Vec<ComponentNode>,

    /// Named-slot children, in slot-declaration order
    #[serde(default, skip_serializing_if = "SlotMap::is_empty")]
    pub slots: SlotMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_slot_content: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_name: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ComponentNode {
    pub fn new(component_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component_type: component_type.into(),
            props: Props::new(),
            events: BTreeMap::new(),
            children: Vec::new(),
            slots: SlotMap::new(),
            parent_id: None,
            index: None,
            is_slot_content: false,
            slot_name: None,
        }
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn with_event(mut self, event: impl Into<String>, handler: impl Into<String>) -> Self {
        self.events.insert(event.into(), handler.into());
        self
    }

    pub fn with_child(mut self, child: ComponentNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_slot_child(mut self, slot: impl Into<String>, child: ComponentNode) -> Self {
        self.slots.entry(slot).push(child);
        self
    }

    /// True when the node has default-slot children or any non-empty named slot
    pub fn has_content(&self) -> bool {
        !self.children.is_empty() || self.slots.iter().any(|(_, nodes)| !nodes.is_empty())
    }
}

/// Ordered mapping of slot name to slot content.
///
/// Serializes as a JSON object; iteration follows insertion (declaration)
/// order, which tree search and rendering depend on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotMap {
    entries: Vec<(String, Vec<ComponentNode>)>,
}

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(slot, _)| slot == name)
    }

    pub fn get(&self, name: &str) -> Option<&Vec<ComponentNode>> {
        self.entries
            .iter()
            .find(|(slot, _)| slot == name)
            .map(|(_, nodes)| nodes)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<ComponentNode>> {
        self.entries
            .iter_mut()
            .find(|(slot, _)| slot == name)
            .map(|(_, nodes)| nodes)
    }

    /// Get the content list for `name`, appending an empty slot if missing
    pub fn entry(&mut self, name: impl Into<String>) -> &mut Vec<ComponentNode> {
        let name = name.into();
        let position = match self.entries.iter().position(|(slot, _)| *slot == name) {
            Some(position) => position,
            None => {
                self.entries.push((name, Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[position].1
    }

    /// Replace the content of `name` in place, or append a new slot
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        nodes: Vec<ComponentNode>,
    ) -> Option<Vec<ComponentNode>> {
        let name = name.into();
        match self.get_mut(&name) {
            Some(existing) => Some(std::mem::replace(existing, nodes)),
            None => {
                self.entries.push((name, nodes));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<ComponentNode>> {
        let position = self.entries.iter().position(|(slot, _)| slot == name)?;
        Some(self.entries.remove(position).1)
    }

    pub(crate) fn nth(&self, position: usize) -> Option<&Vec<ComponentNode>> {
        self.entries.get(position).map(|(_, nodes)| nodes)
    }

    pub(crate) fn nth_mut(&mut self, position: usize) -> Option<&mut Vec<ComponentNode>> {
        self.entries.get_mut(position).map(|(_, nodes)| nodes)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Vec<ComponentNode>)> {
        self.entries.iter().map(|(name, nodes)| (name.as_str(), nodes))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Vec<ComponentNode>)> {
        self.entries
            .iter_mut()
            .map(|(name, nodes)| (name.as_str(), nodes))
    }
}

impl FromIterator<(String, Vec<ComponentNode>)> for SlotMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<ComponentNode>)>>(iter: I) -> Self {
        let mut slots = SlotMap::new();
        for (name, nodes) in iter {
            slots.insert(name, nodes);
        }
        slots
    }
}

impl Serialize for SlotMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, nodes) in &self.entries {
            map.serialize_entry(name, nodes)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SlotMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SlotMapVisitor;

        impl<'de> SerdeVisitor<'de> for SlotMapVisitor {
            type Value = SlotMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of slot names to node lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SlotMap, A::Error> {
                let mut slots = SlotMap::new();
                while let Some((name, nodes)) =
                    access.next_entry::<String, Vec<ComponentNode>>()?
                {
                    slots.insert(name, nodes);
                }
                Ok(slots)
            }
        }

        deserializer.deserialize_map(SlotMapVisitor)
    }
}

/// One page / document: the persisted artifact the editor round-trips
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSchema {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub root: ComponentNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Props>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Props>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl PageSchema {
    pub fn new(id: impl Into<String>, name: impl Into<String>, root: ComponentNode) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            title: name.clone(),
            name,
            description: None,
            root,
            styles: None,
            config: None,
            create_time: Some(chrono::Utc::now().to_rfc3339()),
            update_time: None,
        }
    }

    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        if value.get("root").map_or(true, Value::is_null) {
            return Err(SchemaError::MissingRoot);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_pretty(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Stamp `updateTime` with the current time
    pub fn touch(&mut self) {
        self.update_time = Some(chrono::Utc::now().to_rfc3339());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_json_shape() {
        let node = ComponentNode::new("button", "b1")
            .with_prop("text", "Go")
            .with_event("click", "handleClick");

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "b1",
                "componentType": "button",
                "props": { "text": "Go" },
                "events": { "click": "handleClick" },
                "children": []
            })
        );
    }

    #[test]
    fn test_slots_keep_declaration_order() {
        let json = r#"{
            "id": "card",
            "componentType": "card",
            "slots": {
                "header": [{ "id": "h", "componentType": "text" }],
                "footer": [{ "id": "f", "componentType": "text" }],
                "aside": []
            }
        }"#;

        let node: ComponentNode = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = node.slots.names().collect();
        assert_eq!(names, vec!["header", "footer", "aside"]);

        let back = serde_json::to_string(&node).unwrap();
        let header = back.find("header").unwrap();
        let footer = back.find("footer").unwrap();
        let aside = back.find("aside").unwrap();
        assert!(header < footer && footer < aside);
    }

    #[test]
    fn test_slot_entry_appends_once() {
        let mut slots = SlotMap::new();
        slots.entry("icon").push(ComponentNode::new("icon", "i1"));
        slots.entry("icon").push(ComponentNode::new("icon", "i2"));

        assert_eq!(slots.len(), 1);
        assert_eq!(slots.get("icon").unwrap().len(), 2);
    }

    #[test]
    fn test_has_content() {
        let empty = ComponentNode::new("container", "c");
        assert!(!empty.has_content());

        let mut with_empty_slot = empty.clone();
        with_empty_slot.slots.insert("header", vec![]);
        assert!(!with_empty_slot.has_content());

        let with_slot_child = empty.with_slot_child("header", ComponentNode::new("text", "t"));
        assert!(with_slot_child.has_content());
    }

    #[test]
    fn test_page_schema_roundtrip() {
        let root = ComponentNode::new("container", "root")
            .with_child(ComponentNode::new("text", "t1").with_prop("content", "Hello"));
        let mut page = PageSchema::new("page-1", "home", root);
        page.config = Some(json!({ "layout": "fluid" }).as_object().unwrap().clone());

        let json = page.to_json_pretty().unwrap();
        let back = PageSchema::from_json(&json).unwrap();
        assert_eq!(back, page);
    }

    #[test]
    fn test_page_schema_requires_root() {
        let result = PageSchema::from_json(r#"{ "id": "p", "name": "p", "title": "p" }"#);
        assert!(matches!(result, Err(SchemaError::MissingRoot)));

        let result = PageSchema::from_json("{ not json");
        assert!(matches!(result, Err(SchemaError::Json(_))));
    }
}
