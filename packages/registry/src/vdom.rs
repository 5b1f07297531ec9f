use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Render tree node produced by components and the wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum VNode {
    /// Host element
    Element {
        tag: String,
        attributes: BTreeMap<String, Value>,
        children: Vec<VNode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    /// Text node
    Text { content: String },

    /// No registration exists for `component_type`
    #[serde(rename_all = "camelCase")]
    Missing {
        node_id: String,
        component_type: String,
    },

    /// Dynamic implementation still loading
    #[serde(rename_all = "camelCase")]
    Loading {
        node_id: String,
        component_type: String,
    },

    /// Error node (shows failures inline instead of aborting the render)
    #[serde(rename_all = "camelCase")]
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        node_id: Option<String>,
    },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            key: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn error(message: impl Into<String>, node_id: Option<String>) -> Self {
        VNode::Error {
            message: message.into(),
            node_id,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    /// Append to the space separated `class` attribute
    pub fn with_class(mut self, class: impl AsRef<str>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            let class = class.as_ref();
            let merged = match attributes.get("class").and_then(Value::as_str) {
                Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
                _ => class.to_string(),
            };
            attributes.insert("class".to_string(), Value::String(merged));
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        if let VNode::Element {
            key: ref mut node_key,
            ..
        } = self
        {
            *node_key = Some(key.into());
        }
        self
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(name),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .and_then(Value::as_str)
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Depth-first search for the first node matching `predicate`
    pub fn find(&self, predicate: &dyn Fn(&VNode) -> bool) -> Option<&VNode> {
        if predicate(self) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(predicate))
    }

    /// Concatenated text content of the subtree
    pub fn text_content(&self) -> String {
        match self {
            VNode::Text { content } => content.clone(),
            VNode::Element { children, .. } => children.iter().map(VNode::text_content).collect(),
            _ => String::new(),
        }
    }
}
