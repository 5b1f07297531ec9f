//! # Component Wrapper
//!
//! Decorates every resolved node with the editor affordances of the current
//! mode: selection, outline, placeholder, drag handle and edit toolbar. The
//! component's own output is left untouched inside
//! `component-wrapper__content`.
//!
//! ## Flag precedence
//!
//! Each flag is taken from the node's [`WrapperOverrides`] first, then from
//! the engine's [`RenderOptions`].
//!
//! ## Output
//!
//! ```text
//! div.component-wrapper[.--selected][.--draggable][.--editable]
//!                      [.--show-outline][.--container][.--error].--level-N
//!   div.component-wrapper__selected-indicator     (selected)
//!   div.component-wrapper__placeholder            (showPlaceholder, no content)
//!   div.component-wrapper__content                (component output)
//!   div.component-wrapper__toolbar                (editable and selected)
//! ```

use crate::options::RenderOptions;
use crate::resolve::{Resolution, ResolvedNode};
use lowcode_registry::{RenderedSlots, VNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Slot whose content is rendered as default children
const DEFAULT_SLOT: &str = "default";

/// Per-node flag overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapperOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_outline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_placeholder: Option<bool>,
}

/// Effective flags of one wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapperFlags {
    pub selected: bool,
    pub selectable: bool,
    pub draggable: bool,
    pub editable: bool,
    pub show_outline: bool,
    pub show_placeholder: bool,
}

impl WrapperFlags {
    pub fn compute(
        node_id: &str,
        overrides: Option<&WrapperOverrides>,
        options: &RenderOptions,
        selected_id: Option<&str>,
    ) -> Self {
        let overrides = overrides.copied().unwrap_or_default();
        Self {
            selected: overrides.selected.unwrap_or(false) || selected_id == Some(node_id),
            selectable: overrides.selectable.unwrap_or(options.selectable),
            draggable: overrides.draggable.unwrap_or(options.draggable),
            editable: overrides.editable.unwrap_or(options.editable),
            show_outline: overrides.show_outline.unwrap_or(options.show_outline),
            show_placeholder: overrides.show_placeholder.unwrap_or(options.show_placeholder),
        }
    }
}

pub struct WrapperContext<'a> {
    pub options: &'a RenderOptions,
    pub selected_id: Option<&'a str>,
    pub overrides: &'a HashMap<String, WrapperOverrides>,
}

/// Render a resolved tree, wrapping every node
pub fn render_wrapped(node: &ResolvedNode, ctx: &WrapperContext<'_>) -> VNode {
    let flags = WrapperFlags::compute(
        &node.node_id,
        ctx.overrides.get(&node.node_id),
        ctx.options,
        ctx.selected_id,
    );

    let mut wrapper = VNode::element("div")
        .with_class("component-wrapper")
        .with_key(node.node_id.clone())
        .with_attr("data-component-id", node.node_id.clone())
        .with_attr("data-component-type", node.component_type.clone())
        .with_attr("draggable", flags.draggable);

    for (enabled, modifier) in [
        (flags.selected, "selected"),
        (flags.draggable, "draggable"),
        (flags.editable, "editable"),
        (flags.show_outline, "show-outline"),
        (node.is_container, "container"),
    ] {
        if enabled {
            wrapper = wrapper.with_class(format!("component-wrapper--{}", modifier));
        }
    }
    if !matches!(node.resolution, Resolution::Ready(_)) && !matches!(node.resolution, Resolution::Loading { .. }) {
        wrapper = wrapper.with_class("component-wrapper--error");
    }
    wrapper = wrapper.with_class(format!("component-wrapper--level-{}", node.level));
    if flags.selectable {
        wrapper = wrapper.with_attr("data-selectable", true);
    }

    if flags.selected {
        wrapper = wrapper
            .with_child(VNode::element("div").with_class("component-wrapper__selected-indicator"));
    }

    if flags.show_placeholder && !node.has_content() {
        wrapper = wrapper.with_child(
            VNode::element("div")
                .with_class("component-wrapper__placeholder")
                .with_child(VNode::text(node.title.clone())),
        );
    }

    wrapper = wrapper.with_child(
        VNode::element("div")
            .with_class("component-wrapper__content")
            .with_child(render_content(node, ctx)),
    );

    if flags.editable && flags.selected {
        wrapper = wrapper.with_child(toolbar());
    }

    wrapper
}

fn render_content(node: &ResolvedNode, ctx: &WrapperContext<'_>) -> VNode {
    match &node.resolution {
        Resolution::Missing => VNode::Missing {
            node_id: node.node_id.clone(),
            component_type: node.component_type.clone(),
        },
        Resolution::Loading { .. } => VNode::Loading {
            node_id: node.node_id.clone(),
            component_type: node.component_type.clone(),
        },
        Resolution::Failed { message } => VNode::error(
            format!("Failed to load '{}': {}", node.component_type, message),
            Some(node.node_id.clone()),
        ),
        Resolution::Ready(component) => {
            let mut children: Vec<VNode> = node
                .children
                .iter()
                .map(|child| render_wrapped(child, ctx))
                .collect();

            let mut slots: RenderedSlots = Vec::new();
            for (name, nodes) in &node.slots {
                if nodes.is_empty() {
                    continue;
                }
                let rendered: Vec<VNode> = nodes.iter().map(|n| render_wrapped(n, ctx)).collect();
                if name == DEFAULT_SLOT {
                    children.extend(rendered);
                } else {
                    slots.push((name.clone(), rendered));
                }
            }

            let mut props = node.props.clone();
            for (event, handler) in &node.events {
                props.insert(handler_attribute(event), Value::String(handler.clone()));
            }

            component.render(&props, children, slots)
        }
    }
}

/// `click` -> `onClick`
pub fn handler_attribute(event: &str) -> String {
    let mut chars = event.chars();
    match chars.next() {
        Some(first) => format!("on{}{}", first.to_uppercase(), chars.as_str()),
        None => "on".to_string(),
    }
}

fn toolbar() -> VNode {
    let button = |action: &str, title: &str, label: &str| {
        VNode::element("button")
            .with_class("component-wrapper__toolbar-btn")
            .with_attr("data-action", action)
            .with_attr("title", title)
            .with_child(VNode::text(label))
    };

    VNode::element("div")
        .with_class("component-wrapper__toolbar")
        .with_child(button("delete", "Delete", "×"))
        .with_child(button("copy", "Copy", "⎘"))
        .with_child(button("move-up", "Move up", "↑"))
        .with_child(button("move-down", "Move down", "↓"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RenderMode;
    use lowcode_registry::builtins::ElementComponent;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn leaf(id: &str, resolution: Resolution) -> ResolvedNode {
        ResolvedNode {
            node_id: id.to_string(),
            component_type: "text".to_string(),
            level: 1,
            props: Default::default(),
            events: BTreeMap::new(),
            is_container: false,
            title: "Text".to_string(),
            resolution,
            children: vec![],
            slots: vec![],
        }
    }

    fn ready() -> Resolution {
        Resolution::Ready(Arc::new(ElementComponent::new("text", "span")))
    }

    #[test]
    fn test_design_mode_selected_node() {
        let options = RenderOptions::for_mode(RenderMode::Design);
        let overrides = HashMap::new();
        let ctx = WrapperContext {
            options: &options,
            selected_id: Some("a"),
            overrides: &overrides,
        };

        let vnode = render_wrapped(&leaf("a", ready()), &ctx);
        for class in [
            "component-wrapper",
            "component-wrapper--selected",
            "component-wrapper--draggable",
            "component-wrapper--editable",
            "component-wrapper--show-outline",
            "component-wrapper--level-1",
        ] {
            assert!(vnode.has_class(class), "missing {}", class);
        }
        assert!(!vnode.has_class("component-wrapper--container"));
        assert!(vnode
            .find(&|n| n.has_class("component-wrapper__toolbar"))
            .is_some());
        assert!(vnode
            .find(&|n| n.has_class("component-wrapper__selected-indicator"))
            .is_some());
        assert_eq!(
            vnode
                .find(&|n| n.has_class("component-wrapper__placeholder"))
                .unwrap()
                .text_content(),
            "Text"
        );
    }

    #[test]
    fn test_node_override_wins() {
        let options = RenderOptions::for_mode(RenderMode::Design);
        let mut overrides = HashMap::new();
        overrides.insert(
            "a".to_string(),
            WrapperOverrides {
                draggable: Some(false),
                show_placeholder: Some(false),
                ..Default::default()
            },
        );
        let ctx = WrapperContext {
            options: &options,
            selected_id: None,
            overrides: &overrides,
        };

        let vnode = render_wrapped(&leaf("a", ready()), &ctx);
        assert!(!vnode.has_class("component-wrapper--draggable"));
        assert!(vnode.has_class("component-wrapper--editable"));
        assert!(vnode
            .find(&|n| n.has_class("component-wrapper__placeholder"))
            .is_none());
        assert!(vnode
            .find(&|n| n.has_class("component-wrapper__toolbar"))
            .is_none());
    }

    #[test]
    fn test_missing_component_renders_error_state() {
        let options = RenderOptions::default();
        let overrides = HashMap::new();
        let ctx = WrapperContext {
            options: &options,
            selected_id: None,
            overrides: &overrides,
        };

        let mut node = leaf("m", Resolution::Missing);
        node.component_type = "chart".to_string();
        let vnode = render_wrapped(&node, &ctx);

        assert!(vnode.has_class("component-wrapper--error"));
        assert!(vnode
            .find(&|n| matches!(n, VNode::Missing { component_type, .. } if component_type == "chart"))
            .is_some());
    }

    #[test]
    fn test_events_become_handler_attributes() {
        let options = RenderOptions::for_mode(RenderMode::Runtime);
        let overrides = HashMap::new();
        let ctx = WrapperContext {
            options: &options,
            selected_id: None,
            overrides: &overrides,
        };

        let mut node = leaf("b", ready());
        node.events.insert("click".to_string(), "handleClick".to_string());
        let vnode = render_wrapped(&node, &ctx);

        let inner = vnode.find(&|n| n.has_class("lc-text")).unwrap();
        assert_eq!(inner.attr("onClick"), Some(&Value::from("handleClick")));
        assert_eq!(handler_attribute("mouseEnter"), "onMouseEnter");
    }

    #[test]
    fn test_levels_increase_through_slots() {
        let options = RenderOptions::default();
        let overrides = HashMap::new();
        let ctx = WrapperContext {
            options: &options,
            selected_id: None,
            overrides: &overrides,
        };

        let mut root = leaf("root", ready());
        root.level = 0;
        let mut slotted = leaf("s", ready());
        slotted.level = 1;
        root.slots.push(("footer".to_string(), vec![slotted]));

        let vnode = render_wrapped(&root, &ctx);
        assert!(vnode.has_class("component-wrapper--level-0"));
        let inner = vnode
            .find(&|n| n.attr("data-component-id") == Some(&Value::from("s")))
            .unwrap();
        assert!(inner.has_class("component-wrapper--level-1"));
    }
}
