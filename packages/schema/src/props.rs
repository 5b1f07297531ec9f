//! Property defaults and value validation.

use crate::descriptor::{MaterialDescriptor, PropertyDescriptor, PropertyType};
use crate::node::{ComponentNode, Props};
use crate::visitor::{walk_node_mut, VisitorMut};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// `{name: defaultValue}` for every property that declares a default.
///
/// An explicit `null` default is kept; properties without a default are
/// left out rather than set to `null`.
pub fn get_default_props(descriptor: &MaterialDescriptor) -> Props {
    descriptor
        .properties
        .iter()
        .filter_map(|property| {
            property
                .default_value
                .as_ref()
                .map(|value| (property.name.clone(), value.clone()))
        })
        .collect()
}

/// Type-check a property value against its declared type.
///
/// A missing value (`None`) is valid exactly when the property is optional.
pub fn validate_property_value(value: Option<&Value>, property: &PropertyDescriptor) -> bool {
    let Some(value) = value else {
        return !property.required;
    };

    match property.property_type {
        PropertyType::String => value.is_string(),
        PropertyType::Number => value.is_number(),
        PropertyType::Boolean => value.is_boolean(),
        // Arrays are objects too
        PropertyType::Object => value.is_object() || value.is_array(),
        PropertyType::Array => value.is_array(),
        // Handlers are carried around as serialized references
        PropertyType::Function => value.is_string(),
        PropertyType::Select => match &property.options {
            Some(options) => options.iter().any(|option| option.value == *value),
            None => true,
        },
        PropertyType::Color => value.as_str().is_some_and(is_color),
        PropertyType::Slot | PropertyType::Node => true,
    }
}

fn color_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"^#([0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
                .expect("hex color pattern"),
            Regex::new(r"^rgb\(\s*\d+\s*,\s*\d+\s*,\s*\d+\s*\)$").expect("rgb color pattern"),
            Regex::new(r"^rgba\(\s*\d+\s*,\s*\d+\s*,\s*\d+\s*,\s*[\d.]+\s*\)$")
                .expect("rgba color pattern"),
        ]
    })
}

fn is_color(value: &str) -> bool {
    color_patterns().iter().any(|pattern| pattern.is_match(value))
}

/// Copy of `root` where every node with empty props gets its type's defaults.
///
/// `defaults_for` maps a component type to its default props; types it does
/// not know are left untouched. Nodes that already carry props are never
/// modified, so applying this twice is the same as applying it once.
pub fn with_defaults<F>(root: &ComponentNode, defaults_for: F) -> ComponentNode
where
    F: Fn(&str) -> Option<Props>,
{
    let mut copy = root.clone();
    fill_defaults(&mut copy, defaults_for);
    copy
}

/// In-place variant of [`with_defaults`]. Returns how many nodes were filled.
pub fn fill_defaults<F>(root: &mut ComponentNode, defaults_for: F) -> usize
where
    F: Fn(&str) -> Option<Props>,
{
    struct DefaultFiller<F> {
        defaults_for: F,
        filled: usize,
    }

    impl<F: Fn(&str) -> Option<Props>> VisitorMut for DefaultFiller<F> {
        fn visit_node_mut(&mut self, node: &mut ComponentNode) {
            if node.props.is_empty() {
                if let Some(defaults) = (self.defaults_for)(&node.component_type) {
                    if !defaults.is_empty() {
                        node.props = defaults;
                        self.filled += 1;
                    }
                }
            }
            walk_node_mut(self, node);
        }
    }

    let mut filler = DefaultFiller {
        defaults_for,
        filled: 0,
    };
    filler.visit_node_mut(root);
    filler.filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn button() -> MaterialDescriptor {
        MaterialDescriptor::new("btn", "button")
            .with_property(PropertyDescriptor::new("text", PropertyType::String).with_default("OK"))
            .with_property(PropertyDescriptor::new("disabled", PropertyType::Boolean))
            .with_property(
                PropertyDescriptor::new("icon", PropertyType::String).with_default(Value::Null),
            )
    }

    #[test]
    fn test_default_props_skip_missing_keep_null() {
        let defaults = get_default_props(&button());
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults["text"], json!("OK"));
        assert_eq!(defaults["icon"], Value::Null);
        assert!(!defaults.contains_key("disabled"));
    }

    #[test]
    fn test_missing_value_follows_required() {
        let optional = PropertyDescriptor::new("x", PropertyType::String);
        let required = PropertyDescriptor::new("x", PropertyType::String).required();
        assert!(validate_property_value(None, &optional));
        assert!(!validate_property_value(None, &required));
    }

    #[test]
    fn test_scalar_types() {
        let number = PropertyDescriptor::new("n", PropertyType::Number);
        assert!(validate_property_value(Some(&json!(1.5)), &number));
        assert!(!validate_property_value(Some(&json!("1.5")), &number));

        let boolean = PropertyDescriptor::new("b", PropertyType::Boolean);
        assert!(validate_property_value(Some(&json!(false)), &boolean));
        assert!(!validate_property_value(Some(&json!(0)), &boolean));

        let object = PropertyDescriptor::new("o", PropertyType::Object);
        assert!(validate_property_value(Some(&json!({})), &object));
        assert!(validate_property_value(Some(&json!([])), &object));
        assert!(!validate_property_value(Some(&Value::Null), &object));

        let array = PropertyDescriptor::new("a", PropertyType::Array);
        assert!(!validate_property_value(Some(&json!({})), &array));

        let function = PropertyDescriptor::new("f", PropertyType::Function);
        assert!(validate_property_value(Some(&json!("handleClick")), &function));
        assert!(!validate_property_value(Some(&json!(1)), &function));
    }

    #[test]
    fn test_select_options() {
        let select = PropertyDescriptor::new("s", PropertyType::Select)
            .with_options([json!(1), json!(2)]);
        assert!(validate_property_value(Some(&json!(2)), &select));
        assert!(!validate_property_value(Some(&json!(3)), &select));

        let open = PropertyDescriptor::new("s", PropertyType::Select);
        assert!(validate_property_value(Some(&json!("anything")), &open));
    }

    #[test]
    fn test_colors() {
        let color = PropertyDescriptor::new("c", PropertyType::Color);
        for good in ["#fff", "#ffff", "#a1b2c3", "#a1b2c3d4", "rgb(1, 2, 3)", "rgba(1,2,3,0.5)"] {
            assert!(validate_property_value(Some(&json!(good)), &color), "{}", good);
        }
        for bad in ["notacolor", "#ff", "#fffff", "rgb(1,2)", "red"] {
            assert!(!validate_property_value(Some(&json!(bad)), &color), "{}", bad);
        }
        assert!(!validate_property_value(Some(&json!(255)), &color));
    }

    #[test]
    fn test_with_defaults_fills_only_empty_props() {
        let root = ComponentNode::new("container", "root")
            .with_child(ComponentNode::new("button", "empty"))
            .with_child(ComponentNode::new("button", "custom").with_prop("text", "Send"));

        let lookup = |t: &str| (t == "button").then(|| get_default_props(&button()));
        let filled = with_defaults(&root, lookup);

        assert!(filled.props.is_empty());
        assert_eq!(filled.children[0].props["text"], json!("OK"));
        assert_eq!(filled.children[1].props.len(), 1);
        assert_eq!(filled.children[1].props["text"], json!("Send"));

        assert!(root.children[0].props.is_empty());
        assert_eq!(with_defaults(&filled, lookup), filled);
    }

    #[test]
    fn test_fill_defaults_counts() {
        let mut root = ComponentNode::new("button", "a")
            .with_slot_child("icon", ComponentNode::new("button", "b"));
        let count = fill_defaults(&mut root, |_| Some(get_default_props(&button())));
        assert_eq!(count, 2);
        assert_eq!(fill_defaults(&mut root, |_| Some(get_default_props(&button()))), 0);
    }
}
