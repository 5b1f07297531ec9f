//! Material asset bundles.
//!
//! An asset bundle is the distributable form of a material library: the
//! packages that provide the implementations, the enhanced component
//! descriptors and the palette sort lists. Sort lists are derived from the
//! components and recomputed on every change.

use crate::error::MaterialResult;
use lowcode_schema::{
    ComponentCapabilities, ComponentConfigure, ConfigureProp, ConfigurePropKind, ImportReport,
    MaterialDescriptor, PropertyType, Supports,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

pub const DEFAULT_ASSET_VERSION: &str = "1.0.0";

/// `major.minor.patch` version of the material protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ProtocolVersion {
    pub const CURRENT: ProtocolVersion = ProtocolVersion {
        major: 1,
        minor: 0,
        patch: 0,
    };
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A package that ships component implementations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPackage {
    pub package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub version: String,
    /// Global name the package is exposed under
    pub library: String,
    /// Runtime resources
    #[serde(default)]
    pub urls: Vec<String>,
    /// Design-time resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortInfo {
    #[serde(default)]
    pub group_list: Vec<String>,
    #[serde(default)]
    pub category_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBundle {
    pub version: String,
    pub packages: Vec<MaterialPackage>,
    pub components: Vec<MaterialDescriptor>,
    #[serde(default)]
    pub sort: SortInfo,
}

impl Default for AssetBundle {
    fn default() -> Self {
        Self {
            version: DEFAULT_ASSET_VERSION.to_string(),
            packages: Vec::new(),
            components: Vec::new(),
            sort: SortInfo::default(),
        }
    }
}

impl AssetBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component, replacing any with the same `componentId`
    pub fn add_component(&mut self, component: MaterialDescriptor) {
        match self
            .components
            .iter()
            .position(|c| c.component_id == component.component_id)
        {
            Some(position) => {
                debug!(component_id = %component.component_id, "Replacing component in bundle");
                self.components[position] = component;
            }
            None => {
                debug!(component_id = %component.component_id, "Adding component to bundle");
                self.components.push(component);
            }
        }
        self.update_sort_info();
    }

    pub fn add_components(&mut self, components: impl IntoIterator<Item = MaterialDescriptor>) {
        for component in components {
            self.add_component(component);
        }
    }

    /// Add a package, replacing any with the same name and version
    pub fn add_package(&mut self, package: MaterialPackage) {
        match self
            .packages
            .iter()
            .position(|p| p.package == package.package && p.version == package.version)
        {
            Some(position) => self.packages[position] = package,
            None => self.packages.push(package),
        }
    }

    /// Returns whether a component was removed
    pub fn remove_component(&mut self, component_id: &str) -> bool {
        let before = self.components.len();
        self.components.retain(|c| c.component_id != component_id);

        if self.components.len() == before {
            debug!(component_id = %component_id, "Component not in bundle");
            return false;
        }
        self.update_sort_info();
        true
    }

    pub fn component(&self, component_id: &str) -> Option<&MaterialDescriptor> {
        self.components
            .iter()
            .find(|c| c.component_id == component_id)
    }

    pub fn components_by_group(&self, group: &str) -> Vec<&MaterialDescriptor> {
        self.components
            .iter()
            .filter(|c| c.group.as_deref() == Some(group))
            .collect()
    }

    pub fn components_by_category(&self, category: &str) -> Vec<&MaterialDescriptor> {
        self.components
            .iter()
            .filter(|c| c.category == category)
            .collect()
    }

    pub fn export_json(&self) -> MaterialResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace the bundle with the one in `json`.
    ///
    /// The bundle is left untouched unless the input parses and carries a
    /// version plus `components` and `packages` arrays.
    pub fn import_json(&mut self, json: &str) -> ImportReport {
        let value: serde_json::Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Asset bundle import failed");
                return ImportReport::failed(format!("Invalid JSON: {}", e));
            }
        };

        let has_version = value
            .get("version")
            .and_then(|v| v.as_str())
            .is_some_and(|v| !v.is_empty());
        let has_arrays = value.get("components").is_some_and(|v| v.is_array())
            && value.get("packages").is_some_and(|v| v.is_array());
        if !has_version || !has_arrays {
            warn!("Asset bundle import failed: invalid bundle format");
            return ImportReport::failed("Invalid asset bundle format");
        }

        match serde_json::from_value::<AssetBundle>(value) {
            Ok(bundle) => {
                info!(
                    components = bundle.components.len(),
                    packages = bundle.packages.len(),
                    "Imported asset bundle"
                );
                let message = format!(
                    "Imported {} components and {} packages",
                    bundle.components.len(),
                    bundle.packages.len()
                );
                *self = bundle;
                ImportReport::ok(message)
            }
            Err(e) => {
                warn!(error = %e, "Asset bundle import failed");
                ImportReport::failed(format!("Invalid asset bundle: {}", e))
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn update_sort_info(&mut self) {
        let mut groups: Vec<String> = Vec::new();
        let mut categories: Vec<String> = Vec::new();

        for component in &self.components {
            if let Some(group) = component.group.as_ref().filter(|g| !g.is_empty()) {
                if !groups.contains(group) {
                    groups.push(group.clone());
                }
            }
            if !component.category.is_empty() && !categories.contains(&component.category) {
                categories.push(component.category.clone());
            }
        }

        self.sort.group_list = groups;
        self.sort.category_list = categories;
    }
}

/// Name of the property panel editor used for a property type
pub fn setter_for(property_type: PropertyType) -> &'static str {
    match property_type {
        PropertyType::String => "StringSetter",
        PropertyType::Number => "NumberSetter",
        PropertyType::Boolean => "BooleanSetter",
        PropertyType::Object => "JsonSetter",
        PropertyType::Array => "ArraySetter",
        PropertyType::Function => "FunctionSetter",
        PropertyType::Color => "ColorSetter",
        PropertyType::Select => "SelectSetter",
        PropertyType::Slot => "SlotSetter",
        PropertyType::Node => "NodeSetter",
    }
}

/// Derive the editor configuration of a plain descriptor.
///
/// The group falls back to the category. Every property becomes an inline
/// field with the setter matching its type.
pub fn enhance_component(component: &MaterialDescriptor, group: Option<&str>) -> MaterialDescriptor {
    let mut enhanced = component.clone();
    enhanced.group = Some(
        group
            .map(str::to_string)
            .unwrap_or_else(|| component.category.clone()),
    );
    enhanced.priority = Some(0);
    enhanced.configure = Some(ComponentConfigure {
        props: component
            .properties
            .iter()
            .map(|property| ConfigureProp {
                kind: Some(ConfigurePropKind::Field),
                title: Some(property.label.clone()),
                name: Some(property.name.clone()),
                display: Some("inline".to_string()),
                default_value: property.default_value.clone(),
                setter: Some(setter_for(property.property_type).to_string()),
                ..Default::default()
            })
            .collect(),
        component: Some(ComponentCapabilities {
            is_container: Some(component.is_container),
            is_modal: Some(false),
            descriptor: Some(component.title.clone()),
            ..Default::default()
        }),
        supports: Some(Supports {
            events: component.events.iter().map(|e| e.name.clone()).collect(),
            loop_: Some(false),
            condition: Some(true),
            style: Some(true),
            i18n: None,
        }),
        advanced: None,
    });
    enhanced
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowcode_schema::PropertyDescriptor;

    fn component(id: &str, group: &str, category: &str) -> MaterialDescriptor {
        MaterialDescriptor::new(id, id)
            .with_group(group)
            .with_category(category)
    }

    #[test]
    fn test_protocol_version_display() {
        assert_eq!(ProtocolVersion::CURRENT.to_string(), "1.0.0");
        let version = ProtocolVersion {
            major: 2,
            minor: 10,
            patch: 3,
        };
        assert_eq!(format!("{}", version), "2.10.3");
    }

    #[test]
    fn test_add_replaces_and_updates_sort() {
        let mut bundle = AssetBundle::new();
        bundle.add_components([
            component("button", "basic", "general"),
            component("input", "form", "entry"),
            component("button", "basic", "action"),
        ]);

        assert_eq!(bundle.components.len(), 2);
        assert_eq!(bundle.component("button").unwrap().category, "action");
        assert_eq!(bundle.sort.group_list, vec!["basic", "form"]);
        assert_eq!(bundle.sort.category_list, vec!["action", "entry"]);
        assert_eq!(bundle.components_by_group("form").len(), 1);
        assert_eq!(bundle.components_by_category("action").len(), 1);

        assert!(bundle.remove_component("input"));
        assert!(!bundle.remove_component("input"));
        assert_eq!(bundle.sort.group_list, vec!["basic"]);
    }

    #[test]
    fn test_package_replaced_by_name_and_version() {
        let package = |version: &str, title: &str| MaterialPackage {
            package: "antd".to_string(),
            title: Some(title.to_string()),
            version: version.to_string(),
            library: "antd".to_string(),
            urls: vec![],
            edit_urls: None,
        };

        let mut bundle = AssetBundle::new();
        bundle.add_package(package("5.0.0", "first"));
        bundle.add_package(package("5.0.0", "second"));
        bundle.add_package(package("5.1.0", "third"));

        assert_eq!(bundle.packages.len(), 2);
        assert_eq!(bundle.packages[0].title.as_deref(), Some("second"));
    }

    #[test]
    fn test_import_rejects_invalid_and_keeps_state() {
        let mut bundle = AssetBundle::new();
        bundle.add_component(component("button", "basic", "general"));

        let report = bundle.import_json("{ not json");
        assert!(!report.success);
        let report = bundle.import_json(r#"{ "version": "1.0.0", "components": [] }"#);
        assert!(!report.success);
        assert_eq!(bundle.components.len(), 1);
    }

    #[test]
    fn test_export_then_import() {
        let mut bundle = AssetBundle::new();
        bundle.add_component(component("button", "basic", "general"));
        let json = bundle.export_json().unwrap();

        let mut other = AssetBundle::new();
        let report = other.import_json(&json);
        assert!(report.success, "{}", report.message);
        assert_eq!(other, bundle);

        other.clear();
        assert!(other.components.is_empty());
        assert_eq!(other.version, DEFAULT_ASSET_VERSION);
    }

    #[test]
    fn test_enhance_component() {
        let plain = MaterialDescriptor::new("color-picker", "color-picker")
            .with_category("advanced")
            .with_property(PropertyDescriptor::new("value", PropertyType::Color).with_default("#fff"))
            .with_property(PropertyDescriptor::new("presets", PropertyType::Array));

        let enhanced = enhance_component(&plain, None);
        assert_eq!(enhanced.group.as_deref(), Some("advanced"));

        let configure = enhanced.configure.unwrap();
        assert_eq!(configure.props[0].setter.as_deref(), Some("ColorSetter"));
        assert_eq!(configure.props[1].setter.as_deref(), Some("ArraySetter"));
        assert_eq!(configure.props[0].default_value, Some(serde_json::json!("#fff")));
        assert_eq!(configure.component.unwrap().is_container, Some(false));

        let grouped = enhance_component(&plain, Some("pickers"));
        assert_eq!(grouped.group.as_deref(), Some("pickers"));
    }
}
