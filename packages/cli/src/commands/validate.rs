use super::{build_registry, load_store, read_schema};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use lowcode_registry::ComponentRegistry;
use lowcode_schema::{
    validate_property_value, validate_schema, walk_node, with_defaults, ComponentNode, PageSchema,
    Visitor,
};
use std::fmt;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Page schema JSON file
    pub input: PathBuf,

    /// Materials directory (overrides materialsDir in the config file)
    #[arg(short, long)]
    pub materials: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub node_id: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node_id {
            Some(id) => write!(f, "[{}] {}", id, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Structural issues, unknown component types and property type mismatches.
///
/// Properties are checked after defaults are applied, so a required property
/// with a default never reports as missing.
pub fn check_page(schema: &PageSchema, registry: &ComponentRegistry) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = validate_schema(&schema.root)
        .into_iter()
        .map(|issue| Diagnostic {
            level: Level::Error,
            node_id: None,
            message: issue.to_string(),
        })
        .collect();

    let root = with_defaults(&schema.root, |component_type| {
        registry
            .get_component(component_type)
            .map(|registration| lowcode_schema::get_default_props(&registration.descriptor))
    });

    struct PropChecker<'a> {
        registry: &'a ComponentRegistry,
        diagnostics: &'a mut Vec<Diagnostic>,
    }

    impl Visitor for PropChecker<'_> {
        fn visit_node(&mut self, node: &ComponentNode) {
            match self.registry.get_component(&node.component_type) {
                None => self.diagnostics.push(Diagnostic {
                    level: Level::Warning,
                    node_id: Some(node.id.clone()),
                    message: format!("unknown component type '{}'", node.component_type),
                }),
                Some(registration) => {
                    for property in &registration.descriptor.properties {
                        let value = node.props.get(&property.name);
                        if validate_property_value(value, property) {
                            continue;
                        }
                        let message = match value {
                            None => format!("required property '{}' is missing", property.name),
                            Some(_) => format!(
                                "property '{}' is not a valid {}",
                                property.name,
                                property.property_type.as_str()
                            ),
                        };
                        self.diagnostics.push(Diagnostic {
                            level: Level::Error,
                            node_id: Some(node.id.clone()),
                            message,
                        });
                    }
                }
            }
            walk_node(self, node);
        }
    }

    PropChecker {
        registry,
        diagnostics: &mut diagnostics,
    }
    .visit_node(&root);

    diagnostics
}

pub fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    println!("🔍 {} page schema", "Validating".green().bold());
    println!("   Input: {}", args.input.display());

    let config = Config::load(cwd)?;
    let store = load_store(config.get_materials_dir(cwd, args.materials.as_deref()).as_ref())?;
    let registry = build_registry(&store);
    let schema = read_schema(&PathBuf::from(cwd).join(&args.input))?;
    println!();

    let diagnostics = check_page(&schema, &registry);
    let errors = diagnostics.iter().filter(|d| d.level == Level::Error).count();
    let warnings = diagnostics.len() - errors;

    for diagnostic in &diagnostics {
        match diagnostic.level {
            Level::Error => println!("   {} {}", "✗".red(), diagnostic),
            Level::Warning => println!("   {} {}", "⚠".yellow(), diagnostic),
        }
    }

    if diagnostics.is_empty() {
        println!("   {} {} is valid", "✓".green(), schema.name);
    }
    if warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), warnings);
    }
    if errors > 0 {
        return Err(anyhow::anyhow!("{} error(s) in {}", errors, args.input.display()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowcode_material::MaterialStore;
    use lowcode_registry::builtins::ElementComponent;
    use lowcode_registry::Registration;
    use lowcode_schema::{MaterialDescriptor, PropertyDescriptor, PropertyType};
    use std::sync::Arc;

    fn registry() -> ComponentRegistry {
        let mut registry = build_registry(&MaterialStore::new());
        registry
            .register(Registration::builtin(
                MaterialDescriptor::new("badge", "badge")
                    .with_property(PropertyDescriptor::new("count", PropertyType::Number).required()),
                Arc::new(ElementComponent::new("badge", "span")),
            ))
            .unwrap();
        registry
    }

    #[test]
    fn test_clean_page() {
        let root = ComponentNode::new("container", "root")
            .with_child(ComponentNode::new("text", "t").with_prop("content", "Hi"));
        let diagnostics = check_page(&PageSchema::new("p", "P", root), &registry());
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn test_reports_unknown_types_as_warnings() {
        let root = ComponentNode::new("container", "root").with_child(ComponentNode::new("chart", "c"));
        let diagnostics = check_page(&PageSchema::new("p", "P", root), &registry());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].level, Level::Warning);
        assert_eq!(diagnostics[0].node_id.as_deref(), Some("c"));
    }

    #[test]
    fn test_reports_structure_and_prop_errors() {
        let root = ComponentNode::new("container", "root")
            .with_child(ComponentNode::new("text", "dup").with_prop("content", 42))
            .with_child(ComponentNode::new("container", "dup"));
        let diagnostics = check_page(&PageSchema::new("p", "P", root), &registry());

        assert!(diagnostics
            .iter()
            .any(|d| d.level == Level::Error && d.message.contains("duplicate node id 'dup'")));
        assert!(diagnostics
            .iter()
            .any(|d| d.level == Level::Error && d.message.contains("'content' is not a valid string")));
    }

    #[test]
    fn test_required_property_missing() {
        let root = ComponentNode::new("container", "root")
            .with_child(ComponentNode::new("badge", "b1"))
            .with_child(ComponentNode::new("badge", "b2").with_prop("count", 3));
        let diagnostics = check_page(&PageSchema::new("p", "P", root), &registry());

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].node_id.as_deref(), Some("b1"));
        assert_eq!(diagnostics[0].to_string(), "[b1] required property 'count' is missing");
    }
}
