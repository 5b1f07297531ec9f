//! Renderable implementations and the registration record binding them to
//! a descriptor.

use crate::error::{RegistryError, RegistryResult};
use crate::vdom::VNode;
use futures::future::BoxFuture;
use lowcode_schema::{MaterialDescriptor, Props};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Rendered named-slot content, in slot declaration order
pub type RenderedSlots = Vec<(String, Vec<VNode>)>;

/// A component implementation
pub trait Component: Send + Sync {
    fn name(&self) -> &str;

    /// Render with already-resolved children and slot content
    fn render(&self, props: &Props, children: Vec<VNode>, slots: RenderedSlots) -> VNode;
}

pub type LoadFuture = BoxFuture<'static, RegistryResult<Arc<dyn Component>>>;

/// Asynchronous factory turning an import path into a component
pub trait ComponentLoader: Send + Sync {
    fn load(&self, import_path: &str) -> LoadFuture;
}

/// Transforms the props of a node before its component sees them
pub type PropMapper = Arc<dyn Fn(Props) -> Props + Send + Sync>;

/// How a registration resolves to something renderable
#[derive(Clone)]
pub enum ComponentImpl {
    /// Available synchronously
    BuiltIn(Arc<dyn Component>),
    /// Loaded lazily; the render layer caches the result
    Dynamic {
        import_path: String,
        loader: Arc<dyn ComponentLoader>,
    },
}

impl fmt::Debug for ComponentImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentImpl::BuiltIn(component) => {
                f.debug_tuple("BuiltIn").field(&component.name()).finish()
            }
            ComponentImpl::Dynamic { import_path, .. } => f
                .debug_struct("Dynamic")
                .field("import_path", import_path)
                .finish_non_exhaustive(),
        }
    }
}

/// A descriptor bound to its implementation
#[derive(Clone)]
pub struct Registration {
    pub descriptor: MaterialDescriptor,
    pub implementation: ComponentImpl,
    pub prop_mappers: Vec<PropMapper>,
}

impl Registration {
    pub fn builtin(descriptor: MaterialDescriptor, component: Arc<dyn Component>) -> Self {
        Self {
            descriptor,
            implementation: ComponentImpl::BuiltIn(component),
            prop_mappers: Vec::new(),
        }
    }

    pub fn dynamic(
        descriptor: MaterialDescriptor,
        import_path: impl Into<String>,
        loader: Arc<dyn ComponentLoader>,
    ) -> Self {
        Self {
            descriptor,
            implementation: ComponentImpl::Dynamic {
                import_path: import_path.into(),
                loader,
            },
            prop_mappers: Vec::new(),
        }
    }

    pub fn with_prop_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(Props) -> Props + Send + Sync + 'static,
    {
        self.prop_mappers.push(Arc::new(mapper));
        self
    }

    pub fn component_id(&self) -> &str {
        &self.descriptor.component_id
    }

    pub fn component_type(&self) -> &str {
        &self.descriptor.type_name
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.implementation, ComponentImpl::Dynamic { .. })
    }

    /// Run `props` through every mapper, in registration order
    pub fn map_props(&self, props: Props) -> Props {
        self.prop_mappers
            .iter()
            .fold(props, |props, mapper| mapper(props))
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("component_id", &self.descriptor.component_id)
            .field("type", &self.descriptor.type_name)
            .field("implementation", &self.implementation)
            .field("prop_mappers", &self.prop_mappers.len())
            .finish()
    }
}

/// Loader resolving import paths from a fixed table. Resolves immediately.
#[derive(Default, Clone)]
pub struct StaticLoader {
    components: HashMap<String, Arc<dyn Component>>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, import_path: impl Into<String>, component: Arc<dyn Component>) -> Self {
        self.components.insert(import_path.into(), component);
        self
    }
}

impl ComponentLoader for StaticLoader {
    fn load(&self, import_path: &str) -> LoadFuture {
        let result = self.components.get(import_path).cloned().ok_or_else(|| {
            RegistryError::LoadFailed(import_path.to_string(), "module not found".to_string())
        });
        Box::pin(futures::future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::ElementComponent;
    use serde_json::json;

    #[test]
    fn test_prop_mappers_run_in_order() {
        let registration = Registration::builtin(
            MaterialDescriptor::new("btn", "button"),
            Arc::new(ElementComponent::new("button", "button")),
        )
        .with_prop_mapper(|mut props| {
            props.insert("size".to_string(), json!("small"));
            props
        })
        .with_prop_mapper(|mut props| {
            if props.get("size") == Some(&json!("small")) {
                props.insert("dense".to_string(), json!(true));
            }
            props
        });

        let props = registration.map_props(Props::new());
        assert_eq!(props["size"], json!("small"));
        assert_eq!(props["dense"], json!(true));
    }

    #[test]
    fn test_static_loader() {
        let loader = StaticLoader::new().with("@/Chart", Arc::new(ElementComponent::new("chart", "canvas")));

        let loaded = futures::executor::block_on(loader.load("@/Chart")).unwrap();
        assert_eq!(loaded.name(), "chart");

        let missing = futures::executor::block_on(loader.load("@/Nope"));
        assert!(matches!(missing, Err(RegistryError::LoadFailed(path, _)) if path == "@/Nope"));
    }

    #[test]
    fn test_debug_output() {
        let registration = Registration::dynamic(
            MaterialDescriptor::new("chart", "chart"),
            "@/Chart",
            Arc::new(StaticLoader::new()),
        );
        let debug = format!("{:?}", registration);
        assert!(debug.contains("@/Chart"));
        assert!(registration.is_dynamic());
    }
}
