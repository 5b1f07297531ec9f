//! Per-type cache of dynamically loaded components.

use lowcode_registry::{Component, RegistryResult};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub enum LoadState {
    Pending,
    Ready(Arc<dyn Component>),
    Failed(String),
}

impl fmt::Debug for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Pending => f.write_str("Pending"),
            LoadState::Ready(component) => f.debug_tuple("Ready").field(&component.name()).finish(),
            LoadState::Failed(message) => f.debug_tuple("Failed").field(message).finish(),
        }
    }
}

/// Load state of every dynamic component type the engine has asked for.
///
/// A type moves `Pending -> Ready | Failed` exactly once; completing a type
/// that was never requested is ignored.
#[derive(Debug, Default, Clone)]
pub struct ComponentCache {
    states: HashMap<String, LoadState>,
}

impl ComponentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, component_type: &str) -> Option<&LoadState> {
        self.states.get(component_type)
    }

    /// Mark `component_type` as pending. Returns false when it is already known.
    pub fn request(&mut self, component_type: &str) -> bool {
        if self.states.contains_key(component_type) {
            return false;
        }
        debug!(component_type = %component_type, "Requesting dynamic component");
        self.states
            .insert(component_type.to_string(), LoadState::Pending);
        true
    }

    /// Record the outcome of a load. Returns false if the type was not pending.
    pub fn complete(
        &mut self,
        component_type: &str,
        result: RegistryResult<Arc<dyn Component>>,
    ) -> bool {
        match self.states.get_mut(component_type) {
            Some(state) if matches!(state, LoadState::Pending) => {
                *state = match result {
                    Ok(component) => {
                        debug!(component_type = %component_type, "Dynamic component ready");
                        LoadState::Ready(component)
                    }
                    Err(e) => {
                        warn!(component_type = %component_type, error = %e, "Dynamic component failed to load");
                        LoadState::Failed(e.to_string())
                    }
                };
                true
            }
            _ => false,
        }
    }

    /// Mark a pending load as failed with a plain message
    pub fn fail(&mut self, component_type: &str, message: impl Into<String>) -> bool {
        match self.states.get_mut(component_type) {
            Some(state) if matches!(state, LoadState::Pending) => {
                let message = message.into();
                warn!(component_type = %component_type, error = %message, "Dynamic component failed to load");
                *state = LoadState::Failed(message);
                true
            }
            _ => false,
        }
    }

    pub fn pending_types(&self) -> Vec<String> {
        let mut pending: Vec<String> = self
            .states
            .iter()
            .filter(|(_, state)| matches!(state, LoadState::Pending))
            .map(|(component_type, _)| component_type.clone())
            .collect();
        pending.sort();
        pending
    }

    /// Forget a type so the next render requests it again
    pub fn invalidate(&mut self, component_type: &str) {
        self.states.remove(component_type);
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}
