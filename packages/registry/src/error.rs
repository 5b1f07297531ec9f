use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Registration of '{name}' has no component id")]
    MissingComponentId { name: String },

    #[error("Component '{0}' failed to load: {1}")]
    LoadFailed(String, String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
