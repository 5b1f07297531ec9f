use thiserror::Error;

/// Errors raised while reading or writing page schemas
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema has no root node")]
    MissingRoot,

    #[error("Generic error: {0}")]
    Generic(String),
}

impl From<String> for SchemaError {
    fn from(s: String) -> Self {
        SchemaError::Generic(s)
    }
}

impl From<&str> for SchemaError {
    fn from(s: &str) -> Self {
        SchemaError::Generic(s.to_string())
    }
}

/// Schema Result type alias
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Outcome of importing serialized state.
///
/// Imports report success as data rather than an error so that callers can
/// surface the message directly. A failed import never modifies the
/// receiver's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub success: bool,
    pub message: String,
}

impl ImportReport {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
