use lowcode_schema::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Invalid render options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("Node '{0}' not found in schema")]
    NodeNotFound(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
