//! Error types for the editor

use lowcode_schema::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Document is not file-backed")]
    NotFileBacked,
}

pub type EditorResult<T> = Result<T, EditorError>;
