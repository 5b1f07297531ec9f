use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaterialError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid material JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Material in {path} has no type")]
    MissingType { path: PathBuf },

    #[error("Materials directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type MaterialResult<T> = Result<T, MaterialError>;
