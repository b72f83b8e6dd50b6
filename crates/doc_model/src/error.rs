//! Error types for document model operations

use crate::ComponentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Component kind `{0}` has not been registered")]
    UnregisteredKind(String),

    #[error("Component cannot be deserialized: {0}")]
    NotDeserializable(String),

    #[error("Component of kind `{0}` refuses to be serialized")]
    SerializationRefused(String),

    #[error("Component not found: {0}")]
    ComponentNotFound(ComponentId),

    #[error("Component {0} is already part of this document")]
    AlreadyInDocument(ComponentId),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
