//! Error types for editing operations

use doc_model::ComponentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Component {0} is not part of the document")]
    DanglingReference(ComponentId),

    #[error("Unknown command kind: {0}")]
    UnknownCommand(String),

    #[error("Command cannot be deserialized: {0}")]
    NotDeserializable(String),

    #[error("Command cannot be serialized: {0}")]
    NotSerializable(String),

    #[error("Invalid command state: {0}")]
    InvalidState(String),

    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] geometry::GeometryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditError>;
