//! Error types raised by the attribute engine.

use thiserror::Error;

/// Errors surfaced while declaring or using model attributes.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("attribute :{attribute} is already defined on {class}")]
    AttributeAlreadyDefined { attribute: String, class: String },

    #[error("attribute :{0} not found")]
    AttributeNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("undefined member `{name}` for {class}")]
    NoSuchAccessor { name: String, class: String },

    #[error("unknown class: {0}")]
    UnknownClass(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
