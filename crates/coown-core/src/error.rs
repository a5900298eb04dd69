//! Error types for the co-ownership platform.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoownError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Integrity check failed for {entity} {id}: {reason}")]
    Integrity {
        entity: String,
        id: String,
        reason: String,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoownError {
    /// Shorthand for a [`CoownError::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

pub type CoownResult<T> = Result<T, CoownError>;
