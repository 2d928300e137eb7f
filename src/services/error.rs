//! Error type shared by the content services

use thiserror::Error;

/// Failure of a content operation
///
/// `Validation` and `NotFound` carry a message fit for the caller.
/// `Internal` wraps storage failures whose detail must not leave the server.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ContentError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

/// True when `err` comes from a UNIQUE constraint in the store.
pub(crate) fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<sqlx::Error>(),
            Some(sqlx::Error::Database(db)) if db.is_unique_violation()
        )
    })
}
