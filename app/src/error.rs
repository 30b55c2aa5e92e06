//! Error types surfaced by the to-do store and view.

use crate::types::ValidationError;
use thiserror::Error;
use todolist_core::environment::StorageError;
use todolist_runtime::StoreError;

/// Errors returned by [`crate::TodoStore`] and [`crate::View`] operations
///
/// Only [`TodoError::ValidationFailed`] is recoverable: the view shows it in
/// the error region. Everything else is a storage failure the caller is
/// expected to treat as fatal.
#[derive(Error, Debug)]
pub enum TodoError {
    /// Input rejected; the list was not modified
    #[error("{0}")]
    ValidationFailed(#[from] ValidationError),

    /// Durable storage could not be read or written
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The store finished a create command without recording its outcome
    #[error("create command produced no outcome")]
    NoOutcome,
}

impl TodoError {
    /// Storage failure underneath this error, if any
    #[must_use]
    pub fn storage_error(&self) -> Option<&StorageError> {
        use todolist_core::effect::EffectError;

        match self {
            Self::Store(StoreError::EffectFailed(EffectError::Storage(error))) => Some(error),
            _ => None,
        }
    }

    /// Whether the list read from storage could not be decoded
    #[must_use]
    pub fn is_malformed_storage(&self) -> bool {
        matches!(self.storage_error(), Some(StorageError::Malformed { .. }))
    }
}
