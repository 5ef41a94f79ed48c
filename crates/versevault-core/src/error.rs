//! Store and quiz error types.
//!
//! Store errors are defined here rather than in `versevault-store` so the
//! presentation layer can downcast them from `anyhow::Error` and pick a
//! user-facing message without string matching.

use thiserror::Error;

use crate::model::VerseId;

/// Errors that can occur when reading or writing the verse store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connectivity or constraint failure in the backing store.
    #[error("storage error: {0}")]
    Storage(String),

    /// An update referenced a record that does not exist.
    #[error("verse {0} not found")]
    NotFound(VerseId),
}

impl StoreError {
    /// Returns `true` if the referenced record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Errors raised by the quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The quiz was read while there are no verses in the vault.
    #[error("no verses in the vault")]
    EmptyState,

    /// The traversal points at a verse that is not in the supplied verse set.
    /// Happens only when the caller skips `sync_traversal`.
    #[error("verse {0} is not in the current verse set")]
    UnknownVerse(VerseId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(StoreError::NotFound(7).is_not_found());
        assert!(!StoreError::Storage("disk full".into()).is_not_found());
    }

    #[test]
    fn downcast_through_anyhow() {
        let err: anyhow::Error = StoreError::NotFound(3).into();
        let store_err = err.downcast_ref::<StoreError>().unwrap();
        assert!(store_err.is_not_found());
        assert_eq!(err.to_string(), "verse 3 not found");
    }
}
