//! Persistence error types.

use crate::core::{PetId, UserId};
use thiserror::Error;

/// Errors surfaced by a [`PetStore`](super::PetStore).
///
/// None of these are retried. They propagate unchanged to the caller of the
/// transition.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No stored pet has this id
    #[error("Pet {pet_id} not found")]
    PetNotFound { pet_id: PetId },

    /// No stored user has this id
    #[error("User {user_id} not found")]
    UserNotFound { user_id: UserId },

    /// Username is already taken
    #[error("Username '{username}' already exists")]
    DuplicateUsername { username: String },

    /// A stored pet row could not be turned back into valid attributes
    #[error("Pet {pet_id} has a corrupt record: {reason}")]
    CorruptRecord { pet_id: PetId, reason: String },

    /// Underlying SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}
