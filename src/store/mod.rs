//! Persistence gateway for pets, owners and history.
//!
//! The simulation core never talks to storage directly. It is handed a loaded
//! [`Pet`], computes the next attributes, and gives them back through
//! [`PetStore::commit`] together with exactly one history entry.
//!
//! Two adapters are provided:
//! - [`MemoryStore`]: in-process, for tests and short-lived sessions
//! - [`SqliteStore`]: durable, backed by rusqlite

use crate::core::{Attributes, HistoryEntry, Pet, PetId, User, UserId};
use chrono::{DateTime, Utc};
use stillwater::validation::Validation;

pub mod error;
mod memory;
mod sqlite;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Load/save/append contract between the engine and durable storage.
///
/// Implementations own the durable copies. Callers are expected to serialize
/// `load → apply → commit` per pet; [`PetStore::commit`] must apply the
/// attribute write and the history append as one unit.
pub trait PetStore {
    /// Register a new user. Fails with `DuplicateUsername` if taken.
    fn create_user(&mut self, username: &str) -> Result<User, StoreError>;

    fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Create a pet with default attributes. Fails with `UserNotFound`.
    fn create_pet(
        &mut self,
        owner: UserId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Pet, StoreError>;

    /// Pets owned by a user, in creation order.
    fn pets_for_user(&self, owner: UserId) -> Result<Vec<Pet>, StoreError>;

    /// Load a pet by id. Fails with `PetNotFound`.
    fn load(&self, pet_id: PetId) -> Result<Pet, StoreError>;

    /// Overwrite all four stored attribute fields.
    fn save(&mut self, pet_id: PetId, attributes: &Attributes) -> Result<(), StoreError>;

    /// Durably append one history entry.
    fn append_history(&mut self, entry: &HistoryEntry) -> Result<(), StoreError>;

    /// Save `attributes` and append `entry` atomically: both persist or neither.
    fn commit(
        &mut self,
        pet_id: PetId,
        attributes: &Attributes,
        entry: &HistoryEntry,
    ) -> Result<(), StoreError>;

    /// History for a pet, ordered by timestamp ascending.
    fn history(&self, pet_id: PetId) -> Result<Vec<HistoryEntry>, StoreError>;
}

/// First-use bootstrap: make sure `username` exists and owns a pet.
///
/// Creates the user if missing and a pet named `pet_name` if the user has
/// none. Returns the user's first pet.
pub fn seed_default<S: PetStore + ?Sized>(
    store: &mut S,
    username: &str,
    pet_name: &str,
    now: DateTime<Utc>,
) -> Result<Pet, StoreError> {
    let user = match store.find_user(username)? {
        Some(user) => user,
        None => {
            tracing::info!(username, "creating default user");
            store.create_user(username)?
        }
    };

    let mut pets = store.pets_for_user(user.id)?;
    if pets.is_empty() {
        tracing::info!(username, pet_name, "creating default pet");
        return store.create_pet(user.id, pet_name, now);
    }
    Ok(pets.remove(0))
}

/// Reject a stored attribute vector that breaks the bounds.
pub(crate) fn ensure_valid(pet_id: PetId, attributes: &Attributes) -> Result<(), StoreError> {
    match attributes.validate() {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(StoreError::CorruptRecord {
            pet_id,
            reason: errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        }),
    }
}
