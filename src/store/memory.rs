//! In-process store.

use super::{ensure_valid, PetStore, StoreError};
use crate::core::{Attributes, HistoryEntry, HistoryLog, Pet, PetId, User, UserId};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Store that keeps everything in memory.
///
/// Ids are assigned from 1 upward, like SQLite rowids. History lives in a
/// [`HistoryLog`].
#[derive(Clone, Debug)]
pub struct MemoryStore {
    users: Vec<User>,
    pets: BTreeMap<PetId, Pet>,
    history: HistoryLog,
    next_user_id: UserId,
    next_pet_id: PetId,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            pets: BTreeMap::new(),
            history: HistoryLog::new(),
            next_user_id: 1,
            next_pet_id: 1,
        }
    }

    /// Full log across all pets, in insertion order.
    pub fn log(&self) -> &HistoryLog {
        &self.history
    }

    fn pet_mut(&mut self, pet_id: PetId) -> Result<&mut Pet, StoreError> {
        self.pets
            .get_mut(&pet_id)
            .ok_or(StoreError::PetNotFound { pet_id })
    }

    fn ensure_pet(&self, pet_id: PetId) -> Result<(), StoreError> {
        if self.pets.contains_key(&pet_id) {
            Ok(())
        } else {
            Err(StoreError::PetNotFound { pet_id })
        }
    }
}

impl PetStore for MemoryStore {
    fn create_user(&mut self, username: &str) -> Result<User, StoreError> {
        if self.users.iter().any(|u| u.username == username) {
            return Err(StoreError::DuplicateUsername {
                username: username.to_string(),
            });
        }

        let user = User {
            id: self.next_user_id,
            username: username.to_string(),
        };
        self.next_user_id += 1;
        self.users.push(user.clone());
        Ok(user)
    }

    fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.iter().find(|u| u.username == username).cloned())
    }

    fn create_pet(
        &mut self,
        owner: UserId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Pet, StoreError> {
        if !self.users.iter().any(|u| u.id == owner) {
            return Err(StoreError::UserNotFound { user_id: owner });
        }

        let pet = Pet {
            id: self.next_pet_id,
            name: name.to_string(),
            owner,
            attributes: Attributes::seeded(now),
        };
        self.next_pet_id += 1;
        self.pets.insert(pet.id, pet.clone());
        Ok(pet)
    }

    fn pets_for_user(&self, owner: UserId) -> Result<Vec<Pet>, StoreError> {
        Ok(self
            .pets
            .values()
            .filter(|pet| pet.owner == owner)
            .cloned()
            .collect())
    }

    fn load(&self, pet_id: PetId) -> Result<Pet, StoreError> {
        self.pets
            .get(&pet_id)
            .cloned()
            .ok_or(StoreError::PetNotFound { pet_id })
    }

    fn save(&mut self, pet_id: PetId, attributes: &Attributes) -> Result<(), StoreError> {
        ensure_valid(pet_id, attributes)?;
        self.pet_mut(pet_id)?.attributes = *attributes;
        Ok(())
    }

    fn append_history(&mut self, entry: &HistoryEntry) -> Result<(), StoreError> {
        self.ensure_pet(entry.pet_id)?;
        self.history = self.history.record(entry.clone());
        Ok(())
    }

    fn commit(
        &mut self,
        pet_id: PetId,
        attributes: &Attributes,
        entry: &HistoryEntry,
    ) -> Result<(), StoreError> {
        // Check everything up front so neither write happens on failure
        ensure_valid(pet_id, attributes)?;
        self.ensure_pet(pet_id)?;
        self.ensure_pet(entry.pet_id)?;

        self.save(pet_id, attributes)?;
        self.append_history(entry)
    }

    fn history(&self, pet_id: PetId) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self.history.for_pet(pet_id))
    }
}
