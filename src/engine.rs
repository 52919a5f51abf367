//! Engine that runs transitions against a store.
//!
//! This is the imperative shell around the pure rules in [`crate::core`]:
//! load the pet, sample the clock once, apply the rule, then commit the new
//! attributes together with one history entry.

use crate::clock::{Clock, SystemClock};
use crate::core::{rules, Action, Attributes, HistoryEntry, Pet, PetId};
use crate::store::{self, PetStore, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of one applied transition.
///
/// `applied_at` equals both `attributes.last_updated` and the timestamp of the
/// history entry written with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub pet_id: PetId,
    pub action: Action,
    pub attributes: Attributes,
    pub applied_at: DateTime<Utc>,
}

/// Runs transitions for pets held in `S`, reading time from `C`.
///
/// `perform` takes `&mut self`, so one engine never has two transitions in
/// flight. Deployments that share a database across processes rely on the
/// store's transactional commit.
pub struct PetEngine<S: PetStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
}

impl<S: PetStore> PetEngine<S, SystemClock> {
    /// Create an engine on wall-clock time.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: PetStore, C: Clock> PetEngine<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Apply `action` to a pet and persist the result.
    ///
    /// On any store error the computed attributes are dropped and the error is
    /// returned unchanged; the durable state keeps its prior value.
    pub fn perform(&mut self, pet_id: PetId, action: Action) -> Result<Outcome, StoreError> {
        let pet = self.store.load(pet_id)?;
        let now = self.clock.now();

        if now < pet.attributes.last_updated {
            warn!(
                pet_id,
                last_updated = %pet.attributes.last_updated,
                now = %now,
                "clock is behind last update; treating elapsed time as zero"
            );
        }

        let attributes = rules::apply(action, &pet.attributes, now);
        let entry = HistoryEntry::new(pet_id, action, now);
        debug!(pet_id, %action, ?attributes, "computed transition");

        self.store.commit(pet_id, &attributes, &entry)?;

        info!(
            pet_id,
            %action,
            hunger = attributes.hunger,
            happiness = attributes.happiness,
            energy = attributes.energy,
            "applied transition"
        );

        Ok(Outcome {
            pet_id,
            action,
            attributes,
            applied_at: now,
        })
    }

    pub fn feed(&mut self, pet_id: PetId) -> Result<Outcome, StoreError> {
        self.perform(pet_id, Action::Feed)
    }

    pub fn play(&mut self, pet_id: PetId) -> Result<Outcome, StoreError> {
        self.perform(pet_id, Action::Play)
    }

    pub fn train(&mut self, pet_id: PetId) -> Result<Outcome, StoreError> {
        self.perform(pet_id, Action::Train)
    }

    pub fn misbehave(&mut self, pet_id: PetId) -> Result<Outcome, StoreError> {
        self.perform(pet_id, Action::Misbehave)
    }

    pub fn decay(&mut self, pet_id: PetId) -> Result<Outcome, StoreError> {
        self.perform(pet_id, Action::Decay)
    }

    /// Catch up on idle decay, then apply `action`.
    ///
    /// Two commits and two history entries. If `action` is itself `Decay`, it
    /// runs once.
    pub fn tick(&mut self, pet_id: PetId, action: Action) -> Result<Outcome, StoreError> {
        if action.is_time_driven() {
            return self.decay(pet_id);
        }
        self.decay(pet_id)?;
        self.perform(pet_id, action)
    }

    /// Current stored state of a pet.
    pub fn status(&self, pet_id: PetId) -> Result<Pet, StoreError> {
        self.store.load(pet_id)
    }

    /// History of a pet, oldest first.
    pub fn history(&self, pet_id: PetId) -> Result<Vec<HistoryEntry>, StoreError> {
        self.store.history(pet_id)
    }

    /// Make sure `username` exists and owns a pet, stamped with the engine clock.
    pub fn seed_default(&mut self, username: &str, pet_name: &str) -> Result<Pet, StoreError> {
        let now = self.clock.now();
        store::seed_default(&mut self.store, username, pet_name, now)
    }
}
