//! Petsim: a virtual-pet stat simulation engine
//!
//! Petsim follows a "pure core, imperative shell" layout. The core computes
//! the next attribute vector from an action and the current instant, with no
//! side effects. The engine wraps it with loading, clock sampling and
//! persistence.
//!
//! # Core Concepts
//!
//! - **Attributes**: hunger, happiness and energy, each clamped to `[0, 100]`
//! - **Actions**: feed, play, train, misbehave and time-driven decay
//! - **History**: one immutable entry per applied transition
//! - **Stores**: the load/save/append contract, in memory or on SQLite
//!
//! # Example
//!
//! ```rust
//! use petsim::clock::ManualClock;
//! use petsim::core::Action;
//! use petsim::engine::PetEngine;
//! use petsim::store::MemoryStore;
//! use chrono::{Duration, Utc};
//!
//! let clock = ManualClock::new(Utc::now());
//! let mut engine = PetEngine::with_clock(MemoryStore::new(), clock.clone());
//! let pet = engine.seed_default("player1", "Fluffy").unwrap();
//!
//! let fed = engine.feed(pet.id).unwrap();
//! assert_eq!(fed.attributes.hunger, 20.0);
//!
//! clock.advance(Duration::minutes(10));
//! let decayed = engine.decay(pet.id).unwrap();
//! assert!((decayed.attributes.hunger - 25.0).abs() < 1e-9);
//!
//! let history = engine.history(pet.id).unwrap();
//! assert_eq!(history.len(), 2);
//! assert_eq!(history[1].action, Action::Decay);
//! ```

pub mod clock;
pub mod config;
pub mod core;
pub mod engine;
pub mod store;

// Re-export commonly used types
pub use crate::core::{Action, Attributes, HistoryEntry, HistoryLog, Pet, User};
pub use engine::{Outcome, PetEngine};
pub use store::{MemoryStore, PetStore, SqliteStore, StoreError};
