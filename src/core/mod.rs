//! Core simulation types and logic.
//!
//! This module contains the pure core of the pet simulation:
//! - Bounded attribute vectors and clamp discipline
//! - The fixed action set and its transition rules
//! - Immutable history tracking
//!
//! Nothing in this module reads the clock or touches storage.

mod action;
mod attributes;
mod history;
mod pet;
pub mod rules;

pub use action::{Action, ParseActionError};
pub use attributes::{
    clamp_stat, AttributeViolation, Attributes, StatDelta, DEFAULT_STAT, STAT_MAX, STAT_MIN,
};
pub use history::{HistoryEntry, HistoryLog};
pub use pet::{Pet, PetId, User, UserId};
pub use rules::elapsed_minutes;
