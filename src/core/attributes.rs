//! Bounded attribute vector for a pet.
//!
//! Every stat lives in `[STAT_MIN, STAT_MAX]`. Values are clamped per field
//! immediately after a delta is applied, so no transition can push one field
//! out of range by way of another.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Lower bound of every stat.
pub const STAT_MIN: f64 = 0.0;

/// Upper bound of every stat.
pub const STAT_MAX: f64 = 100.0;

/// Value every stat starts at when a pet is first created.
pub const DEFAULT_STAT: f64 = 50.0;

/// Clamp a raw stat value into `[STAT_MIN, STAT_MAX]`.
///
/// # Example
///
/// ```rust
/// use petsim::core::clamp_stat;
///
/// assert_eq!(clamp_stat(115.0), 100.0);
/// assert_eq!(clamp_stat(-20.0), 0.0);
/// assert_eq!(clamp_stat(42.5), 42.5);
/// ```
pub fn clamp_stat(value: f64) -> f64 {
    STAT_MIN.max(STAT_MAX.min(value))
}

/// Per-field change produced by a transition rule, before clamping.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatDelta {
    pub hunger: f64,
    pub happiness: f64,
    pub energy: f64,
}

impl StatDelta {
    /// A delta that leaves every field unchanged.
    pub const ZERO: StatDelta = StatDelta {
        hunger: 0.0,
        happiness: 0.0,
        energy: 0.0,
    };
}

/// The triple (hunger, happiness, energy) plus the instant it was last touched.
///
/// Values of this type are plain data: transitions consume one by reference and
/// return a new one. The store owns the durable copy.
///
/// # Example
///
/// ```rust
/// use petsim::core::{Attributes, StatDelta};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let attrs = Attributes::new(95.0, 50.0, 5.0, now);
/// let next = attrs.apply(
///     StatDelta { hunger: 10.0, happiness: 0.0, energy: -10.0 },
///     now,
/// );
///
/// assert_eq!(next.hunger, 100.0);
/// assert_eq!(next.energy, 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    /// Higher is hungrier
    pub hunger: f64,
    pub happiness: f64,
    pub energy: f64,
    /// When a transition was last applied (UTC)
    pub last_updated: DateTime<Utc>,
}

impl Attributes {
    /// Build an attribute vector, clamping each field into range.
    pub fn new(hunger: f64, happiness: f64, energy: f64, last_updated: DateTime<Utc>) -> Self {
        Self {
            hunger: clamp_stat(hunger),
            happiness: clamp_stat(happiness),
            energy: clamp_stat(energy),
            last_updated,
        }
    }

    /// Attributes of a freshly created pet.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self::new(DEFAULT_STAT, DEFAULT_STAT, DEFAULT_STAT, now)
    }

    /// Apply a delta, clamping each field independently, and stamp `now`.
    ///
    /// Pure: returns a new vector and leaves `self` untouched.
    pub fn apply(&self, delta: StatDelta, now: DateTime<Utc>) -> Self {
        Self {
            hunger: clamp_stat(self.hunger + delta.hunger),
            happiness: clamp_stat(self.happiness + delta.happiness),
            energy: clamp_stat(self.energy + delta.energy),
            last_updated: now,
        }
    }

    /// Check that every field is finite and within bounds.
    ///
    /// Accumulates every violation rather than stopping at the first, so a
    /// corrupt record reports all of its bad fields at once.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<AttributeViolation>> {
        let checks = vec![
            check_field("hunger", self.hunger),
            check_field("happiness", self.happiness),
            check_field("energy", self.energy),
        ];

        Validation::all_vec(checks).map(|_| ())
    }
}

fn check_field(
    field: &'static str,
    value: f64,
) -> Validation<(), NonEmptyVec<AttributeViolation>> {
    if !value.is_finite() {
        Validation::fail(AttributeViolation::NotFinite { field })
    } else if !(STAT_MIN..=STAT_MAX).contains(&value) {
        Validation::fail(AttributeViolation::OutOfRange { field, value })
    } else {
        Validation::success(())
    }
}

/// A single field of a stored attribute vector that breaks the bounds.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AttributeViolation {
    #[error("{field} = {value} is outside [0, 100]")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn clamp_stat_bounds_both_ends() {
        assert_eq!(clamp_stat(-0.5), 0.0);
        assert_eq!(clamp_stat(100.5), 100.0);
        assert_eq!(clamp_stat(0.0), 0.0);
        assert_eq!(clamp_stat(100.0), 100.0);
    }

    #[test]
    fn new_clamps_out_of_range_inputs() {
        let attrs = Attributes::new(-10.0, 150.0, 50.0, at(0));
        assert_eq!(attrs.hunger, 0.0);
        assert_eq!(attrs.happiness, 100.0);
        assert_eq!(attrs.energy, 50.0);
    }

    #[test]
    fn seeded_uses_defaults() {
        let attrs = Attributes::seeded(at(10));
        assert_eq!(attrs.hunger, DEFAULT_STAT);
        assert_eq!(attrs.happiness, DEFAULT_STAT);
        assert_eq!(attrs.energy, DEFAULT_STAT);
        assert_eq!(attrs.last_updated, at(10));
    }

    #[test]
    fn apply_clamps_each_field_independently() {
        let attrs = Attributes::new(95.0, 3.0, 50.0, at(0));
        let next = attrs.apply(
            StatDelta {
                hunger: 20.0,
                happiness: -10.0,
                energy: 5.0,
            },
            at(60),
        );

        assert_eq!(next.hunger, 100.0);
        assert_eq!(next.happiness, 0.0);
        assert_eq!(next.energy, 55.0);
        assert_eq!(next.last_updated, at(60));
    }

    #[test]
    fn apply_is_pure() {
        let attrs = Attributes::seeded(at(0));
        let _ = attrs.apply(
            StatDelta {
                hunger: 10.0,
                ..StatDelta::ZERO
            },
            at(1),
        );
        assert_eq!(attrs, Attributes::seeded(at(0)));
    }

    #[test]
    fn validate_accepts_bounded_values() {
        assert!(Attributes::seeded(at(0)).validate().is_success());
    }

    #[test]
    fn validate_accumulates_all_violations() {
        // Bypass the clamping constructor to mimic a corrupt stored row
        let attrs = Attributes {
            hunger: 120.0,
            happiness: f64::NAN,
            energy: -1.0,
            last_updated: at(0),
        };

        match attrs.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, AttributeViolation::NotFinite { field: "happiness" })));
            }
            Validation::Success(_) => panic!("Expected violations, got success"),
        }
    }

    #[test]
    fn attributes_serialize_correctly() {
        let attrs = Attributes::new(12.5, 80.0, 33.0, at(1_700_000_000));
        let json = serde_json::to_string(&attrs).unwrap();
        let deserialized: Attributes = serde_json::from_str(&json).unwrap();
        assert_eq!(attrs, deserialized);
    }
}
