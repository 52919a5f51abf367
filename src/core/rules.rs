//! Pure transition rules.
//!
//! Every function here is deterministic and total: given an attribute vector
//! and the instant at which the transition happens, it returns the next vector.
//! The caller samples the clock once and passes the same `now` to the rule and
//! to the history entry.

use super::action::Action;
use super::attributes::{Attributes, StatDelta};
use chrono::{DateTime, Utc};

pub const FEED: StatDelta = StatDelta {
    hunger: -30.0,
    happiness: 0.0,
    energy: 10.0,
};

pub const PLAY: StatDelta = StatDelta {
    hunger: 10.0,
    happiness: 25.0,
    energy: -15.0,
};

pub const TRAIN: StatDelta = StatDelta {
    hunger: 0.0,
    happiness: -5.0,
    energy: -20.0,
};

pub const MISBEHAVE: StatDelta = StatDelta {
    hunger: 0.0,
    happiness: -20.0,
    energy: -10.0,
};

/// Hunger gained per idle minute.
pub const HUNGER_PER_MINUTE: f64 = 0.5;

/// Happiness lost per idle minute.
pub const HAPPINESS_PER_MINUTE: f64 = 0.2;

/// Energy lost per idle minute.
pub const ENERGY_PER_MINUTE: f64 = 0.3;

/// Fixed delta for a player action, or `None` for `Decay`.
pub fn action_delta(action: Action) -> Option<StatDelta> {
    match action {
        Action::Feed => Some(FEED),
        Action::Play => Some(PLAY),
        Action::Train => Some(TRAIN),
        Action::Misbehave => Some(MISBEHAVE),
        Action::Decay => None,
    }
}

/// Minutes between `last_updated` and `now`, fractional.
///
/// A negative span (clock skew) counts as zero.
///
/// # Example
///
/// ```rust
/// use petsim::core::elapsed_minutes;
/// use chrono::{Duration, Utc};
///
/// let then = Utc::now();
/// assert_eq!(elapsed_minutes(then, then + Duration::seconds(90)), 1.5);
/// assert_eq!(elapsed_minutes(then, then - Duration::seconds(90)), 0.0);
/// ```
pub fn elapsed_minutes(last_updated: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = now.signed_duration_since(last_updated).num_milliseconds();
    let seconds = millis as f64 / 1000.0;
    (seconds / 60.0).max(0.0)
}

/// Delta accumulated over `elapsed` idle minutes.
pub fn decay_delta(elapsed: f64) -> StatDelta {
    let elapsed = elapsed.max(0.0);
    StatDelta {
        hunger: elapsed * HUNGER_PER_MINUTE,
        happiness: -elapsed * HAPPINESS_PER_MINUTE,
        energy: -elapsed * ENERGY_PER_MINUTE,
    }
}

pub fn feed(attrs: &Attributes, now: DateTime<Utc>) -> Attributes {
    attrs.apply(FEED, now)
}

pub fn play(attrs: &Attributes, now: DateTime<Utc>) -> Attributes {
    attrs.apply(PLAY, now)
}

pub fn train(attrs: &Attributes, now: DateTime<Utc>) -> Attributes {
    attrs.apply(TRAIN, now)
}

pub fn misbehave(attrs: &Attributes, now: DateTime<Utc>) -> Attributes {
    attrs.apply(MISBEHAVE, now)
}

/// Drift the stats for the time since `attrs.last_updated` and stamp `now`.
///
/// With no time passed the fields stay put, but `last_updated` still moves to
/// `now`. Each call applies the full elapsed span, so calling twice after real
/// time has passed decays twice.
pub fn decay(attrs: &Attributes, now: DateTime<Utc>) -> Attributes {
    let elapsed = elapsed_minutes(attrs.last_updated, now);
    attrs.apply(decay_delta(elapsed), now)
}

/// Apply any action.
pub fn apply(action: Action, attrs: &Attributes, now: DateTime<Utc>) -> Attributes {
    match action_delta(action) {
        Some(delta) => attrs.apply(delta, now),
        None => decay(attrs, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::{STAT_MAX, STAT_MIN};
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn attrs(hunger: f64, happiness: f64, energy: f64) -> Attributes {
        Attributes::new(hunger, happiness, energy, start())
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn feed_lowers_hunger() {
        let now = start() + Duration::minutes(1);
        assert_eq!(feed(&attrs(50.0, 50.0, 50.0), now).hunger, 20.0);
    }

    #[test]
    fn feed_floors_hunger_at_zero() {
        let next = feed(&attrs(10.0, 50.0, 50.0), start());
        assert_eq!(next.hunger, 0.0);
        assert_eq!(next.energy, 60.0);
    }

    #[test]
    fn play_caps_happiness_at_hundred() {
        let next = play(&attrs(50.0, 90.0, 50.0), start());
        assert_eq!(next.happiness, 100.0);
        assert_eq!(next.hunger, 60.0);
        assert_eq!(next.energy, 35.0);
    }

    #[test]
    fn train_twice_compounds() {
        let once = train(&attrs(50.0, 50.0, 100.0), start());
        let twice = train(&once, start());
        assert_eq!(twice.energy, 60.0);
        assert_eq!(twice.happiness, 40.0);
        assert_eq!(twice.hunger, 50.0);
    }

    #[test]
    fn misbehave_costs_happiness_and_energy() {
        let next = misbehave(&attrs(50.0, 15.0, 5.0), start());
        assert_eq!(next.happiness, 0.0);
        assert_eq!(next.energy, 0.0);
        assert_eq!(next.hunger, 50.0);
    }

    #[test]
    fn actions_stamp_now() {
        let now = start() + Duration::hours(3);
        for action in Action::ALL {
            assert_eq!(apply(action, &attrs(50.0, 50.0, 50.0), now).last_updated, now);
        }
    }

    #[test]
    fn decay_over_hundred_minutes() {
        let now = start() + Duration::minutes(100);
        let next = decay(&attrs(50.0, 50.0, 50.0), now);

        assert_close(next.hunger, 100.0);
        assert_close(next.happiness, 30.0);
        assert_close(next.energy, 20.0);
        assert_eq!(next.last_updated, now);
    }

    #[test]
    fn decay_with_no_elapsed_time_only_moves_timestamp() {
        let before = attrs(42.0, 17.0, 88.0);
        let next = decay(&before, start());

        assert_eq!(next.hunger, 42.0);
        assert_eq!(next.happiness, 17.0);
        assert_eq!(next.energy, 88.0);
        assert_eq!(next.last_updated, start());
    }

    #[test]
    fn decay_treats_negative_elapsed_as_zero() {
        let before = attrs(42.0, 17.0, 88.0);
        let skewed = start() - Duration::minutes(30);
        let next = decay(&before, skewed);

        assert_eq!(next.hunger, 42.0);
        assert_eq!(next.happiness, 17.0);
        assert_eq!(next.energy, 88.0);
        assert_eq!(next.last_updated, skewed);
    }

    #[test]
    fn decay_handles_fractional_minutes() {
        let now = start() + Duration::seconds(30);
        let next = decay(&attrs(50.0, 50.0, 50.0), now);

        assert_close(next.hunger, 50.25);
        assert_close(next.happiness, 49.9);
        assert_close(next.energy, 49.85);
    }

    #[test]
    fn decay_applies_once_per_call() {
        let first = decay(&attrs(0.0, 100.0, 100.0), start() + Duration::minutes(10));
        let second = decay(&first, start() + Duration::minutes(20));

        assert_close(second.hunger, 10.0);
        assert_close(second.happiness, 96.0);
        assert_close(second.energy, 94.0);
    }

    #[test]
    fn elapsed_minutes_is_fractional() {
        let now = start() + Duration::milliseconds(45_000);
        assert_close(elapsed_minutes(start(), now), 0.75);
    }

    #[test]
    fn every_action_stays_in_bounds_from_extremes() {
        let extremes = [STAT_MIN, STAT_MAX];
        let later = start() + Duration::days(7);
        for &h in &extremes {
            for &p in &extremes {
                for &e in &extremes {
                    for action in Action::ALL {
                        let next = apply(action, &attrs(h, p, e), later);
                        for value in [next.hunger, next.happiness, next.energy] {
                            assert!((STAT_MIN..=STAT_MAX).contains(&value));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn only_decay_lacks_fixed_delta() {
        assert!(action_delta(Action::Decay).is_none());
        assert_eq!(action_delta(Action::Feed), Some(FEED));
    }
}
