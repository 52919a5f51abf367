//! The fixed set of transitions a pet can undergo.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A named transition.
///
/// Four variants are player actions with fixed deltas. `Decay` is driven by
/// elapsed time instead.
///
/// # Example
///
/// ```rust
/// use petsim::core::Action;
///
/// let action: Action = "feed".parse().unwrap();
/// assert_eq!(action, Action::Feed);
/// assert_eq!(action.name(), "feed");
/// assert_eq!(action.description(), "Fed the pet");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Feed,
    Play,
    Train,
    Misbehave,
    Decay,
}

impl Action {
    /// Every action, in a stable order.
    pub const ALL: [Action; 5] = [
        Action::Feed,
        Action::Play,
        Action::Train,
        Action::Misbehave,
        Action::Decay,
    ];

    /// Stable label used for persistence and the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Play => "play",
            Self::Train => "train",
            Self::Misbehave => "misbehave",
            Self::Decay => "decay",
        }
    }

    /// Human-readable line for history displays.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Feed => "Fed the pet",
            Self::Play => "Played with the pet",
            Self::Train => "Trained the pet",
            Self::Misbehave => "Pet acted self-destructive",
            Self::Decay => "Stats decayed over time",
        }
    }

    /// True for the transition computed from elapsed time.
    pub fn is_time_driven(&self) -> bool {
        matches!(self, Self::Decay)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a label does not name any action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown action '{0}'")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.name() == s)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}
