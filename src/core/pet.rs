//! Pet and owner records.

use super::attributes::Attributes;
use serde::{Deserialize, Serialize};

pub type PetId = i64;
pub type UserId = i64;

/// A player account. Usernames are unique.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// A pet as held by a store: identity, owner and current attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub owner: UserId,
    pub attributes: Attributes,
}
