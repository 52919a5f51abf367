//! Durable store backed by SQLite.

use super::{ensure_valid, PetStore, StoreError};
use crate::core::{Action, Attributes, HistoryEntry, Pet, PetId, User, UserId};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS users (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  username TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS pets (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL,
  hunger REAL NOT NULL DEFAULT 50,
  happiness REAL NOT NULL DEFAULT 50,
  energy REAL NOT NULL DEFAULT 50,
  last_updated TEXT NOT NULL,
  user_id INTEGER NOT NULL,
  FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS pet_history (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  pet_id INTEGER NOT NULL,
  action TEXT NOT NULL,
  timestamp TEXT NOT NULL,
  FOREIGN KEY (pet_id) REFERENCES pets(id)
);

CREATE INDEX IF NOT EXISTS idx_pet_history_pet_ts
  ON pet_history(pet_id, timestamp, id);
";

const SELECT_PET: &str =
    "SELECT id, name, hunger, happiness, energy, last_updated, user_id FROM pets";

/// Store that owns one SQLite connection.
///
/// The connection is opened in [`SqliteStore::open`] and closed on drop.
/// [`PetStore::commit`] runs inside a single transaction.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening sqlite store");
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Raw connection, for inspection and tooling.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl PetStore for SqliteStore {
    fn create_user(&mut self, username: &str) -> Result<User, StoreError> {
        if self.find_user(username)?.is_some() {
            return Err(StoreError::DuplicateUsername {
                username: username.to_string(),
            });
        }

        self.conn
            .execute("INSERT INTO users (username) VALUES (?1)", params![username])?;
        let user = User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
        };
        info!(user_id = user.id, username, "created user");
        Ok(user)
    }

    fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn create_pet(
        &mut self,
        owner: UserId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Pet, StoreError> {
        let exists = self
            .conn
            .query_row("SELECT 1 FROM users WHERE id = ?1", params![owner], |_| {
                Ok(())
            })
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::UserNotFound { user_id: owner });
        }

        let attributes = Attributes::seeded(now);
        self.conn.execute(
            "INSERT INTO pets (name, hunger, happiness, energy, last_updated, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                name,
                attributes.hunger,
                attributes.happiness,
                attributes.energy,
                format_timestamp(now),
                owner,
            ],
        )?;

        let pet = Pet {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            owner,
            attributes,
        };
        info!(pet_id = pet.id, owner, name, "created pet");
        Ok(pet)
    }

    fn pets_for_user(&self, owner: UserId) -> Result<Vec<Pet>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_PET} WHERE user_id = ?1 ORDER BY id ASC"))?;
        let rows = stmt
            .query_map(params![owner], PetRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(PetRow::into_pet).collect()
    }

    fn load(&self, pet_id: PetId) -> Result<Pet, StoreError> {
        debug!(pet_id, "loading pet");
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_PET} WHERE id = ?1"),
                params![pet_id],
                PetRow::from_row,
            )
            .optional()?
            .ok_or(StoreError::PetNotFound { pet_id })?;

        row.into_pet()
    }

    fn save(&mut self, pet_id: PetId, attributes: &Attributes) -> Result<(), StoreError> {
        write_attributes(&self.conn, pet_id, attributes)
    }

    fn append_history(&mut self, entry: &HistoryEntry) -> Result<(), StoreError> {
        insert_history(&self.conn, entry)
    }

    fn commit(
        &mut self,
        pet_id: PetId,
        attributes: &Attributes,
        entry: &HistoryEntry,
    ) -> Result<(), StoreError> {
        // Dropping the transaction on an early return rolls both writes back
        let tx = self.conn.transaction()?;
        write_attributes(&tx, pet_id, attributes)?;
        insert_history(&tx, entry)?;
        tx.commit()?;

        debug!(pet_id, action = %entry.action, "committed transition");
        Ok(())
    }

    fn history(&self, pet_id: PetId) -> Result<Vec<HistoryEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT pet_id, action, timestamp FROM pet_history
             WHERE pet_id = ?1 ORDER BY timestamp ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(params![pet_id], |row| {
                Ok((
                    row.get::<_, PetId>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(pet_id, action, timestamp)| {
                let action = action
                    .parse::<Action>()
                    .map_err(|err| StoreError::CorruptRecord {
                        pet_id,
                        reason: err.to_string(),
                    })?;
                Ok(HistoryEntry::new(
                    pet_id,
                    action,
                    parse_timestamp(pet_id, &timestamp)?,
                ))
            })
            .collect()
    }
}

fn write_attributes(
    conn: &Connection,
    pet_id: PetId,
    attributes: &Attributes,
) -> Result<(), StoreError> {
    ensure_valid(pet_id, attributes)?;
    let changed = conn.execute(
        "UPDATE pets SET hunger = ?1, happiness = ?2, energy = ?3, last_updated = ?4
         WHERE id = ?5",
        params![
            attributes.hunger,
            attributes.happiness,
            attributes.energy,
            format_timestamp(attributes.last_updated),
            pet_id,
        ],
    )?;

    if changed == 0 {
        return Err(StoreError::PetNotFound { pet_id });
    }
    Ok(())
}

fn insert_history(conn: &Connection, entry: &HistoryEntry) -> Result<(), StoreError> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM pets WHERE id = ?1",
            params![entry.pet_id],
            |_| Ok(()),
        )
        .optional()?;
    if exists.is_none() {
        return Err(StoreError::PetNotFound {
            pet_id: entry.pet_id,
        });
    }

    conn.execute(
        "INSERT INTO pet_history (pet_id, action, timestamp) VALUES (?1, ?2, ?3)",
        params![
            entry.pet_id,
            entry.action.name(),
            format_timestamp(entry.timestamp),
        ],
    )?;
    Ok(())
}

/// Fixed-width RFC 3339 so that text order matches time order.
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(pet_id: PetId, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| StoreError::CorruptRecord {
            pet_id,
            reason: format!("invalid timestamp '{raw}': {err}"),
        })
}

struct PetRow {
    id: PetId,
    name: String,
    hunger: f64,
    happiness: f64,
    energy: f64,
    last_updated: String,
    owner: UserId,
}

impl PetRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            hunger: row.get(2)?,
            happiness: row.get(3)?,
            energy: row.get(4)?,
            last_updated: row.get(5)?,
            owner: row.get(6)?,
        })
    }

    fn into_pet(self) -> Result<Pet, StoreError> {
        let attributes = Attributes {
            hunger: self.hunger,
            happiness: self.happiness,
            energy: self.energy,
            last_updated: parse_timestamp(self.id, &self.last_updated)?,
        };
        ensure_valid(self.id, &attributes)?;

        Ok(Pet {
            id: self.id,
            name: self.name,
            owner: self.owner,
            attributes,
        })
    }
}
