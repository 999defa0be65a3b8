//! Cardsmith Storage Layer
//!
//! Implements the `DeckStore` and `UserStore` traits on SQLite.
//!
//! # Schema
//!
//! - `users`: username and SHA-256 password digest
//! - `decks`: one row per saved deck, keyed by its UUIDv7 `DeckId`
//! - `cards`: question/answer rows with their position in the deck, deleted
//!   together with their deck
//!
//! # Examples
//!
//! ```
//! use cardsmith_domain::Flashcard;
//! use cardsmith_domain::traits::DeckStore;
//! use cardsmith_store::SqliteStore;
//!
//! let mut store = SqliteStore::new(":memory:").unwrap();
//! let id = store
//!     .save_deck("alice", "Biology", &[Flashcard::new("What is ATP?", "Energy currency")])
//!     .unwrap();
//! assert_eq!(store.load_deck(id).unwrap().len(), 1);
//! ```

#![warn(missing_docs)]

use cardsmith_domain::traits::{DeckStore, UserStore};
use cardsmith_domain::{Deck, DeckId, DeckSummary, Flashcard};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Deck not found
    #[error("Deck not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Username already taken
    #[error("User already exists: {0}")]
    DuplicateUser(String),

    /// Rejected input, such as an empty deck name
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// SQLite-based implementation of DeckStore and UserStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cardsmith_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("cardsmith.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Convert DeckId to bytes for storage
    fn deck_id_to_bytes(id: DeckId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to DeckId
    fn bytes_to_deck_id(bytes: &[u8]) -> Result<DeckId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for DeckId, got {}", bytes.len()))
        })?;
        Ok(DeckId::from_value(u128::from_be_bytes(arr)))
    }

    fn row_deck_id(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DeckId> {
        let id_bytes: Vec<u8> = row.get(idx)?;
        Self::bytes_to_deck_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Blob, Box::new(e))
        })
    }

    fn deck_exists(&self, id_bytes: &[u8]) -> Result<bool, StoreError> {
        let exists = self
            .conn
            .query_row("SELECT 1 FROM decks WHERE id = ?1", params![id_bytes], |_| Ok(true))
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    fn cards_for(&self, id_bytes: &[u8]) -> Result<Vec<Flashcard>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT question, answer FROM cards WHERE deck_id = ?1 ORDER BY position",
        )?;

        let cards = stmt
            .query_map(params![id_bytes], |row| {
                Ok(Flashcard {
                    question: row.get(0)?,
                    answer: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cards)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// SHA-256 hex digest of a password
fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl DeckStore for SqliteStore {
    type Error = StoreError;

    fn save_deck(&mut self, owner: &str, name: &str, cards: &[Flashcard]) -> Result<DeckId, Self::Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("deck name must not be empty".to_string()));
        }

        let id = DeckId::new();
        let id_bytes = Self::deck_id_to_bytes(id);

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO decks (id, owner, name, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![&id_bytes, owner, name, now_secs() as i64],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO cards (deck_id, position, question, answer) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (position, card) in cards.iter().enumerate() {
                stmt.execute(params![&id_bytes, position as i64, &card.question, &card.answer])?;
            }
        }
        tx.commit()?;

        info!("Saved deck '{}' ({}) with {} cards for {}", name, id, cards.len(), owner);
        Ok(id)
    }

    fn list_decks(&self, owner: &str) -> Result<Vec<DeckSummary>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT d.id, d.name, d.created_at, COUNT(c.position)
             FROM decks d LEFT JOIN cards c ON c.deck_id = d.id
             WHERE d.owner = ?1
             GROUP BY d.id
             ORDER BY d.created_at DESC, d.id DESC",
        )?;

        let decks = stmt
            .query_map(params![owner], |row| {
                Ok(DeckSummary {
                    id: Self::row_deck_id(row, 0)?,
                    name: row.get(1)?,
                    created_at: row.get::<_, i64>(2)? as u64,
                    card_count: row.get::<_, i64>(3)? as usize,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Listed {} decks for {}", decks.len(), owner);
        Ok(decks)
    }

    fn load_deck(&self, id: DeckId) -> Result<Vec<Flashcard>, Self::Error> {
        let id_bytes = Self::deck_id_to_bytes(id);
        if !self.deck_exists(&id_bytes)? {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.cards_for(&id_bytes)
    }

    fn get_deck(&self, id: DeckId) -> Result<Option<Deck>, Self::Error> {
        let id_bytes = Self::deck_id_to_bytes(id);

        let header = self
            .conn
            .query_row(
                "SELECT owner, name, created_at FROM decks WHERE id = ?1",
                params![&id_bytes],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)? as u64,
                    ))
                },
            )
            .optional()?;

        let Some((owner, name, created_at)) = header else {
            return Ok(None);
        };

        Ok(Some(Deck {
            id,
            owner,
            name,
            created_at,
            cards: self.cards_for(&id_bytes)?,
        }))
    }

    fn delete_deck(&mut self, id: DeckId) -> Result<bool, Self::Error> {
        let id_bytes = Self::deck_id_to_bytes(id);
        let deleted = self
            .conn
            .execute("DELETE FROM decks WHERE id = ?1", params![&id_bytes])?;

        if deleted > 0 {
            info!("Deleted deck {}", id);
        }
        Ok(deleted > 0)
    }
}

impl UserStore for SqliteStore {
    type Error = StoreError;

    fn create_user(&mut self, username: &str, password: &str) -> Result<(), Self::Error> {
        let username = username.trim();
        if username.is_empty() {
            return Err(StoreError::InvalidInput("username must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(StoreError::InvalidInput("password must not be empty".to_string()));
        }

        let inserted = self.conn.execute(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(username) DO NOTHING",
            params![username, hash_password(password), now_secs() as i64],
        )?;

        if inserted == 0 {
            return Err(StoreError::DuplicateUser(username.to_string()));
        }

        info!("Created user {}", username);
        Ok(())
    }

    fn verify_credentials(&self, username: &str, password: &str) -> Result<bool, Self::Error> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT password_hash FROM users WHERE username = ?1",
                params![username.trim()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(stored.is_some_and(|hash| hash == hash_password(password)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_id_bytes_round_trip() {
        let id = DeckId::new();
        let bytes = SqliteStore::deck_id_to_bytes(id);
        assert_eq!(bytes.len(), 16);
        assert_eq!(SqliteStore::bytes_to_deck_id(&bytes).unwrap(), id);
    }

    #[test]
    fn test_bad_id_length() {
        let result = SqliteStore::bytes_to_deck_id(&[1, 2, 3]);
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_hash_password() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
        assert_ne!(hash_password("a"), hash_password("b"));
    }
}
