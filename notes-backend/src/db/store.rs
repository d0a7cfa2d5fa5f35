//! Persistence contracts injected into the auth and notes services.
//!
//! # Invariants
//! - Every note read or write that names a note id also names its owner; the
//!   `(id, owner)` pair is evaluated inside a single SQL statement.
//! - `insert_user` rejects a second registration for the same email
//!   (case-insensitive) with [`StoreError::DuplicateEmail`].

use chrono::{DateTime, Utc};

use crate::models::{NewNote, NewUser, Note, NotePatch, User};
use crate::notes::query::NoteQuery;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("failed to prepare database path: {0}")]
    Io(#[from] std::io::Error),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable record of registered identities.
pub trait UserStore: Send + Sync {
    /// Stores a new identity and returns it with its generated id and timestamps.
    fn insert_user(&self, new_user: &NewUser) -> StoreResult<User>;
    /// Case-insensitive lookup by email.
    fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>>;
}

/// Durable record of notes, always addressed through their owner.
pub trait NoteStore: Send + Sync {
    fn insert_note(&self, owner_id: &str, note: &NewNote, now: DateTime<Utc>) -> StoreResult<Note>;
    fn find_note(&self, owner_id: &str, note_id: &str) -> StoreResult<Option<Note>>;
    /// Applies `patch` and bumps `updated_at` in one conditional statement.
    /// Returns `None` when no note matches `(note_id, owner_id)`.
    fn update_note(
        &self,
        owner_id: &str,
        note_id: &str,
        patch: &NotePatch,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Note>>;
    /// Flips `is_pinned` in one conditional statement.
    fn toggle_pin(&self, owner_id: &str, note_id: &str, now: DateTime<Utc>) -> StoreResult<Option<Note>>;
    /// Returns `true` when a matching note was removed.
    fn delete_note(&self, owner_id: &str, note_id: &str) -> StoreResult<bool>;
    /// Runs the page and count queries described by `query` against one snapshot.
    fn query_notes(&self, query: &NoteQuery) -> StoreResult<(Vec<Note>, u64)>;
}
