//! User (credential) table operations

use chrono::Utc;
use rusqlite::{OptionalExtension, Row, params};
use uuid::Uuid;

use crate::db::sqlite::{format_timestamp, parse_timestamp};
use crate::db::store::{StoreError, StoreResult, UserStore};
use crate::db::Database;
use crate::models::{NewUser, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, avatar, created_at, updated_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        avatar: row.get(4)?,
        created_at: parse_timestamp(5, &created_at)?,
        updated_at: parse_timestamp(6, &updated_at)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl UserStore for Database {
    fn insert_user(&self, new_user: &NewUser) -> StoreResult<User> {
        let conn = self.conn()?;
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let now_str = format_timestamp(now);

        conn.execute(
            "INSERT INTO users (id, name, email, password_hash, avatar, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?5)",
            params![id, new_user.name, new_user.email, new_user.password_hash, now_str],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEmail
            } else {
                StoreError::Sqlite(e)
            }
        })?;

        Ok(User {
            id,
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            avatar: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
                params![email.trim()],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }
}
