//! Note table operations
//!
//! Every statement that addresses a single note carries both `id` and
//! `owner_id` in its `WHERE` clause, and writes use `RETURNING` so the
//! conditional update and the read-back are one statement.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, Row, params, params_from_iter};
use uuid::Uuid;

use crate::db::sqlite::{format_timestamp, parse_timestamp};
use crate::db::store::{NoteStore, StoreError, StoreResult};
use crate::db::Database;
use crate::models::{NewNote, Note, NotePatch};
use crate::notes::query::NoteQuery;

const NOTE_COLUMNS: &str =
    "id, owner_id, title, content, tags, is_pinned, color, created_at, updated_at";

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    let tags_json: String = row.get(4)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;
    Ok(Note {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        tags: serde_json::from_str(&tags_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?,
        is_pinned: row.get(5)?,
        color: row.get(6)?,
        created_at: parse_timestamp(7, &created_at)?,
        updated_at: parse_timestamp(8, &updated_at)?,
    })
}

fn encode_tags(tags: &[String]) -> StoreResult<String> {
    serde_json::to_string(tags).map_err(|e| StoreError::Corrupt(format!("tags: {}", e)))
}

impl NoteStore for Database {
    fn insert_note(&self, owner_id: &str, note: &NewNote, now: DateTime<Utc>) -> StoreResult<Note> {
        let conn = self.conn()?;
        let id = Uuid::new_v4().to_string();
        let now_str = format_timestamp(now);
        let tags = encode_tags(&note.tags)?;

        let inserted = conn.query_row(
            &format!(
                "INSERT INTO notes (id, owner_id, title, content, tags, is_pinned, color, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?7)
                 RETURNING {}",
                NOTE_COLUMNS
            ),
            params![
                id,
                owner_id,
                note.title,
                note.content,
                tags,
                note.color,
                now_str,
            ],
            note_from_row,
        )?;

        Ok(inserted)
    }

    fn find_note(&self, owner_id: &str, note_id: &str) -> StoreResult<Option<Note>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                &format!("SELECT {} FROM notes WHERE id = ?1 AND owner_id = ?2", NOTE_COLUMNS),
                params![note_id, owner_id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    fn update_note(
        &self,
        owner_id: &str,
        note_id: &str,
        patch: &NotePatch,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Note>> {
        let conn = self.conn()?;
        let tags = patch.tags.as_deref().map(encode_tags).transpose()?;

        let note = conn
            .query_row(
                &format!(
                    "UPDATE notes SET
                        title = COALESCE(?3, title),
                        content = COALESCE(?4, content),
                        tags = COALESCE(?5, tags),
                        is_pinned = COALESCE(?6, is_pinned),
                        color = COALESCE(?7, color),
                        updated_at = ?8
                     WHERE id = ?1 AND owner_id = ?2
                     RETURNING {}",
                    NOTE_COLUMNS
                ),
                params![
                    note_id,
                    owner_id,
                    patch.title,
                    patch.content,
                    tags,
                    patch.is_pinned,
                    patch.color,
                    format_timestamp(now),
                ],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    fn toggle_pin(&self, owner_id: &str, note_id: &str, now: DateTime<Utc>) -> StoreResult<Option<Note>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                &format!(
                    "UPDATE notes SET is_pinned = NOT is_pinned, updated_at = ?3
                     WHERE id = ?1 AND owner_id = ?2
                     RETURNING {}",
                    NOTE_COLUMNS
                ),
                params![note_id, owner_id, format_timestamp(now)],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    fn delete_note(&self, owner_id: &str, note_id: &str) -> StoreResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND owner_id = ?2",
            params![note_id, owner_id],
        )?;
        Ok(rows > 0)
    }

    fn query_notes(&self, query: &NoteQuery) -> StoreResult<(Vec<Note>, u64)> {
        let conn = self.conn()?;
        let filter = query.filter();
        let tx = conn.unchecked_transaction()?;

        let total: i64 = tx.query_row(
            &format!("SELECT COUNT(*) FROM notes WHERE {}", filter.clause),
            params_from_iter(filter.params.iter()),
            |row| row.get(0),
        )?;

        let mut page_params = filter.params.clone();
        page_params.push(Value::Integer(query.limit()));
        page_params.push(Value::Integer(query.offset()));

        let notes = {
            let mut stmt = tx.prepare(&format!(
                "SELECT {} FROM notes WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
                NOTE_COLUMNS,
                filter.clause,
                NoteQuery::ORDER_BY
            ))?;
            let rows = stmt.query_map(params_from_iter(page_params.iter()), note_from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;

        Ok((notes, total.max(0) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::UserStore;
    use crate::models::NewUser;
    use crate::notes::query::ListParams;
    use chrono::Duration;
    use tempfile::{TempDir, tempdir};

    fn setup() -> (TempDir, Database, String, String) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("notes.db").to_str().unwrap(), 2).unwrap();
        let mk = |email: &str| NewUser {
            name: "Owner".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
        };
        let alice = db.insert_user(&mk("alice@example.com")).unwrap().id;
        let bob = db.insert_user(&mk("bob@example.com")).unwrap().id;
        (dir, db, alice, bob)
    }

    fn new_note(title: &str, content: &str, tags: &[&str]) -> NewNote {
        NewNote {
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            color: "#ffffff".to_string(),
        }
    }

    #[test]
    fn test_insert_and_find_is_owner_scoped() {
        let (_dir, db, alice, bob) = setup();
        let note = db
            .insert_note(&alice, &new_note("Groceries", "milk", &["home", "todo"]), Utc::now())
            .expect("Failed to insert note");

        assert_eq!(note.owner_id, alice);
        assert_eq!(note.tags, vec!["home", "todo"]);
        assert!(!note.is_pinned);

        assert!(db.find_note(&alice, &note.id).unwrap().is_some());
        assert!(db.find_note(&bob, &note.id).unwrap().is_none());
    }

    #[test]
    fn test_insert_requires_existing_owner() {
        let (_dir, db, _alice, _bob) = setup();
        let result = db.insert_note("no-such-user", &new_note("t", "c", &[]), Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn test_update_applies_only_supplied_fields() {
        let (_dir, db, alice, bob) = setup();
        let created = Utc::now();
        let note = db.insert_note(&alice, &new_note("Old", "body", &["a"]), created).unwrap();

        let patch = NotePatch {
            title: Some("New".to_string()),
            color: Some("#000000".to_string()),
            ..Default::default()
        };
        let later = created + Duration::seconds(5);

        assert!(db.update_note(&bob, &note.id, &patch, later).unwrap().is_none());

        let updated = db.update_note(&alice, &note.id, &patch, later).unwrap().unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.content, "body");
        assert_eq!(updated.tags, vec!["a"]);
        assert_eq!(updated.color, "#000000");
        assert_eq!(updated.owner_id, alice);
        assert!(updated.updated_at > updated.created_at);
    }

    #[test]
    fn test_toggle_pin_twice_restores() {
        let (_dir, db, alice, bob) = setup();
        let note = db.insert_note(&alice, &new_note("t", "c", &[]), Utc::now()).unwrap();

        assert!(db.toggle_pin(&bob, &note.id, Utc::now()).unwrap().is_none());

        let once = db.toggle_pin(&alice, &note.id, Utc::now()).unwrap().unwrap();
        assert!(once.is_pinned);
        let twice = db.toggle_pin(&alice, &note.id, Utc::now()).unwrap().unwrap();
        assert!(!twice.is_pinned);
    }

    #[test]
    fn test_delete_is_owner_scoped() {
        let (_dir, db, alice, bob) = setup();
        let note = db.insert_note(&alice, &new_note("t", "c", &[]), Utc::now()).unwrap();

        assert!(!db.delete_note(&bob, &note.id).unwrap());
        assert!(db.find_note(&alice, &note.id).unwrap().is_some());

        assert!(db.delete_note(&alice, &note.id).unwrap());
        assert!(db.find_note(&alice, &note.id).unwrap().is_none());
        assert!(!db.delete_note(&alice, &note.id).unwrap());
    }

    #[test]
    fn test_query_filters_and_orders() {
        let (_dir, db, alice, bob) = setup();
        let base = Utc::now();

        let pinned_old = db
            .insert_note(&alice, &new_note("Pinned", "old thoughts", &["work"]), base)
            .unwrap();
        db.toggle_pin(&alice, &pinned_old.id, base).unwrap();
        db.insert_note(&alice, &new_note("Fruit", "an apple a day", &["health"]), base + Duration::seconds(10))
            .unwrap();
        db.insert_note(&alice, &new_note("Recent", "nothing", &["work"]), base + Duration::seconds(20))
            .unwrap();
        db.insert_note(&bob, &new_note("Apple", "bob's apple", &["work"]), base).unwrap();

        let all = NoteQuery::new(&alice, ListParams::default());
        let (notes, total) = db.query_notes(&all).unwrap();
        assert_eq!(total, 3);
        let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Pinned", "Recent", "Fruit"]);

        let search = NoteQuery::new(
            &alice,
            ListParams {
                search: Some("APPLE".to_string()),
                ..Default::default()
            },
        );
        let (notes, total) = db.query_notes(&search).unwrap();
        assert_eq!(total, 1);
        assert_eq!(notes[0].title, "Fruit");

        let tagged = NoteQuery::new(
            &alice,
            ListParams {
                tag: Some("work".to_string()),
                ..Default::default()
            },
        );
        let (notes, total) = db.query_notes(&tagged).unwrap();
        assert_eq!(total, 2);
        assert!(notes.iter().all(|n| n.owner_id == alice));
    }

    #[test]
    fn test_query_treats_wildcards_literally() {
        let (_dir, db, alice, _bob) = setup();
        db.insert_note(&alice, &new_note("Plain", "nothing special", &[]), Utc::now()).unwrap();
        db.insert_note(&alice, &new_note("Discount", "50% off", &[]), Utc::now()).unwrap();

        let query = NoteQuery::new(
            &alice,
            ListParams {
                search: Some("%".to_string()),
                ..Default::default()
            },
        );
        let (notes, total) = db.query_notes(&query).unwrap();
        assert_eq!(total, 1);
        assert_eq!(notes[0].title, "Discount");
    }
}
