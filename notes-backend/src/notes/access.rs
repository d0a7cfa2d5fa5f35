//! Owner-scoped note operations.
//!
//! Every method takes the authenticated owner's id and forwards it to the
//! store alongside the note id. A note owned by someone else is reported as
//! not found, the same as a note that does not exist.

use chrono::Utc;
use std::sync::Arc;

use crate::db::NoteStore;
use crate::error::ApiError;
use crate::models::{NewNote, Note, NoteListResponse, NotePatch};
use crate::notes::query::{ListParams, NoteQuery};

const NOTE: &str = "Note";

#[derive(Clone)]
pub struct NoteAccessController {
    store: Arc<dyn NoteStore>,
}

impl NoteAccessController {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub fn create(&self, owner_id: &str, note: NewNote) -> Result<Note, ApiError> {
        let created = self.store.insert_note(owner_id, &note, Utc::now())?;
        log::info!("[NOTES] Created note {} for user {}", created.id, owner_id);
        Ok(created)
    }

    pub fn get(&self, owner_id: &str, note_id: &str) -> Result<Note, ApiError> {
        self.store
            .find_note(owner_id, note_id)?
            .ok_or(ApiError::NotFound(NOTE))
    }

    pub fn update(&self, owner_id: &str, note_id: &str, patch: NotePatch) -> Result<Note, ApiError> {
        let updated = self
            .store
            .update_note(owner_id, note_id, &patch, Utc::now())?
            .ok_or(ApiError::NotFound(NOTE))?;
        log::debug!("[NOTES] Updated note {}", note_id);
        Ok(updated)
    }

    pub fn delete(&self, owner_id: &str, note_id: &str) -> Result<(), ApiError> {
        if !self.store.delete_note(owner_id, note_id)? {
            return Err(ApiError::NotFound(NOTE));
        }
        log::info!("[NOTES] Deleted note {} for user {}", note_id, owner_id);
        Ok(())
    }

    pub fn toggle_pin(&self, owner_id: &str, note_id: &str) -> Result<Note, ApiError> {
        let note = self
            .store
            .toggle_pin(owner_id, note_id, Utc::now())?
            .ok_or(ApiError::NotFound(NOTE))?;
        log::debug!("[NOTES] Note {} pinned={}", note_id, note.is_pinned);
        Ok(note)
    }

    pub fn list(&self, owner_id: &str, params: ListParams) -> Result<NoteListResponse, ApiError> {
        let query = NoteQuery::new(owner_id, params);
        let (notes, total) = self.store.query_notes(&query)?;
        Ok(NoteListResponse {
            notes,
            total,
            total_pages: query.total_pages(total),
            current_page: query.page(),
        })
    }
}
