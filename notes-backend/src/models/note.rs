use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

/// A note as stored and as returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(rename = "userId")]
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new note. The owner is supplied separately by the
/// authenticated caller, never by the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub color: String,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub color: Option<String>,
}

impl CreateNoteRequest {
    pub fn validate(&self) -> Result<NewNote, ValidationError> {
        let title =
            validation::required_text("title", self.title.as_deref(), validation::TITLE_MAX_CHARS)?;
        let content = match self.content.as_deref() {
            Some(content) => validation::note_content(content)?,
            None => return Err(ValidationError::new("content", "\"content\" is required")),
        };
        let tags = match &self.tags {
            Some(tags) => validation::tags(tags)?,
            None => Vec::new(),
        };
        let color = match self.color.as_deref() {
            Some(color) => validation::color(color)?,
            None => validation::DEFAULT_COLOR.to_string(),
        };

        Ok(NewNote {
            title,
            content,
            tags,
            color,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
    pub color: Option<String>,
}

impl UpdateNoteRequest {
    /// Each supplied field is held to the same bounds as on creation.
    pub fn validate(&self) -> Result<NotePatch, ValidationError> {
        Ok(NotePatch {
            title: self
                .title
                .as_deref()
                .map(|t| validation::bounded_text("title", t, validation::TITLE_MAX_CHARS))
                .transpose()?,
            content: self
                .content
                .as_deref()
                .map(validation::note_content)
                .transpose()?,
            tags: self.tags.as_deref().map(validation::tags).transpose()?,
            is_pinned: self.is_pinned,
            color: self.color.as_deref().map(validation::color).transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub note: Note,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListResponse {
    pub notes: Vec<Note>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let req = CreateNoteRequest {
            title: Some("Groceries".to_string()),
            content: Some("milk, eggs".to_string()),
            tags: None,
            color: None,
        };
        let note = req.validate().unwrap();
        assert_eq!(note.color, "#ffffff");
        assert!(note.tags.is_empty());
    }

    #[test]
    fn test_create_rejects_bad_color() {
        let mut req = CreateNoteRequest {
            title: Some("Groceries".to_string()),
            content: Some("milk".to_string()),
            tags: None,
            color: Some("#zzzzzz".to_string()),
        };
        assert_eq!(req.validate().unwrap_err().field, "color");

        req.color = Some("#1A2b3C".to_string());
        assert_eq!(req.validate().unwrap().color, "#1A2b3C");
    }

    #[test]
    fn test_create_requires_content() {
        let req = CreateNoteRequest {
            title: Some("Groceries".to_string()),
            content: None,
            tags: None,
            color: None,
        };
        assert_eq!(req.validate().unwrap_err().field, "content");
    }

    #[test]
    fn test_update_revalidates_supplied_fields() {
        let req = UpdateNoteRequest {
            title: Some("t".repeat(201)),
            ..Default::default()
        };
        assert_eq!(req.validate().unwrap_err().field, "title");

        let req = UpdateNoteRequest {
            is_pinned: Some(true),
            ..Default::default()
        };
        let patch = req.validate().unwrap();
        assert_eq!(patch.is_pinned, Some(true));
        assert!(patch.title.is_none());
    }

    #[test]
    fn test_update_rejects_owner_field() {
        let parsed: Result<UpdateNoteRequest, _> =
            serde_json::from_str(r#"{"title":"x","userId":"someone-else"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_note_serializes_camel_case() {
        let now = Utc::now();
        let note = Note {
            id: "n-1".to_string(),
            owner_id: "u-1".to_string(),
            title: "t".to_string(),
            content: "c".to_string(),
            tags: vec!["a".to_string()],
            is_pinned: true,
            color: "#ffffff".to_string(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["isPinned"], true);
        assert_eq!(json["userId"], "u-1");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("owner_id").is_none());
    }
}
