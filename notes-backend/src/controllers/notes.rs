//! `/notes` routes. Every handler requires an [`AuthenticatedUser`] and passes
//! the caller's id to the access controller; no handler reads an owner from
//! the request.

use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{CreateNoteRequest, NoteResponse, UpdateNoteRequest};
use crate::notes::ListParams;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notes")
            .route("", web::get().to(list_notes))
            .route("", web::post().to(create_note))
            .route("/{id}", web::get().to(get_note))
            .route("/{id}", web::put().to(update_note))
            .route("/{id}", web::delete().to(delete_note))
            .route("/{id}/pin", web::patch().to(toggle_pin)),
    );
}

/// Raw list options. Values are kept as strings so malformed numbers fall
/// back to defaults instead of failing the request. A repeated key keeps its
/// first value.
#[derive(Debug, Default)]
struct ListQuery {
    page: Option<String>,
    limit: Option<String>,
    search: Option<String>,
    tag: Option<String>,
}

impl ListQuery {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                "search" => &mut query.search,
                "tag" => &mut query.tag,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

impl From<&ListQuery> for ListParams {
    fn from(q: &ListQuery) -> Self {
        ListParams::from_raw(
            q.page.as_deref(),
            q.limit.as_deref(),
            q.search.as_deref(),
            q.tag.as_deref(),
        )
    }
}

async fn list_notes(
    state: web::Data<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, ApiError> {
    let query = ListQuery::from_pairs(query.into_inner());
    let page = state.notes.list(&user.id, ListParams::from(&query))?;
    Ok(HttpResponse::Ok().json(page))
}

async fn get_note(
    state: web::Data<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let note = state.notes.get(&user.id, &path)?;
    Ok(HttpResponse::Ok().json(NoteResponse { message: None, note }))
}

async fn create_note(
    state: web::Data<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    body: web::Json<CreateNoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let new_note = body.validate()?;
    let note = state.notes.create(&user.id, new_note)?;
    Ok(HttpResponse::Created().json(NoteResponse {
        message: Some("Note created successfully".to_string()),
        note,
    }))
}

async fn update_note(
    state: web::Data<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateNoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let patch = body.validate()?;
    let note = state.notes.update(&user.id, &path, patch)?;
    Ok(HttpResponse::Ok().json(NoteResponse {
        message: Some("Note updated successfully".to_string()),
        note,
    }))
}

async fn delete_note(
    state: web::Data<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state.notes.delete(&user.id, &path)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Note deleted successfully"
    })))
}

async fn toggle_pin(
    state: web::Data<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let note = state.notes.toggle_pin(&user.id, &path)?;
    let message = if note.is_pinned {
        "Note pinned successfully"
    } else {
        "Note unpinned successfully"
    };
    Ok(HttpResponse::Ok().json(NoteResponse {
        message: Some(message.to_string()),
        note,
    }))
}
