mod note;
mod user;

pub use note::{
    CreateNoteRequest, NewNote, Note, NoteListResponse, NotePatch, NoteResponse, UpdateNoteRequest,
};
pub use user::{
    AuthResponse, LoginRequest, NewUser, RegisterRequest, Registration, User, UserResponse,
};
