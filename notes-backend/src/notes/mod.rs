//! Notes domain: owner-scoped access and the list query builder.

pub mod access;
pub mod query;

pub use access::NoteAccessController;
pub use query::ListParams;
