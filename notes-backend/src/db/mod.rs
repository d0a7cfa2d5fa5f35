pub mod sqlite;
pub mod store;
mod tables;

pub use sqlite::Database;
pub use store::{NoteStore, StoreError, UserStore};
