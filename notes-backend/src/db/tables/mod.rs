//! `impl Database` blocks, one per table.

mod notes;
mod users;
