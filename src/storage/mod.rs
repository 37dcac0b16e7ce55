//! Local storage for wishes
//!
//! This module provides:
//! - the explicitly opened database handle ([`WishDatabase`])
//! - the data access trait ([`WishDao`]) with a SQLite and an in-memory implementation
//! - change notifications driving the live read streams

pub mod dao;
pub mod db;
pub mod memory;
pub mod notify;
pub mod wishes;

pub use dao::{InsertOutcome, WishDao, WishListStream, WishStream};
pub use db::WishDatabase;
pub use memory::InMemoryWishDao;
pub use notify::{ChangeNotifier, WishChange};
pub use wishes::SqliteWishDao;

/// Errors surfaced by the data access layer.
///
/// Conflicts and missing ids are not errors; only real storage failures
/// reach this type.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Storage lock poisoned: {0}")]
    Poisoned(String),

    #[error("No wish ids left to assign")]
    IdsExhausted,
}
