//! Data access contract for the wish table.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use super::StorageError;
use crate::entities::Wish;

/// Live stream of the full table, re-emitted after every mutation.
pub type WishListStream = BoxStream<'static, Result<Vec<Wish>, StorageError>>;

/// Live stream of a single row, silent while the row does not exist.
pub type WishStream = BoxStream<'static, Result<Wish, StorageError>>;

/// Result of an insert under the IGNORE conflict policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A row was stored under this id.
    Inserted(i64),
    /// A row with the same id already existed; nothing changed.
    Ignored,
}

impl InsertOutcome {
    pub fn id(&self) -> Option<i64> {
        match self {
            InsertOutcome::Inserted(id) => Some(*id),
            InsertOutcome::Ignored => None,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, InsertOutcome::Ignored)
    }
}

/// CRUD operations against the wish table.
///
/// Implementations must keep these semantics:
/// - `insert` with `id == 0` assigns a fresh id that is never reused;
///   inserting an existing id is ignored, never replaced.
/// - `update` and `delete` match on `id` and do nothing when it is absent.
/// - Read streams emit the current state first, then again after each
///   committed change that affects them. Dropping a stream unsubscribes.
#[async_trait]
pub trait WishDao: Send + Sync {
    /// Add a row, ignoring id conflicts.
    async fn insert(&self, wish: Wish) -> Result<InsertOutcome, StorageError>;

    /// Subscribe to every row, ordered by id.
    fn list_all(&self) -> WishListStream;

    /// Overwrite title and description of the row with `wish.id`.
    async fn update(&self, wish: Wish) -> Result<(), StorageError>;

    /// Remove the row with `wish.id`.
    async fn delete(&self, wish: Wish) -> Result<(), StorageError>;

    /// Subscribe to the row with `id`.
    fn get_by_id(&self, id: i64) -> WishStream;
}
