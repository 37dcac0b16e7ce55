//! Wish repository.

use std::sync::Arc;

use crate::entities::Wish;
use crate::storage::{InsertOutcome, StorageError, WishDao, WishDatabase, WishListStream, WishStream};

/// Pass-through façade over a [`WishDao`].
///
/// Adds no caching, validation or transformation. Clones share the same DAO.
#[derive(Clone)]
pub struct WishRepository {
    dao: Arc<dyn WishDao>,
}

impl WishRepository {
    pub fn new(dao: Arc<dyn WishDao>) -> Self {
        Self { dao }
    }

    /// Repository backed by the SQLite DAO of `database`.
    pub fn from_database(database: &WishDatabase) -> Self {
        Self::new(Arc::new(database.dao()))
    }

    pub async fn add_wish(&self, wish: Wish) -> Result<InsertOutcome, StorageError> {
        self.dao.insert(wish).await
    }

    pub fn get_wishes(&self) -> WishListStream {
        self.dao.list_all()
    }

    pub fn get_wish_by_id(&self, id: i64) -> WishStream {
        self.dao.get_by_id(id)
    }

    pub async fn update_wish(&self, wish: Wish) -> Result<(), StorageError> {
        self.dao.update(wish).await
    }

    pub async fn delete_wish(&self, wish: Wish) -> Result<(), StorageError> {
        self.dao.delete(wish).await
    }
}
