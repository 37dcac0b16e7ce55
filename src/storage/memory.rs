//! In-memory wish storage with the same semantics as the SQLite store.

use async_trait::async_trait;
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use super::dao::{InsertOutcome, WishDao, WishListStream, WishStream};
use super::notify::{self, ChangeNotifier, WishChange};
use super::StorageError;
use crate::entities::Wish;

#[derive(Debug)]
struct Table {
    rows: BTreeMap<i64, Wish>,
    /// `None` once `i64::MAX` has been used.
    next_id: Option<i64>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: Some(1),
        }
    }
}

/// Map-backed wish table.
#[derive(Clone, Debug)]
pub struct InMemoryWishDao {
    table: Arc<RwLock<Table>>,
    notifier: ChangeNotifier,
}

impl InMemoryWishDao {
    pub fn new(notifier: ChangeNotifier) -> Self {
        Self {
            table: Arc::new(RwLock::new(Table::default())),
            notifier,
        }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
        StorageError::Poisoned(e.to_string())
    }
}

impl Default for InMemoryWishDao {
    fn default() -> Self {
        Self::new(ChangeNotifier::new(crate::constants::DEFAULT_CHANNEL_CAPACITY))
    }
}

#[async_trait]
impl WishDao for InMemoryWishDao {
    async fn insert(&self, mut wish: Wish) -> Result<InsertOutcome, StorageError> {
        let outcome = {
            let mut table = self.table.write().map_err(Self::poisoned)?;
            if wish.is_new() {
                wish.id = table.next_id.ok_or(StorageError::IdsExhausted)?;
            }
            if table.rows.contains_key(&wish.id) {
                InsertOutcome::Ignored
            } else {
                let id = wish.id;
                if table.next_id.is_some_and(|next| id >= next) {
                    table.next_id = id.checked_add(1);
                }
                table.rows.insert(id, wish);
                InsertOutcome::Inserted(id)
            }
        };

        if let InsertOutcome::Inserted(id) = outcome {
            debug!("Inserted wish {} in memory", id);
            self.notifier.publish(WishChange::Inserted(id));
        }
        Ok(outcome)
    }

    fn list_all(&self) -> WishListStream {
        let table = self.table.clone();
        notify::watch(
            self.notifier.subscribe(),
            |_| true,
            move || {
                let rows = table
                    .read()
                    .map(|t| t.rows.values().cloned().collect::<Vec<_>>())
                    .map_err(Self::poisoned);
                async move { rows.map(Some) }
            },
        )
    }

    async fn update(&self, wish: Wish) -> Result<(), StorageError> {
        let id = wish.id;
        let updated = {
            let mut table = self.table.write().map_err(Self::poisoned)?;
            match table.rows.get_mut(&id) {
                Some(row) => {
                    row.title = wish.title;
                    row.description = wish.description;
                    true
                }
                None => false,
            }
        };

        if updated {
            self.notifier.publish(WishChange::Updated(id));
        }
        Ok(())
    }

    async fn delete(&self, wish: Wish) -> Result<(), StorageError> {
        let removed = self.table.write().map_err(Self::poisoned)?.rows.remove(&wish.id).is_some();
        if removed {
            self.notifier.publish(WishChange::Deleted(wish.id));
        }
        Ok(())
    }

    fn get_by_id(&self, id: i64) -> WishStream {
        let table = self.table.clone();
        notify::watch(
            self.notifier.subscribe(),
            move |change| change.id() == Some(id),
            move || {
                let row = table.read().map(|t| t.rows.get(&id).cloned()).map_err(Self::poisoned);
                async move { row }
            },
        )
    }
}
