//! SQLite-backed wish storage.

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    TryInsertResult,
};

use super::dao::{InsertOutcome, WishDao, WishListStream, WishStream};
use super::notify::{self, ChangeNotifier, WishChange};
use super::StorageError;
use crate::entities::wish;

/// Data access object issuing the wish statements through sea-orm.
#[derive(Clone)]
pub struct SqliteWishDao {
    conn: DatabaseConnection,
    notifier: ChangeNotifier,
}

impl SqliteWishDao {
    pub fn new(conn: DatabaseConnection, notifier: ChangeNotifier) -> Self {
        Self { conn, notifier }
    }

    /// Insert with `ON CONFLICT(id) DO NOTHING`.
    pub async fn insert_ignore<C>(conn: &C, wish: wish::Model) -> Result<InsertOutcome, DbErr>
    where
        C: ConnectionTrait,
    {
        let active = wish::ActiveModel {
            id: if wish.is_new() {
                ActiveValue::NotSet
            } else {
                ActiveValue::Set(wish.id)
            },
            title: ActiveValue::Set(wish.title),
            description: ActiveValue::Set(wish.description),
        };

        let result = wish::Entity::insert(active)
            .on_conflict(OnConflict::column(wish::Column::Id).do_nothing().to_owned())
            .do_nothing()
            .exec(conn)
            .await?;

        Ok(match result {
            TryInsertResult::Inserted(inserted) => InsertOutcome::Inserted(inserted.last_insert_id),
            TryInsertResult::Conflicted | TryInsertResult::Empty => InsertOutcome::Ignored,
        })
    }

    /// Get all wishes ordered by id.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<wish::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        wish::Entity::find().order_by_asc(wish::Column::Id).all(conn).await
    }

    /// Get a single wish by id.
    pub async fn get_by_id_once<C>(conn: &C, id: i64) -> Result<Option<wish::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        wish::Entity::find_by_id(id).one(conn).await
    }

    /// Overwrite the non-key columns of the row matching `wish.id`.
    /// Returns the number of rows touched.
    pub async fn update_fields<C>(conn: &C, wish: wish::Model) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = wish::Entity::update_many()
            .col_expr(wish::Column::Title, Expr::value(wish.title))
            .col_expr(wish::Column::Description, Expr::value(wish.description))
            .filter(wish::Column::Id.eq(wish.id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Delete the row matching `id`. Returns the number of rows removed.
    pub async fn delete_by_id<C>(conn: &C, id: i64) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = wish::Entity::delete_by_id(id).exec(conn).await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl WishDao for SqliteWishDao {
    async fn insert(&self, wish: wish::Model) -> Result<InsertOutcome, StorageError> {
        let outcome = Self::insert_ignore(&self.conn, wish).await?;
        match outcome {
            InsertOutcome::Inserted(id) => {
                debug!("Inserted wish {}", id);
                self.notifier.publish(WishChange::Inserted(id));
            }
            InsertOutcome::Ignored => debug!("Ignored wish insert, id already present"),
        }
        Ok(outcome)
    }

    fn list_all(&self) -> WishListStream {
        let conn = self.conn.clone();
        notify::watch(
            self.notifier.subscribe(),
            |_| true,
            move || {
                let conn = conn.clone();
                async move { Ok(Some(Self::get_all(&conn).await?)) }
            },
        )
    }

    async fn update(&self, wish: wish::Model) -> Result<(), StorageError> {
        let id = wish.id;
        if Self::update_fields(&self.conn, wish).await? > 0 {
            debug!("Updated wish {}", id);
            self.notifier.publish(WishChange::Updated(id));
        } else {
            debug!("Update skipped, no wish {}", id);
        }
        Ok(())
    }

    async fn delete(&self, wish: wish::Model) -> Result<(), StorageError> {
        if Self::delete_by_id(&self.conn, wish.id).await? > 0 {
            debug!("Deleted wish {}", wish.id);
            self.notifier.publish(WishChange::Deleted(wish.id));
        } else {
            debug!("Delete skipped, no wish {}", wish.id);
        }
        Ok(())
    }

    fn get_by_id(&self, id: i64) -> WishStream {
        let conn = self.conn.clone();
        notify::watch(
            self.notifier.subscribe(),
            move |change| change.id() == Some(id),
            move || {
                let conn = conn.clone();
                async move { Ok(Self::get_by_id_once(&conn, id).await?) }
            },
        )
    }
}
