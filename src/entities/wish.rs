//! Wish entity for the single `wish-table` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single wishlist row.
///
/// `id == 0` means the wish has not been stored yet; the database assigns
/// the real id on insert. `Model::default()` is the placeholder used for
/// "nothing selected / new item".
#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wish-table")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "wish-title")]
    pub title: String,
    #[sea_orm(column_name = "wish-desc")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Build an unsaved wish.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
        }
    }

    /// True until the database has assigned an id.
    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    /// Same wish under another id.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}
