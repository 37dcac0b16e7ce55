//! Wish editing and sample data on top of [`WishRepository`].
//!
//! [`WishEditor`] carries the add/edit form rules: both fields are required,
//! values are trimmed, and the edited id decides between creating a new wish
//! and updating an existing one.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use log::{debug, info};
use std::time::Duration;

use crate::config::Config;
use crate::entities::Wish;
use crate::repositories::WishRepository;
use crate::storage::{InsertOutcome, WishDatabase};

/// What [`WishEditor::save`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new wish was inserted (or the insert was ignored as a conflict).
    Created(InsertOutcome),
    /// The wish being edited was updated.
    Updated,
    /// Title or description was empty; nothing was stored.
    MissingFields,
}

/// Form state for adding or editing a single wish.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WishEditor {
    id: i64,
    title: String,
    description: String,
}

impl WishEditor {
    /// Empty form for a new wish.
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled with an existing wish.
    pub fn for_wish(wish: Wish) -> Self {
        Self {
            id: wish.id,
            title: wish.title,
            description: wish.description,
        }
    }

    /// Form for the wish with `id`, filled from its live stream.
    ///
    /// Waits up to `wait` for the first emission. If the wish is missing the
    /// fields stay empty but the id is kept, so a later save is an update
    /// that matches nothing.
    pub async fn load(repository: &WishRepository, id: i64, wait: Duration) -> Result<Self> {
        if id == 0 {
            return Ok(Self::new());
        }

        let mut stream = repository.get_wish_by_id(id);
        match tokio::time::timeout(wait, stream.next()).await {
            Ok(Some(wish)) => Ok(Self::for_wish(wish.with_context(|| format!("Failed to load wish {}", id))?)),
            Ok(None) | Err(_) => {
                debug!("Wish {} not found, editing placeholder", id);
                Ok(Self {
                    id,
                    ..Self::default()
                })
            }
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Editing an existing wish rather than creating one.
    pub fn is_edit(&self) -> bool {
        self.id != 0
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Store the form through `repository`.
    pub async fn save(&self, repository: &WishRepository) -> Result<SaveOutcome> {
        if self.title.is_empty() || self.description.is_empty() {
            return Ok(SaveOutcome::MissingFields);
        }

        let wish = Wish {
            id: self.id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
        };

        if self.is_edit() {
            repository
                .update_wish(wish)
                .await
                .with_context(|| format!("Failed to update wish {}", self.id))?;
            Ok(SaveOutcome::Updated)
        } else {
            let outcome = repository.add_wish(wish).await.context("Failed to create wish")?;
            Ok(SaveOutcome::Created(outcome))
        }
    }
}

/// The placeholder wishes shown on a fresh install.
pub fn sample_wishes() -> Vec<Wish> {
    vec![
        Wish::new("Google Watch 2", "An android Watch"),
        Wish::new("Oculus Quest 2", "A VR headset for playing games"),
        Wish::new("A Sci-fi, Book", "A science friction book from any best seller"),
        Wish::new("Bean bag", "A comfy bean bag to substitute for a chair"),
    ]
}

/// Insert [`sample_wishes`] if the table is empty. Returns how many were inserted.
pub async fn seed_if_empty(repository: &WishRepository) -> Result<usize> {
    let current = repository
        .get_wishes()
        .next()
        .await
        .ok_or_else(|| anyhow::anyhow!("Wish list stream ended before emitting"))?
        .context("Failed to read wishes")?;

    if !current.is_empty() {
        debug!("Skipping samples, {} wishes already stored", current.len());
        return Ok(0);
    }

    let mut inserted = 0;
    for wish in sample_wishes() {
        if let InsertOutcome::Inserted(_) = repository.add_wish(wish).await.context("Failed to insert sample wish")? {
            inserted += 1;
        }
    }

    info!("Inserted {} sample wishes", inserted);
    Ok(inserted)
}

/// Open the configured database and a repository over it, seeding the
/// sample wishes when `database.seed_samples` is set.
pub async fn open(config: &Config) -> Result<(WishDatabase, WishRepository)> {
    config.validate()?;
    let database = WishDatabase::open(config).await?;
    let repository = WishRepository::from_database(&database);

    if config.database.seed_samples {
        seed_if_empty(&repository).await?;
    }

    Ok((database, repository))
}
