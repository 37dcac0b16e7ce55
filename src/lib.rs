//! Wishlist - local storage for a wishlist application
//!
//! This library stores wishes (a title and a description) in a single-table
//! SQLite database and lets callers observe the table through live streams
//! that re-emit after every change.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`config`] - Configuration management
//! * [`entities`] - The `Wish` entity and its table
//! * [`storage`] - Database handle, data access objects and change notifications
//! * [`repositories`] - The repository façade callers use
//! * [`service`] - Add/edit form rules and sample data
//! * [`logger`] - Logging setup
//!
//! # Example
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use wishlist::{Config, Wish, WishDatabase, WishRepository};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let database = WishDatabase::open(&Config::load()?).await?;
//! let repository = WishRepository::from_database(&database);
//!
//! let mut wishes = repository.get_wishes();
//! repository.add_wish(Wish::new("Bean bag", "A comfy bean bag")).await?;
//! while let Some(list) = wishes.next().await {
//!     println!("{} wishes", list?.len());
//! }
//! # Ok(())
//! # }
//! ```

/// Configuration module for managing settings
pub mod config;

/// Default values and identifiers
pub mod constants;

/// SeaORM entity models for database tables
pub mod entities;

/// Logging setup and in-memory log buffer
pub mod logger;

/// Repository layer for callers
pub mod repositories;

/// Add/edit rules and sample data
pub mod service;

/// Local storage layer
pub mod storage;

pub use config::Config;
pub use entities::Wish;
pub use repositories::WishRepository;
pub use storage::{InsertOutcome, StorageError, WishDao, WishDatabase};
