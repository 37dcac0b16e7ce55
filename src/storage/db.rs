use anyhow::{Context, Result};
use log::{info, LevelFilter};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;

use super::notify::{ChangeNotifier, WishChange};
use super::wishes::SqliteWishDao;
use crate::config::Config;
use crate::constants::{DEFAULT_CHANNEL_CAPACITY, FILE_DATABASE_URL, IN_MEMORY_DATABASE_URL, WISH_TABLE};

/// Keeps the single in-memory connection from being reaped by the pool.
const IN_MEMORY_KEEPALIVE: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Handle to the wish database.
///
/// Open it once at startup and hand it (or DAOs built from it) to whoever
/// needs storage. Every DAO created from one handle shares its connection
/// pool and its change notifier, so live streams see each other's writes.
pub struct WishDatabase {
    pub(crate) conn: DatabaseConnection,
    notifier: ChangeNotifier,
}

impl WishDatabase {
    /// Open the database described by the configuration.
    pub async fn open(config: &Config) -> Result<Self> {
        let capacity = config.notifications.channel_capacity;
        if config.database.in_memory {
            return Self::open_in_memory(capacity).await;
        }

        let path = config.database.resolve_path()?;
        Self::open_file(&path, config.database.max_connections, capacity).await
    }

    /// Open (creating if needed) a database file.
    pub async fn open_file(path: &Path, max_connections: u32, channel_capacity: usize) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {}", parent.display()))?;
        }

        // the URL only selects the driver; the filename is set on the sqlx options
        // so `?` and `#` in the path are not read as URL syntax
        let mut options = Self::options(FILE_DATABASE_URL, max_connections);
        let filename = path.to_path_buf();
        options.map_sqlx_sqlite_opts(move |opts| opts.filename(&filename).create_if_missing(true));

        Self::connect(options, &path.display().to_string(), channel_capacity).await
    }

    /// Open a private in-memory database.
    pub async fn in_memory() -> Result<Self> {
        Self::open_in_memory(DEFAULT_CHANNEL_CAPACITY).await
    }

    async fn open_in_memory(channel_capacity: usize) -> Result<Self> {
        let mut options = Self::options(IN_MEMORY_DATABASE_URL, 1);
        // each pooled connection would otherwise get its own empty database
        options
            .idle_timeout(IN_MEMORY_KEEPALIVE)
            .max_lifetime(IN_MEMORY_KEEPALIVE);

        Self::connect(options, IN_MEMORY_DATABASE_URL, channel_capacity).await
    }

    fn options(url: &str, max_connections: u32) -> ConnectOptions {
        let mut options = ConnectOptions::new(url.to_string());
        options
            .max_connections(max_connections)
            .min_connections(1)
            .sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);
        options
    }

    async fn connect(options: ConnectOptions, location: &str, channel_capacity: usize) -> Result<Self> {
        let conn = Database::connect(options)
            .await
            .with_context(|| format!("Failed to open database: {}", location))?;

        let database = Self {
            conn,
            notifier: ChangeNotifier::new(channel_capacity),
        };
        database.init_schema().await?;

        info!("Opened wish database at {}", location);
        Ok(database)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        // AUTOINCREMENT keeps ids of deleted rows from being handed out again
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{WISH_TABLE}" (
                "id" INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                "wish-title" TEXT NOT NULL DEFAULT '',
                "wish-desc" TEXT NOT NULL DEFAULT ''
            )
            "#
        );
        self.conn
            .execute_unprepared(&sql)
            .await
            .context("Failed to create wish table")?;
        Ok(())
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Data access object bound to this database.
    pub fn dao(&self) -> SqliteWishDao {
        SqliteWishDao::new(self.conn.clone(), self.notifier.clone())
    }

    /// Close the connection pool and end every live stream.
    pub async fn close(self) -> Result<()> {
        self.notifier.publish(WishChange::Closed);
        self.conn.close().await.context("Failed to close database")?;
        info!("Closed wish database");
        Ok(())
    }
}
