//! Constants used throughout the crate
//!
//! This module centralizes file names, storage identifiers and default values.

// Storage
pub const WISH_TABLE: &str = "wish-table";
pub const IN_MEMORY_DATABASE_URL: &str = "sqlite::memory:";
/// Driver selector for file databases; the real path is set separately
pub const FILE_DATABASE_URL: &str = "sqlite://wishlist.db";
pub const DEFAULT_DATABASE_FILE: &str = "wishlist.db";

// Files and directories
pub const APP_DIR_NAME: &str = "wishlist";
pub const LOCAL_CONFIG_FILE: &str = "wishlist.toml";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_LOG_FILE: &str = "wishlist.log";

// Connection pool
/// Default pool size for on-disk databases
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;
/// Upper bound accepted by config validation
pub const MAX_CONNECTIONS_LIMIT: u32 = 64;

// Notifications
/// Default buffer of pending changes per live stream before it lags
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

// Messages
pub const CONFIG_GENERATED: &str = "Generated default configuration file";
pub const CONFIG_HEADER_DATE_FORMAT: &str = "%Y-%m-%d";
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
