//! Repository layer between callers and storage.
//!
//! Repositories expose the operations callers need while hiding which
//! storage implementation serves them, so the storage technology can change
//! without touching consumers.

pub mod wish;

pub use wish::WishRepository;
