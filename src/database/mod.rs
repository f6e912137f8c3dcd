//! Persistence for decks: storage backends and the deck store built on them.

pub mod deck_store;
pub mod memory;
pub mod seed;
pub mod sqlite;
pub mod storage;

pub use deck_store::{DeckStore, OutcomeRecorder};
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use storage::{BACKUP_KEY, STORAGE_KEY, Storage};

pub type Result<T> = std::result::Result<T, crate::error::StoreError>;
