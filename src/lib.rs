pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod study;

pub use config::{AppConfig, StudyConfig};
pub use database::{DeckStore, MemoryStorage, SqliteStorage, Storage};
pub use error::{ConfigError, SessionError, StoreError};
pub use models::{Card, Deck, DeckSet, Progress};
pub use study::{SessionSummary, StudyMode, StudySession};
