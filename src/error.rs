//! Error types for NoteDex.
//!
//! Lookups that miss are not errors here: store operations report them through
//! their return values. These enums cover backend faults and session misuse.

use thiserror::Error;

/// Failures of the persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Conditions a study session reports to its caller.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("deck '{0}' not found")]
    DeckNotFound(String),

    #[error("deck '{name}' has no cards, add some cards to begin studying")]
    EmptyDeck { name: String },

    #[error("no active study step for this action")]
    NotActive,

    #[error("the current question has already been answered")]
    AlreadyAnswered,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised while loading the application configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}
