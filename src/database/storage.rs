//! Key/value persistence surface the deck store writes its document through.
use super::Result;

/// Key under which the deck document is stored.
pub const STORAGE_KEY: &str = "notedex_decks";

/// Key holding the last deck document that failed to parse.
pub const BACKUP_KEY: &str = "notedex_decks.corrupt";

/// A string key/value backend, shaped like browser local storage.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Inserts or replaces the value under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&mut self, key: &str) -> Result<()>;
}
