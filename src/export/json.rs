//! JSON import/export module for single decks.
//! Writes a deck in the same shape it has inside the store document, and reads
//! that shape back. Ids in imported files are ignored; the store issues new ones.

use crate::error::StoreError;
use crate::models::{Card, Deck, Progress};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Deserialize)]
struct DeckFile {
    name: String,
    #[serde(default)]
    cards: Vec<CardFile>,
    #[serde(default)]
    progress: Progress,
}

#[derive(Deserialize)]
struct CardFile {
    front: String,
    back: String,
}

/// Exports a deck to a pretty-printed JSON file at `path`.
pub fn export_deck_to_path(deck: &Deck, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, deck)?;
    writer.flush()?;
    tracing::info!(deck = %deck.name, path = %path.as_ref().display(), "exported deck");
    Ok(())
}

/// Reads a deck from a JSON file. The returned deck and its cards carry empty
/// ids until passed through `DeckStore::import_deck`.
pub fn import_deck_from_path(path: impl AsRef<Path>) -> Result<Deck, StoreError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let file: DeckFile = serde_json::from_reader(reader)?;

    Ok(Deck {
        id: String::new(),
        name: file.name,
        cards: file
            .cards
            .into_iter()
            .map(|c| Card::new(String::new(), c.front, c.back))
            .collect(),
        progress: file.progress,
    })
}
