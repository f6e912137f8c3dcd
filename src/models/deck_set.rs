//! Container for all available decks. This is the persisted document.
use super::Deck;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckSet {
    pub decks: Vec<Deck>,
}

impl DeckSet {
    pub fn deck(&self, deck_id: &str) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == deck_id)
    }

    pub fn deck_mut(&mut self, deck_id: &str) -> Option<&mut Deck> {
        self.decks.iter_mut().find(|d| d.id == deck_id)
    }

    pub fn has_deck_id(&self, deck_id: &str) -> bool {
        self.deck(deck_id).is_some()
    }
}
