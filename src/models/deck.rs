//! Deck is a named set of cards with its study progress
use super::{Card, Progress};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cards: Vec<Card>,
    /// Older documents may lack this object; it reads as zeroed counters.
    #[serde(default)]
    pub progress: Progress,
}

impl Deck {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cards: Vec::new(),
            progress: Progress::default(),
        }
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn card_mut(&mut self, card_id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == card_id)
    }

    pub fn has_card_id(&self, card_id: &str) -> bool {
        self.card(card_id).is_some()
    }

    /// Known cards as a percentage of the deck size, capped at 100.
    pub fn progress_percent(&self) -> u32 {
        if self.cards.is_empty() {
            return 0;
        }
        let percent = (self.progress.known_count as f64 / self.cards.len() as f64) * 100.0;
        (percent.round() as u32).min(100)
    }
}
