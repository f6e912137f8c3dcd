//! Self-graded flashcard pass over a shuffled copy of a deck.

use super::summary::{SessionSummary, StudyMode};
use crate::models::Card;
use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Clone, Debug)]
pub struct FlashcardRun {
    cards: Vec<Card>,
    card_index: usize,
    known_count: usize,
    seen: Vec<usize>,
}

impl FlashcardRun {
    pub fn start<R: Rng + ?Sized>(cards: &[Card], rng: &mut R) -> Self {
        let mut cards = cards.to_vec();
        cards.shuffle(rng);
        Self {
            cards,
            card_index: 0,
            known_count: 0,
            seen: Vec::new(),
        }
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.cards.get(self.card_index)
    }

    /// Cards in the order they are shown.
    pub fn order(&self) -> &[Card] {
        &self.cards
    }

    pub fn total(&self) -> usize {
        self.cards.len()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn known_count(&self) -> usize {
        self.known_count
    }

    pub fn is_complete(&self) -> bool {
        self.card_index >= self.cards.len()
    }

    /// Grades the current card and moves on. Returns `false` once the pass is over.
    pub fn mark(&mut self, is_known: bool) -> bool {
        if self.is_complete() {
            return false;
        }
        if is_known {
            self.known_count += 1;
        }
        if !self.seen.contains(&self.card_index) {
            self.seen.push(self.card_index);
        }
        self.card_index += 1;
        true
    }

    pub fn summary(&self) -> SessionSummary {
        let total = self.total();
        SessionSummary {
            mode: StudyMode::Flashcards,
            total,
            known: self.known_count,
            unknown: total - self.known_count,
        }
    }
}
