//! Multiple-choice quiz over a deck
//!
//! Each question shows a card's front. The options are the card's back plus up
//! to `distractor_count` backs of other cards from the same deck, in random
//! order. Distractor text is not deduplicated unless configured, so a deck
//! holding two cards with the same back can show that text twice.

use super::summary::{SessionSummary, StudyMode};
use crate::config::StudyConfig;
use crate::models::Card;
use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizQuestion {
    pub card: Card,
    pub options: Vec<String>,
    /// Set once the question has been answered.
    pub selected: Option<String>,
}

impl QuizQuestion {
    pub fn prompt(&self) -> &str {
        &self.card.front
    }

    pub fn correct_answer(&self) -> &str {
        &self.card.back
    }

    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    /// `None` until answered.
    pub fn was_correct(&self) -> Option<bool> {
        self.selected.as_deref().map(|s| s == self.card.back)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
}

/// Builds the shuffled option list for `correct`, drawing distractors from `deck_cards`.
pub fn generate_options<R: Rng + ?Sized>(
    correct: &Card,
    deck_cards: &[Card],
    config: &StudyConfig,
    rng: &mut R,
) -> Vec<String> {
    let mut others: Vec<&Card> = deck_cards.iter().filter(|c| c.id != correct.id).collect();
    others.shuffle(rng);

    let mut options = vec![correct.back.clone()];
    for card in others {
        if options.len() > config.distractor_count {
            break;
        }
        if config.dedupe_distractors && options.contains(&card.back) {
            continue;
        }
        options.push(card.back.clone());
    }

    options.shuffle(rng);
    options
}

#[derive(Clone, Debug)]
pub struct QuizRun {
    cards: Vec<Card>,
    quiz_index: usize,
    current: Option<QuizQuestion>,
    correct_count: usize,
    complete: bool,
}

impl QuizRun {
    pub fn start<R: Rng + ?Sized>(cards: &[Card], rng: &mut R) -> Self {
        let mut cards = cards.to_vec();
        cards.shuffle(rng);
        Self {
            cards,
            quiz_index: 0,
            current: None,
            correct_count: 0,
            complete: false,
        }
    }

    /// Advances to the next question, or completes the quiz when none remain.
    pub fn next_question<R: Rng + ?Sized>(
        &mut self,
        deck_cards: &[Card],
        config: &StudyConfig,
        rng: &mut R,
    ) -> Option<&QuizQuestion> {
        let Some(card) = self.cards.get(self.quiz_index).cloned() else {
            self.complete = true;
            self.current = None;
            return None;
        };

        let options = generate_options(&card, deck_cards, config, rng);
        self.quiz_index += 1;
        self.current = Some(QuizQuestion {
            card,
            options,
            selected: None,
        });
        self.current.as_ref()
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.current.as_ref()
    }

    /// Stores `selected` on the current question and returns whether it was right.
    /// Returns `None` when there is no unanswered question.
    pub fn answer(&mut self, selected: &str) -> Option<AnswerOutcome> {
        let question = self.current.as_mut().filter(|q| !q.is_answered())?;
        let correct = selected == question.card.back;
        question.selected = Some(selected.to_string());
        if correct {
            self.correct_count += 1;
        }
        Some(AnswerOutcome {
            correct,
            correct_answer: question.card.back.clone(),
        })
    }

    /// Questions handed out so far.
    pub fn asked(&self) -> usize {
        self.quiz_index
    }

    pub fn total(&self) -> usize {
        self.cards.len()
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn summary(&self) -> SessionSummary {
        let total = self.total();
        SessionSummary {
            mode: StudyMode::Quiz,
            total,
            known: self.correct_count,
            unknown: total - self.correct_count,
        }
    }
}
