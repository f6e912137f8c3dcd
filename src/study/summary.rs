use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyMode {
    Flashcards,
    Quiz,
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudyMode::Flashcards => write!(f, "Flashcards"),
            StudyMode::Quiz => write!(f, "Quiz"),
        }
    }
}

/// Result of a finished pass. `total` is always the deck size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub mode: StudyMode,
    pub total: usize,
    /// Cards marked known, or questions answered correctly.
    pub known: usize,
    pub unknown: usize,
}
