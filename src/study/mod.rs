//! Study modes over a single deck.
//!
//! | Module      | Purpose |
//! |-------------|---------|
//! | `session`   | `StudySession`: opens a deck, picks a mode, reports outcomes |
//! | `flashcard` | Self-graded pass: show front, reveal back, mark known/unknown |
//! | `quiz`      | Multiple choice: question from the front, options from backs |
//! | `summary`   | Mode enum and end-of-pass totals |

pub mod flashcard;
pub mod quiz;
pub mod session;
pub mod summary;

pub use quiz::{AnswerOutcome, QuizQuestion};
pub use session::StudySession;
pub use summary::{SessionSummary, StudyMode};

pub type Result<T> = std::result::Result<T, crate::error::SessionError>;
