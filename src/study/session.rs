//! Study session management for one deck.
//! Drives either a flashcard pass or a quiz and reports each graded card to
//! an [`OutcomeRecorder`], normally the deck store.

use super::flashcard::FlashcardRun;
use super::quiz::{AnswerOutcome, QuizQuestion, QuizRun};
use super::summary::{SessionSummary, StudyMode};
use super::Result;
use crate::config::StudyConfig;
use crate::database::{DeckStore, OutcomeRecorder, Storage};
use crate::error::SessionError;
use crate::models::{Card, Deck};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

#[derive(Clone, Debug)]
enum Phase {
    Idle,
    Flashcards(FlashcardRun),
    Quiz(QuizRun),
}

/// A study pass over a snapshot of one deck.
///
/// The session never writes card content. The only thing it persists is the
/// per-card outcome, through the recorder passed to [`mark`](Self::mark) and
/// [`answer`](Self::answer).
pub struct StudySession<R: Rng = StdRng> {
    deck: Deck,
    config: StudyConfig,
    rng: R,
    phase: Phase,
}

impl StudySession<StdRng> {
    /// Opens a session with a seeded or entropy-backed random source.
    pub fn open_seeded<S: Storage>(
        store: &mut DeckStore<S>,
        deck_id: &str,
        config: StudyConfig,
        rng_seed: Option<u64>,
    ) -> Result<Self> {
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::open(store, deck_id, config, rng)
    }
}

impl<R: Rng> StudySession<R> {
    /// Loads the deck and checks that it can be studied.
    pub fn open<S: Storage>(
        store: &mut DeckStore<S>,
        deck_id: &str,
        config: StudyConfig,
        rng: R,
    ) -> Result<Self> {
        let deck = store
            .get_deck(deck_id)?
            .ok_or_else(|| SessionError::DeckNotFound(deck_id.to_string()))?;
        Self::from_deck(deck, config, rng)
    }

    /// Empty decks are refused so no pass can start with nothing to show.
    pub fn from_deck(deck: Deck, config: StudyConfig, rng: R) -> Result<Self> {
        if deck.cards.is_empty() {
            return Err(SessionError::EmptyDeck { name: deck.name });
        }
        Ok(Self {
            deck,
            config,
            rng,
            phase: Phase::Idle,
        })
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Begins a pass in `mode`. Calling it again starts over with a new shuffle.
    pub fn start(&mut self, mode: StudyMode) {
        self.phase = match mode {
            StudyMode::Flashcards => {
                Phase::Flashcards(FlashcardRun::start(&self.deck.cards, &mut self.rng))
            }
            StudyMode::Quiz => Phase::Quiz(QuizRun::start(&self.deck.cards, &mut self.rng)),
        };
        info!(deck_id = %self.deck.id, %mode, cards = self.deck.cards.len(), "study session started");
    }

    /// `None` while no pass has been started.
    pub fn mode(&self) -> Option<StudyMode> {
        match self.phase {
            Phase::Idle => None,
            Phase::Flashcards(_) => Some(StudyMode::Flashcards),
            Phase::Quiz(_) => Some(StudyMode::Quiz),
        }
    }

    pub fn is_complete(&self) -> bool {
        match &self.phase {
            Phase::Idle => false,
            Phase::Flashcards(run) => run.is_complete(),
            Phase::Quiz(run) => run.is_complete(),
        }
    }

    /// Progress through the pass as `(done, total)`: cards graded in flashcard
    /// mode, questions handed out in quiz mode.
    pub fn position(&self) -> (usize, usize) {
        match &self.phase {
            Phase::Idle => (0, self.deck.cards.len()),
            Phase::Flashcards(run) => (run.seen_count(), run.total()),
            Phase::Quiz(run) => (run.asked(), run.total()),
        }
    }

    /// Card to show in flashcard mode.
    pub fn current_card(&self) -> Option<&Card> {
        match &self.phase {
            Phase::Flashcards(run) => run.current_card(),
            _ => None,
        }
    }

    /// Grades the current flashcard and moves to the next one.
    pub fn mark<O: OutcomeRecorder + ?Sized>(
        &mut self,
        is_known: bool,
        recorder: &mut O,
    ) -> Result<()> {
        let Phase::Flashcards(run) = &mut self.phase else {
            return Err(SessionError::NotActive);
        };
        if run.is_complete() {
            return Err(SessionError::NotActive);
        }

        record(recorder, &self.deck, is_known)?;
        run.mark(is_known);

        if run.is_complete() {
            let summary = run.summary();
            info!(deck_id = %self.deck.id, known = summary.known, unknown = summary.unknown, "flashcard pass complete");
        }
        Ok(())
    }

    /// Moves the quiz to its next question. `Ok(None)` means the quiz is complete.
    pub fn next_question(&mut self) -> Result<Option<&QuizQuestion>> {
        let Phase::Quiz(run) = &mut self.phase else {
            return Err(SessionError::NotActive);
        };
        if run.is_complete() {
            return Ok(None);
        }

        let question = run.next_question(&self.deck.cards, &self.config, &mut self.rng);
        if question.is_none() {
            info!(deck_id = %self.deck.id, correct = run.correct_count(), "quiz complete");
        }
        Ok(run.current_question())
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match &self.phase {
            Phase::Quiz(run) => run.current_question(),
            _ => None,
        }
    }

    /// Answers the current question. Does not advance; call
    /// [`next_question`](Self::next_question) for that.
    pub fn answer<O: OutcomeRecorder + ?Sized>(
        &mut self,
        selected: &str,
        recorder: &mut O,
    ) -> Result<AnswerOutcome> {
        let Phase::Quiz(run) = &mut self.phase else {
            return Err(SessionError::NotActive);
        };
        let question = run.current_question().ok_or(SessionError::NotActive)?;
        if question.is_answered() {
            return Err(SessionError::AlreadyAnswered);
        }

        let correct = selected == question.correct_answer();
        record(recorder, &self.deck, correct)?;
        run.answer(selected).ok_or(SessionError::NotActive)
    }

    /// Totals for a finished pass; `None` until then.
    pub fn summary(&self) -> Option<SessionSummary> {
        match &self.phase {
            Phase::Flashcards(run) if run.is_complete() => Some(run.summary()),
            Phase::Quiz(run) if run.is_complete() => Some(run.summary()),
            _ => None,
        }
    }
}

fn record<O: OutcomeRecorder + ?Sized>(recorder: &mut O, deck: &Deck, was_known: bool) -> Result<()> {
    if !recorder.record_study_outcome(&deck.id, was_known)? {
        warn!(deck_id = %deck.id, "deck vanished from the store, outcome not recorded");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{MemoryStorage, STORAGE_KEY};
    use crate::error::StoreError;
    use rand::rngs::mock::StepRng;

    fn store_with_deck(cards: &[(&str, &str)]) -> (DeckStore<MemoryStorage>, String) {
        let mut store = DeckStore::with_seed(MemoryStorage::with_item(STORAGE_KEY, "[]"), 21);
        let deck_id = store.create_deck("Letters").unwrap();
        for (front, back) in cards {
            store.add_card(&deck_id, front, back).unwrap();
        }
        (store, deck_id)
    }

    fn letters() -> (DeckStore<MemoryStorage>, String) {
        store_with_deck(&[("A", "a"), ("B", "b"), ("C", "c")])
    }

    /// Recorder that only counts calls.
    #[derive(Default)]
    struct CountingRecorder {
        calls: Vec<bool>,
        deck_exists: bool,
    }

    impl OutcomeRecorder for CountingRecorder {
        fn record_study_outcome(&mut self, _deck_id: &str, was_known: bool) -> crate::database::Result<bool> {
            self.calls.push(was_known);
            Ok(self.deck_exists)
        }
    }

    struct FailingRecorder;

    impl OutcomeRecorder for FailingRecorder {
        fn record_study_outcome(&mut self, _deck_id: &str, _was_known: bool) -> crate::database::Result<bool> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_unknown_deck_is_reported() {
        let (mut store, _) = letters();
        let result = StudySession::open_seeded(&mut store, "nope", StudyConfig::default(), Some(1));

        assert!(matches!(result, Err(SessionError::DeckNotFound(id)) if id == "nope"));
    }

    #[test]
    fn test_empty_deck_is_refused() {
        let (mut store, deck_id) = store_with_deck(&[]);
        let result = StudySession::open_seeded(&mut store, &deck_id, StudyConfig::default(), Some(1));

        assert!(matches!(result, Err(SessionError::EmptyDeck { name }) if name == "Letters"));
    }

    #[test]
    fn test_flashcard_scenario_updates_store() {
        let (mut store, deck_id) = letters();
        let mut session =
            StudySession::open_seeded(&mut store, &deck_id, StudyConfig::default(), Some(5)).unwrap();
        assert_eq!(session.mode(), None);

        session.start(StudyMode::Flashcards);
        session.mark(true, &mut store).unwrap();
        session.mark(true, &mut store).unwrap();
        assert!(!session.is_complete());
        session.mark(false, &mut store).unwrap();
        assert!(session.is_complete());

        let summary = session.summary().unwrap();
        assert_eq!(summary.mode, StudyMode::Flashcards);
        assert_eq!((summary.known, summary.unknown, summary.total), (2, 1, 3));

        let progress = store.get_deck(&deck_id).unwrap().unwrap().progress;
        assert_eq!(progress.studied_count, 3);
        assert_eq!(progress.known_count, 2);
    }

    #[test]
    fn test_each_graded_card_rewrites_the_document_once() {
        let (mut store, deck_id) = letters();
        let mut session =
            StudySession::open_seeded(&mut store, &deck_id, StudyConfig::default(), Some(8)).unwrap();
        let writes = store.storage().write_count();

        session.start(StudyMode::Flashcards);
        for known in [true, false, true] {
            session.mark(known, &mut store).unwrap();
        }
        assert_eq!(store.storage().write_count(), writes + 3);

        session.start(StudyMode::Quiz);
        let mut expected = writes + 3;
        while let Some(question) = session.next_question().unwrap() {
            let answer = question.correct_answer().to_string();
            assert_eq!(store.storage().write_count(), expected);
            session.answer(&answer, &mut store).unwrap();
            expected += 1;
            assert_eq!(store.storage().write_count(), expected);
        }
        assert_eq!(store.storage().write_count(), writes + 6);
    }

    #[test]
    fn test_mark_after_complete_is_rejected() {
        let (mut store, deck_id) = store_with_deck(&[("A", "a")]);
        let mut session =
            StudySession::open_seeded(&mut store, &deck_id, StudyConfig::default(), Some(5)).unwrap();

        assert!(matches!(session.mark(true, &mut store), Err(SessionError::NotActive)));

        session.start(StudyMode::Flashcards);
        session.mark(true, &mut store).unwrap();
        assert!(matches!(session.mark(true, &mut store), Err(SessionError::NotActive)));

        let progress = store.get_deck(&deck_id).unwrap().unwrap().progress;
        assert_eq!(progress.studied_count, 1);
    }

    #[test]
    fn test_restart_zeroes_counters() {
        let (mut store, deck_id) = letters();
        let mut session =
            StudySession::open_seeded(&mut store, &deck_id, StudyConfig::default(), Some(5)).unwrap();

        session.start(StudyMode::Flashcards);
        for _ in 0..3 {
            session.mark(true, &mut store).unwrap();
        }
        assert_eq!(session.summary().unwrap().known, 3);

        session.start(StudyMode::Flashcards);
        assert!(!session.is_complete());
        assert!(session.summary().is_none());
        assert_eq!(session.position(), (0, 3));
    }

    #[test]
    fn test_store_failure_leaves_session_unchanged() {
        let deck = {
            let (mut store, deck_id) = letters();
            store.get_deck(&deck_id).unwrap().unwrap()
        };
        let mut session = StudySession::from_deck(deck, StudyConfig::default(), StepRng::new(0, 0)).unwrap();
        session.start(StudyMode::Flashcards);

        let before = session.current_card().cloned();
        assert!(matches!(session.mark(true, &mut FailingRecorder), Err(SessionError::Store(_))));
        assert_eq!(session.current_card().cloned(), before);
        assert_eq!(session.position(), (0, 3));
    }

    #[test]
    fn test_vanished_deck_does_not_stop_session() {
        let (mut store, deck_id) = letters();
        let mut session =
            StudySession::open_seeded(&mut store, &deck_id, StudyConfig::default(), Some(2)).unwrap();
        let mut recorder = CountingRecorder::default();

        session.start(StudyMode::Flashcards);
        session.mark(true, &mut recorder).unwrap();

        assert_eq!(recorder.calls, vec![true]);
        assert_eq!(session.position(), (1, 3));
    }

    #[test]
    fn test_quiz_flow() {
        let (mut store, deck_id) = store_with_deck(&[("A", "a"), ("B", "b"), ("C", "c"), ("D", "d")]);
        let mut session =
            StudySession::open_seeded(&mut store, &deck_id, StudyConfig::default(), Some(13)).unwrap();

        assert!(matches!(session.next_question(), Err(SessionError::NotActive)));

        session.start(StudyMode::Quiz);
        assert!(session.current_question().is_none());
        assert!(matches!(session.answer("a", &mut store), Err(SessionError::NotActive)));

        let mut correct = 0;
        while let Some(question) = session.next_question().unwrap() {
            assert_eq!(question.options.len(), 4);
            assert!(question.options.iter().any(|o| o == question.correct_answer()));

            let answer = question.correct_answer().to_string();
            let pick = if correct < 3 { answer } else { "wrong".to_string() };
            let outcome = session.answer(&pick, &mut store).unwrap();
            if outcome.correct {
                correct += 1;
            }
            assert!(matches!(session.answer(&pick, &mut store), Err(SessionError::AlreadyAnswered)));
            assert!(!session.is_complete());
        }

        assert!(session.is_complete());
        let summary = session.summary().unwrap();
        assert_eq!(summary.mode, StudyMode::Quiz);
        assert_eq!((summary.total, summary.known, summary.unknown), (4, 3, 1));

        let progress = store.get_deck(&deck_id).unwrap().unwrap().progress;
        assert_eq!(progress.studied_count, 4);
        assert_eq!(progress.known_count, 3);
    }

    #[test]
    fn test_quiz_on_single_card_deck() {
        let (mut store, deck_id) = store_with_deck(&[("Only", "one")]);
        let mut session =
            StudySession::open_seeded(&mut store, &deck_id, StudyConfig::default(), None).unwrap();

        session.start(StudyMode::Quiz);
        let question = session.next_question().unwrap().unwrap();
        assert_eq!(question.options, vec!["one"]);

        assert!(session.next_question().unwrap().is_none());
        assert!(session.is_complete());
        assert_eq!(session.summary().unwrap().total, 1);
    }

    #[test]
    fn test_quiz_skipping_answers_still_completes() {
        let (mut store, deck_id) = letters();
        let mut session =
            StudySession::open_seeded(&mut store, &deck_id, StudyConfig::default(), Some(3)).unwrap();

        session.start(StudyMode::Quiz);
        while session.next_question().unwrap().is_some() {}

        assert_eq!(session.summary().unwrap().unknown, 3);
        let progress = store.get_deck(&deck_id).unwrap().unwrap().progress;
        assert_eq!(progress.studied_count, 0);
    }
}
