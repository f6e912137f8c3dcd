//! Deck store: the single source of truth for decks and cards
//!
//! Every operation loads the whole document from storage, applies its change in
//! memory and writes the whole document back. Nothing is cached between calls.
//! Ids that do not resolve are not errors: mutations report whether they
//! applied and leave storage untouched when they did not.

use super::seed::sample_decks;
use super::storage::{BACKUP_KEY, STORAGE_KEY, Storage};
use super::Result;
use crate::models::id::generate_unique_id;
use crate::models::{Card, Deck, DeckSet, Progress};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

/// Receiver of per-card study outcomes.
pub trait OutcomeRecorder {
    /// Returns `false` when the deck no longer exists.
    fn record_study_outcome(&mut self, deck_id: &str, was_known: bool) -> Result<bool>;
}

pub struct DeckStore<S: Storage> {
    storage: S,
    rng: StdRng,
}

impl<S: Storage> DeckStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_rng(storage, StdRng::from_entropy())
    }

    /// Store whose generated ids are reproducible.
    pub fn with_seed(storage: S, seed: u64) -> Self {
        Self::with_rng(storage, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(storage: S, rng: StdRng) -> Self {
        Self { storage, rng }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns every deck, seeding the store first if it has never been written.
    pub fn list_decks(&mut self) -> Result<Vec<Deck>> {
        Ok(self.load()?.decks)
    }

    pub fn get_deck(&mut self, deck_id: &str) -> Result<Option<Deck>> {
        Ok(self.load()?.decks.into_iter().find(|d| d.id == deck_id))
    }

    /// Appends an empty deck and returns its id. Names are not validated.
    pub fn create_deck(&mut self, name: &str) -> Result<String> {
        let id = self
            .update(|set, rng| {
                let id = generate_unique_id(rng, |candidate| set.has_deck_id(candidate));
                set.decks.push(Deck::new(id.clone(), name));
                Some(id)
            })?
            .unwrap_or_default();
        info!(deck_id = %id, name, "created deck");
        Ok(id)
    }

    pub fn rename_deck(&mut self, deck_id: &str, name: &str) -> Result<bool> {
        let applied = self
            .update(|set, _| {
                let deck = set.deck_mut(deck_id)?;
                deck.name = name.to_string();
                Some(())
            })?
            .is_some();
        self.log_outcome("rename_deck", deck_id, applied);
        Ok(applied)
    }

    pub fn delete_deck(&mut self, deck_id: &str) -> Result<bool> {
        let applied = self
            .update(|set, _| {
                let before = set.decks.len();
                set.decks.retain(|d| d.id != deck_id);
                (set.decks.len() != before).then_some(())
            })?
            .is_some();
        self.log_outcome("delete_deck", deck_id, applied);
        Ok(applied)
    }

    /// Appends a card and returns its id, or `None` if the deck is absent.
    pub fn add_card(&mut self, deck_id: &str, front: &str, back: &str) -> Result<Option<String>> {
        let card_id = self.update(|set, rng| {
            let deck = set.deck_mut(deck_id)?;
            let id = generate_unique_id(rng, |candidate| deck.has_card_id(candidate));
            deck.cards.push(Card::new(id.clone(), front, back));
            Some(id)
        })?;
        self.log_outcome("add_card", deck_id, card_id.is_some());
        Ok(card_id)
    }

    pub fn update_card(
        &mut self,
        deck_id: &str,
        card_id: &str,
        front: &str,
        back: &str,
    ) -> Result<bool> {
        let applied = self
            .update(|set, _| {
                let card = set.deck_mut(deck_id)?.card_mut(card_id)?;
                card.front = front.to_string();
                card.back = back.to_string();
                Some(())
            })?
            .is_some();
        self.log_outcome("update_card", deck_id, applied);
        Ok(applied)
    }

    pub fn delete_card(&mut self, deck_id: &str, card_id: &str) -> Result<bool> {
        let applied = self
            .update(|set, _| {
                let deck = set.deck_mut(deck_id)?;
                let before = deck.cards.len();
                deck.cards.retain(|c| c.id != card_id);
                (deck.cards.len() != before).then_some(())
            })?
            .is_some();
        self.log_outcome("delete_card", deck_id, applied);
        Ok(applied)
    }

    /// Counts one studied card for the deck, and one known card when `was_known`.
    pub fn record_study_outcome(&mut self, deck_id: &str, was_known: bool) -> Result<bool> {
        let applied = self
            .update(|set, _| {
                let deck = set.deck_mut(deck_id)?;
                deck.progress.record(was_known, Utc::now());
                Some(())
            })?
            .is_some();
        self.log_outcome("record_study_outcome", deck_id, applied);
        Ok(applied)
    }

    /// Adds a deck loaded from elsewhere. Deck and card ids are re-issued so
    /// they cannot clash with existing ones; text and progress are kept.
    pub fn import_deck(&mut self, deck: Deck) -> Result<String> {
        let name = deck.name.clone();
        let card_count = deck.cards.len();
        let id = self
            .update(move |set, rng| {
                let id = generate_unique_id(rng, |candidate| set.has_deck_id(candidate));
                let mut imported = Deck {
                    id: id.clone(),
                    name: deck.name,
                    cards: Vec::with_capacity(deck.cards.len()),
                    progress: deck.progress,
                };
                for card in deck.cards {
                    let card_id =
                        generate_unique_id(rng, |candidate| imported.has_card_id(candidate));
                    imported.cards.push(Card::new(card_id, card.front, card.back));
                }
                set.decks.push(imported);
                Some(id)
            })?
            .unwrap_or_default();
        info!(deck_id = %id, name = %name, cards = card_count, "imported deck");
        Ok(id)
    }

    /// Drops every deck and brings back the sample decks with fresh ids.
    pub fn restore_sample_decks(&mut self) -> Result<Vec<Deck>> {
        self.storage.remove_item(STORAGE_KEY)?;
        info!("cleared stored decks");
        self.list_decks()
    }

    /// Resets a deck's counters to zero.
    pub fn reset_progress(&mut self, deck_id: &str) -> Result<bool> {
        let applied = self
            .update(|set, _| {
                set.deck_mut(deck_id)?.progress = Progress::default();
                Some(())
            })?
            .is_some();
        self.log_outcome("reset_progress", deck_id, applied);
        Ok(applied)
    }

    fn load(&mut self) -> Result<DeckSet> {
        match self.storage.get_item(STORAGE_KEY)? {
            Some(raw) => match serde_json::from_str::<DeckSet>(&raw) {
                Ok(set) => Ok(set),
                Err(err) => {
                    warn!(
                        error = %err,
                        backup_key = BACKUP_KEY,
                        "stored decks are unreadable, keeping a copy and replacing them with sample decks"
                    );
                    self.storage.set_item(BACKUP_KEY, &raw)?;
                    self.seed()
                }
            },
            None => self.seed(),
        }
    }

    fn seed(&mut self) -> Result<DeckSet> {
        let set = sample_decks(&mut self.rng);
        self.save(&set)?;
        info!(decks = set.decks.len(), "seeded store with sample decks");
        Ok(set)
    }

    fn save(&mut self, set: &DeckSet) -> Result<()> {
        let raw = serde_json::to_string(set)?;
        self.storage.set_item(STORAGE_KEY, &raw)
    }

    /// Load, apply `change`, and save only if it returned `Some`.
    fn update<T>(
        &mut self,
        change: impl FnOnce(&mut DeckSet, &mut StdRng) -> Option<T>,
    ) -> Result<Option<T>> {
        let mut set = self.load()?;
        let outcome = change(&mut set, &mut self.rng);
        if outcome.is_some() {
            self.save(&set)?;
        }
        Ok(outcome)
    }

    fn log_outcome(&self, operation: &str, deck_id: &str, applied: bool) {
        if applied {
            debug!(operation, deck_id, "applied");
        } else {
            debug!(operation, deck_id, "id not found, nothing changed");
        }
    }
}

impl<S: Storage> OutcomeRecorder for DeckStore<S> {
    fn record_study_outcome(&mut self, deck_id: &str, was_known: bool) -> Result<bool> {
        DeckStore::record_study_outcome(self, deck_id, was_known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{MemoryStorage, SqliteStorage};

    fn empty_store() -> DeckStore<MemoryStorage> {
        DeckStore::with_seed(MemoryStorage::with_item(STORAGE_KEY, "[]"), 42)
    }

    fn store_with_deck(cards: &[(&str, &str)]) -> (DeckStore<MemoryStorage>, String) {
        let mut store = empty_store();
        let deck_id = store.create_deck("Test Deck").unwrap();
        for (front, back) in cards {
            store.add_card(&deck_id, front, back).unwrap();
        }
        (store, deck_id)
    }

    #[test]
    fn test_fresh_store_is_seeded() {
        let mut store = DeckStore::with_seed(MemoryStorage::new(), 1);
        let decks = store.list_decks().unwrap();

        assert_eq!(decks.len(), 2);
        assert_eq!(decks[0].name, "Web Dev Fundamentals");
        assert_eq!(decks[1].name, "Physics Basics");
    }

    #[test]
    fn test_seeded_ids_are_stable_between_calls() {
        let mut store = DeckStore::with_seed(MemoryStorage::new(), 1);
        let first = store.list_decks().unwrap();
        let second = store.list_decks().unwrap();

        assert_eq!(first, second);
        assert!(store.get_deck(&first[1].id).unwrap().is_some());
    }

    #[test]
    fn test_emptied_store_is_not_reseeded() {
        let mut store = DeckStore::with_seed(MemoryStorage::new(), 1);
        for deck in store.list_decks().unwrap() {
            assert!(store.delete_deck(&deck.id).unwrap());
        }

        assert!(store.list_decks().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_document_falls_back_to_seed() {
        let storage = MemoryStorage::with_item(STORAGE_KEY, "{ this is not valid json }");
        let mut store = DeckStore::with_seed(storage, 3);

        let decks = store.list_decks().unwrap();
        assert_eq!(decks.len(), 2);

        let raw = store.storage().get_item(STORAGE_KEY).unwrap().unwrap();
        assert!(serde_json::from_str::<DeckSet>(&raw).is_ok());
    }

    #[test]
    fn test_corrupt_document_is_backed_up_before_seeding() {
        let original = r#"[{"id":"keep1","name":"My cards","cards":[],"progress":{"studiedCount":"oops"}}]"#;
        let mut store = DeckStore::with_seed(MemoryStorage::with_item(STORAGE_KEY, original), 3);

        let names: Vec<_> = store.list_decks().unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Web Dev Fundamentals", "Physics Basics"]);

        let backup = store.storage().get_item(BACKUP_KEY).unwrap();
        assert_eq!(backup.as_deref(), Some(original));
        assert_eq!(store.storage().write_count(), 2);
    }

    #[test]
    fn test_reads_of_valid_document_do_not_write() {
        let (mut store, deck_id) = store_with_deck(&[("A", "a")]);
        let writes = store.storage().write_count();

        store.list_decks().unwrap();
        store.get_deck(&deck_id).unwrap();
        store.get_deck("missing").unwrap();

        assert_eq!(store.storage().write_count(), writes);
        assert_eq!(store.storage().get_item(BACKUP_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_sample_decks_replaces_user_decks() {
        let (mut store, deck_id) = store_with_deck(&[("A", "a")]);

        let decks = store.restore_sample_decks().unwrap();
        assert_eq!(decks.len(), 2);
        assert!(store.get_deck(&deck_id).unwrap().is_none());
        assert_eq!(store.list_decks().unwrap(), decks);
    }

    #[test]
    fn test_create_deck() {
        let mut store = empty_store();
        let id = store.create_deck("Spanish").unwrap();

        let deck = store.get_deck(&id).unwrap().unwrap();
        assert_eq!(deck.name, "Spanish");
        assert!(deck.cards.is_empty());
        assert_eq!(deck.progress, Progress::default());
    }

    #[test]
    fn test_duplicate_names_are_allowed() {
        let mut store = empty_store();
        let a = store.create_deck("Same").unwrap();
        let b = store.create_deck("Same").unwrap();

        assert_ne!(a, b);
        assert_eq!(store.list_decks().unwrap().len(), 2);
    }

    #[test]
    fn test_rename_deck() {
        let mut store = empty_store();
        let id = store.create_deck("Old").unwrap();

        assert!(store.rename_deck(&id, "New").unwrap());
        assert_eq!(store.get_deck(&id).unwrap().unwrap().name, "New");
        assert!(!store.rename_deck("missing", "Nope").unwrap());
    }

    #[test]
    fn test_delete_deck_removes_only_that_deck() {
        let mut store = empty_store();
        let keep = store.create_deck("Keep").unwrap();
        let drop = store.create_deck("Drop").unwrap();

        assert!(store.delete_deck(&drop).unwrap());

        let decks = store.list_decks().unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].id, keep);
        assert!(store.get_deck(&drop).unwrap().is_none());
    }

    #[test]
    fn test_missing_ids_do_not_write() {
        let (mut store, deck_id) = store_with_deck(&[("A", "a")]);
        let writes = store.storage().write_count();

        assert!(!store.delete_deck("missing").unwrap());
        assert_eq!(store.add_card("missing", "x", "y").unwrap(), None);
        assert!(!store.update_card(&deck_id, "missing", "x", "y").unwrap());
        assert!(!store.update_card("missing", "missing", "x", "y").unwrap());
        assert!(!store.delete_card(&deck_id, "missing").unwrap());
        assert!(!store.record_study_outcome("missing", true).unwrap());

        assert_eq!(store.storage().write_count(), writes);
    }

    #[test]
    fn test_add_update_delete_card_roundtrip() {
        let (mut store, deck_id) = store_with_deck(&[("A", "a"), ("B", "b")]);
        let before = store.get_deck(&deck_id).unwrap().unwrap().cards;

        let card_id = store.add_card(&deck_id, "C", "c").unwrap().unwrap();
        assert!(store.update_card(&deck_id, &card_id, "C2", "c2").unwrap());

        let deck = store.get_deck(&deck_id).unwrap().unwrap();
        let card = deck.card(&card_id).unwrap();
        assert_eq!((card.front.as_str(), card.back.as_str()), ("C2", "c2"));
        assert_eq!(deck.cards.last().map(|c| c.id.as_str()), Some(card_id.as_str()));

        assert!(store.delete_card(&deck_id, &card_id).unwrap());
        let after = store.get_deck(&deck_id).unwrap().unwrap().cards;
        assert_eq!(after, before);
    }

    #[test]
    fn test_empty_card_text_is_accepted() {
        let (mut store, deck_id) = store_with_deck(&[]);
        let card_id = store.add_card(&deck_id, "", "").unwrap();

        assert!(card_id.is_some());
    }

    #[test]
    fn test_record_study_outcome_counts() {
        let (mut store, deck_id) = store_with_deck(&[("A", "a")]);
        let outcomes = [true, false, true, true, false];

        for known in outcomes {
            assert!(store.record_study_outcome(&deck_id, known).unwrap());
        }

        let progress = store.get_deck(&deck_id).unwrap().unwrap().progress;
        assert_eq!(progress.studied_count, 5);
        assert_eq!(progress.known_count, 3);
        assert!(progress.last_studied_at.is_some());
    }

    #[test]
    fn test_record_study_outcome_repairs_missing_progress() {
        let legacy = r#"[{"id": "legacy1", "name": "Legacy", "cards": []}]"#;
        let mut store = DeckStore::with_seed(MemoryStorage::with_item(STORAGE_KEY, legacy), 9);

        assert!(store.record_study_outcome("legacy1", true).unwrap());

        let raw = store.storage().get_item(STORAGE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["progress"]["studiedCount"], 1);
        assert_eq!(json[0]["progress"]["knownCount"], 1);
    }

    #[test]
    fn test_import_deck_reissues_ids() {
        let (mut store, deck_id) = store_with_deck(&[("A", "a"), ("B", "b")]);
        let original = store.get_deck(&deck_id).unwrap().unwrap();

        let new_id = store.import_deck(original.clone()).unwrap();
        assert_ne!(new_id, deck_id);

        let imported = store.get_deck(&new_id).unwrap().unwrap();
        assert_eq!(imported.name, original.name);
        let texts: Vec<_> = imported.cards.iter().map(|c| c.front.as_str()).collect();
        assert_eq!(texts, vec!["A", "B"]);
        assert_eq!(store.list_decks().unwrap().len(), 2);
    }

    #[test]
    fn test_reset_progress() {
        let (mut store, deck_id) = store_with_deck(&[("A", "a")]);
        store.record_study_outcome(&deck_id, true).unwrap();

        assert!(store.reset_progress(&deck_id).unwrap());
        assert_eq!(
            store.get_deck(&deck_id).unwrap().unwrap().progress,
            Progress::default()
        );
    }

    #[test]
    fn test_works_over_sqlite() {
        let mut store = DeckStore::with_seed(SqliteStorage::open_in_memory().unwrap(), 11);
        let id = store.create_deck("SQL").unwrap();
        store.add_card(&id, "SELECT", "reads rows").unwrap();

        let deck = store.get_deck(&id).unwrap().unwrap();
        assert_eq!(deck.cards.len(), 1);
        assert_eq!(store.list_decks().unwrap().len(), 3);
    }
}
