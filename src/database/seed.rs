//! Starter decks written to an empty store.
use crate::models::id::generate_unique_id;
use crate::models::{Card, Deck, DeckSet};
use rand::Rng;

const WEB_DEV: &[(&str, &str)] = &[
    ("What does HTML stand for?", "HyperText Markup Language"),
    ("What CSS property controls the text size?", "font-size"),
    (
        "How do you declare a variable in modern JavaScript?",
        "Using `let` or `const`",
    ),
    (
        "What is the purpose of the 'viewport' meta tag?",
        "To control the scaling and dimensions for mobile devices.",
    ),
    (
        "What is an event loop in JavaScript?",
        "A mechanism that handles asynchronous callbacks.",
    ),
];

const PHYSICS: &[(&str, &str)] = &[
    (
        "What is the formula for Force?",
        "$F = ma$ (Mass \\times Acceleration)",
    ),
    (
        "Define Kinetic Energy.",
        "The energy an object possesses due to its motion.",
    ),
    ("What is the unit of electric resistance?", "Ohm (Ω)"),
];

/// Builds the two sample decks with freshly drawn ids.
pub fn sample_decks<R: Rng + ?Sized>(rng: &mut R) -> DeckSet {
    let mut set = DeckSet::default();
    for (name, cards) in [("Web Dev Fundamentals", WEB_DEV), ("Physics Basics", PHYSICS)] {
        let id = generate_unique_id(rng, |candidate| set.has_deck_id(candidate));
        let mut deck = Deck::new(id, name);
        for (front, back) in cards {
            let card_id = generate_unique_id(rng, |candidate| deck.has_card_id(candidate));
            deck.cards.push(Card::new(card_id, *front, *back));
        }
        set.decks.push(deck);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sample_decks_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let set = sample_decks(&mut rng);

        assert_eq!(set.decks.len(), 2);
        assert_eq!(set.decks[0].name, "Web Dev Fundamentals");
        assert_eq!(set.decks[0].cards.len(), 5);
        assert_eq!(set.decks[1].name, "Physics Basics");
        assert_eq!(set.decks[1].cards.len(), 3);
        assert_ne!(set.decks[0].id, set.decks[1].id);
        for deck in &set.decks {
            assert_eq!(deck.progress.studied_count, 0);
            assert_eq!(deck.progress.known_count, 0);
        }
    }
}
