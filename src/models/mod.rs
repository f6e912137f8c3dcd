pub mod card;
pub mod deck;
pub mod deck_set;
pub mod id;
pub mod progress;

pub use card::Card;
pub use deck::Deck;
pub use deck_set::DeckSet;
pub use progress::Progress;
