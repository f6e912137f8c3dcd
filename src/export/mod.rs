pub mod json;

pub use json::{export_deck_to_path, import_deck_from_path};
