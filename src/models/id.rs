//! Short base-36 identifiers for decks and cards.
use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
pub const ID_LEN: usize = 7;

/// Draws a fresh id. Not cryptographic; collisions are only avoided within a scope.
pub fn generate_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Draws ids until `taken` rejects none of them.
pub fn generate_unique_id<R, F>(rng: &mut R, taken: F) -> String
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    loop {
        let id = generate_id(rng);
        if !taken(&id) {
            return id;
        }
    }
}
