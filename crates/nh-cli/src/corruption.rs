//! Sanity-based cosmetic text corruption.
//!
//! A presentation-layer effect only: the engine always emits plain
//! strings, and the driver garbles them at print time in proportion to
//! how frayed the active player's mind is.

use nh_core::MAX_SANITY;
use rand::Rng;

/// Replacement glyphs for corrupted characters.
const GLITCH_CHARSET: [char; 5] = ['░', '▒', '▓', '█', '▐'];

/// Per-character replacement probability at the slightest sanity loss.
const BASE_PROB: f64 = 0.03;
/// Additional probability at zero sanity.
const MAX_EXTRA: f64 = 0.25;

/// Garble a message according to the player's sanity. At full sanity the
/// message passes through untouched; as sanity drops, alphabetic
/// characters are increasingly replaced with glitch glyphs. Punctuation,
/// digits, and whitespace are never touched, so messages stay roughly
/// legible.
pub fn degrade_text(message: &str, sanity: i32, rng: &mut impl Rng) -> String {
    let sanity = sanity.clamp(0, MAX_SANITY);
    let severity = f64::from(MAX_SANITY - sanity) / f64::from(MAX_SANITY);
    if severity <= 0.0 {
        return message.to_string();
    }

    let p = BASE_PROB + severity * MAX_EXTRA;
    message
        .chars()
        .map(|ch| {
            if ch.is_alphabetic() && rng.random::<f64>() < p {
                GLITCH_CHARSET[rng.random_range(0..GLITCH_CHARSET.len())]
            } else {
                ch
            }
        })
        .collect()
}
