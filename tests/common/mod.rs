#![allow(dead_code)]

use std::env;
use std::ops::Range;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

#[track_caller]
pub fn rng() -> StdRng {
    let seed = seed();
    println!("SEED: {seed:?}");
    StdRng::seed_from_u64(seed)
}

#[track_caller]
fn seed() -> u64 {
    match env::var("SEED") {
        Ok(seed) => seed.parse().expect("couldn't parse $SEED"),
        Err(env::VarError::NotPresent) => rand::random(),
        Err(env::VarError::NotUnicode(seed)) => {
            panic!("$SEED contained invalid unicode: {seed:?}")
        },
    }
}

/// 127 bytes, 103 scalars, 103 characters.
pub const TEXT: &str = "Hello there!  How're you doing?  It's a fine day, \
                        isn't it?  Aren't you glad we're alive?  \
                        こんにちは、みんなさん！";

/// 143 bytes, 107 scalars, 111 UTF-16 code units.
pub const TEXT_EMOJI: &str = "Hello there!🐸  How're you doing?🐸  It's a \
                              fine day, isn't it?🐸  Aren't you glad we're \
                              alive?🐸  こんにちは、みんなさん！";

/// A word with a zero width joiner attached to it followed by a single
/// emoji ZWJ sequence: 4 characters, 7 scalars.
pub const ZWJ: &str = "a\u{200d}🐕‍🦺bc";

/// Pieces of text whose grapheme clusters depend on what surrounds them.
pub const PIECES: &[&str] = &[
    "a",
    "foo ",
    "bär",
    " ",
    "\u{301}",
    "e\u{301}",
    "\u{e9}",
    "\r",
    "\n",
    "\r\n",
    "🐕",
    "\u{200d}",
    "🦺",
    "🇮",
    "🇹",
    "न",
    "\u{94d}",
    "ते",
    "\u{1100}",
    "\u{1161}",
    "\u{11a8}",
    "한",
    "🗻",
    "∈",
];

/// Returns a string made of `pieces` random [`PIECES`].
pub fn random_text(rng: &mut impl Rng, pieces: usize) -> String {
    (0..pieces).filter_map(|_| PIECES.choose(rng).copied()).collect()
}

/// Returns a random char boundary of `s`.
pub fn random_char_boundary(rng: &mut impl Rng, s: &str) -> usize {
    let mut offset = rng.random_range(0..=s.len());
    while !s.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Returns a random range of `s` whose ends are char boundaries.
pub fn random_range(rng: &mut impl Rng, s: &str) -> Range<usize> {
    let a = random_char_boundary(rng, s);
    let b = random_char_boundary(rng, s);
    a.min(b)..a.max(b)
}

/// A few kilobytes of mixed text, big enough to span many chunks.
pub fn large_text() -> String {
    let mut text = String::new();
    for i in 0..40 {
        text.push_str(TEXT_EMOJI);
        text.push_str(if i % 2 == 0 { "\r\n" } else { "\n" });
        text.push_str(ZWJ);
        text.push_str(" cafe\u{301} 🇮🇹 नमस्ते ");
    }
    text
}
