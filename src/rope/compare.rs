//! Comparison and hashing.
//!
//! Ropes compare by Unicode canonical equivalence, one extended grapheme
//! cluster at a time, so that `"é"` and `"e\u{301}"` are equal. Comparing the
//! raw bytes is available through [`Rope::utf8_eq()`] and
//! [`Rope::utf8_cmp()`].

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use super::rope::Rope;
use super::utils::chunks_eq_chunks;

#[inline]
fn character_eq(lhs: &str, rhs: &str) -> bool {
    lhs == rhs || lhs.nfc().eq(rhs.nfc())
}

#[inline]
fn character_cmp(lhs: &str, rhs: &str) -> Ordering {
    if lhs == rhs {
        Ordering::Equal
    } else {
        lhs.nfc().cmp(rhs.nfc())
    }
}

/// Checks two sequences of extended grapheme clusters for canonical
/// equivalence.
#[inline]
pub(super) fn canonical_eq<'a, 'b, L, R>(mut lhs: L, mut rhs: R) -> bool
where
    L: Iterator<Item = Cow<'a, str>>,
    R: Iterator<Item = Cow<'b, str>>,
{
    loop {
        match (lhs.next(), rhs.next()) {
            (Some(l), Some(r)) => {
                if !character_eq(&l, &r) {
                    return false;
                }
            },
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// Orders two sequences of extended grapheme clusters by the scalars of
/// their canonical compositions, cluster by cluster.
#[inline]
pub(super) fn canonical_cmp<'a, 'b, L, R>(mut lhs: L, mut rhs: R) -> Ordering
where
    L: Iterator<Item = Cow<'a, str>>,
    R: Iterator<Item = Cow<'b, str>>,
{
    loop {
        match (lhs.next(), rhs.next()) {
            (Some(l), Some(r)) => match character_cmp(&l, &r) {
                Ordering::Equal => {},
                ord => return ord,
            },
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
        }
    }
}

/// Feeds the canonical composition of every cluster to the hasher, each
/// followed by a `0xff` byte, which never appears in UTF-8. One more `0xff`
/// marks the end, so that the empty rope still writes something and no
/// hashed sequence is a prefix of another.
#[inline]
pub(super) fn canonical_hash<'a, I, H>(characters: I, state: &mut H)
where
    I: Iterator<Item = Cow<'a, str>>,
    H: Hasher,
{
    let mut buf = [0; 4];

    for character in characters {
        for ch in character.nfc() {
            state.write(ch.encode_utf8(&mut buf).as_bytes());
        }
        state.write_u8(0xff);
    }

    state.write_u8(0xff);
}

/// Checks whether the rope contains exactly the bytes of `s`.
#[inline]
fn bytes_eq_str(rope: &Rope, s: &str) -> bool {
    if rope.byte_len() != s.len() {
        return false;
    }

    let mut rest = s.as_bytes();

    for chunk in rope.chunks() {
        let (head, tail) = rest.split_at(chunk.len());
        if head != chunk.as_bytes() {
            return false;
        }
        rest = tail;
    }

    true
}

#[inline]
fn str_characters(s: &str) -> impl Iterator<Item = Cow<'_, str>> {
    s.graphemes(true).map(Cow::Borrowed)
}

impl Rope {
    /// Checks whether the two ropes contain exactly the same bytes.
    ///
    /// Unlike `==`, this doesn't consider canonically equivalent texts
    /// equal.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigtext::Rope;
    /// #
    /// let composed = Rope::from("caf\u{e9}");
    /// let decomposed = Rope::from("cafe\u{301}");
    ///
    /// assert_eq!(composed, decomposed);
    /// assert!(!composed.utf8_eq(&decomposed));
    /// ```
    #[inline]
    pub fn utf8_eq(&self, other: &Self) -> bool {
        if self.is_identical(other) {
            return true;
        }

        self.byte_len() == other.byte_len()
            && chunks_eq_chunks(self.chunks(), other.chunks())
    }

    /// Orders the two ropes by their bytes.
    #[inline]
    pub fn utf8_cmp(&self, other: &Self) -> Ordering {
        if self.is_identical(other) {
            return Ordering::Equal;
        }

        self.bytes().cmp(other.bytes())
    }
}

impl PartialEq for Rope {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.utf8_eq(other)
            || canonical_eq(self.graphemes(), other.graphemes())
    }
}

impl Eq for Rope {}

impl PartialOrd for Rope {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rope {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        if self.is_identical(other) {
            return Ordering::Equal;
        }

        canonical_cmp(self.graphemes(), other.graphemes())
    }
}

impl Hash for Rope {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_hash(self.graphemes(), state);
    }
}

impl PartialEq<str> for Rope {
    #[inline]
    fn eq(&self, rhs: &str) -> bool {
        bytes_eq_str(self, rhs)
            || canonical_eq(self.graphemes(), str_characters(rhs))
    }
}

impl PartialEq<Rope> for str {
    #[inline]
    fn eq(&self, rhs: &Rope) -> bool {
        rhs == self
    }
}

impl PartialEq<&str> for Rope {
    #[inline]
    fn eq(&self, rhs: &&str) -> bool {
        self == *rhs
    }
}

impl PartialEq<Rope> for &str {
    #[inline]
    fn eq(&self, rhs: &Rope) -> bool {
        rhs == *self
    }
}

impl PartialEq<String> for Rope {
    #[inline]
    fn eq(&self, rhs: &String) -> bool {
        self == rhs.as_str()
    }
}

impl PartialEq<Rope> for String {
    #[inline]
    fn eq(&self, rhs: &Rope) -> bool {
        rhs == self.as_str()
    }
}

impl PartialEq<Cow<'_, str>> for Rope {
    #[inline]
    fn eq(&self, rhs: &Cow<'_, str>) -> bool {
        self == &**rhs
    }
}
