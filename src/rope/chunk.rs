use core::fmt::{self, Debug};
use core::ops::{Add, AddAssign, Sub, SubAssign};

use unicode_segmentation::UnicodeSegmentation;

use super::utils::*;
use crate::tree::{Leaf, Summary};

#[cfg(not(any(test, feature = "small_chunks")))]
const CHUNK_MAX_BYTES: usize = 1024;

#[cfg(any(test, feature = "small_chunks"))]
const CHUNK_MAX_BYTES: usize = 16;

const CHUNK_MIN_BYTES: usize = CHUNK_MAX_BYTES / 2;

/// The grapheme cluster starts falling within a chunk.
///
/// A chunk only stores where the first and the last of them are and how
/// many there are, everything in between is recomputed on demand. A chunk
/// can contain no starts at all if it's entirely covered by a cluster that
/// started in a previous chunk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Breaks {
    pub(crate) first: Option<usize>,
    pub(crate) last: Option<usize>,
    pub(crate) count: usize,
}

impl Breaks {
    #[inline]
    pub(super) fn push(&mut self, offset: usize) {
        debug_assert!(self.last.is_none_or(|last| last < offset));

        if self.first.is_none() {
            self.first = Some(offset);
        }
        self.last = Some(offset);
        self.count += 1;
    }

    /// Appends the breaks of the chunk that follows, whose offsets are
    /// relative to its own start.
    #[inline]
    fn append(&mut self, other: Self, shift: usize) {
        if let Some(first) = other.first {
            if self.first.is_none() {
                self.first = Some(first + shift);
            }
        }
        if let Some(last) = other.last {
            self.last = Some(last + shift);
        }
        self.count += other.count;
    }
}

#[derive(Clone, Default)]
pub(crate) struct Chunk {
    text: String,
    breaks: Breaks,
}

impl Debug for Chunk {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.text)
    }
}

impl Chunk {
    #[inline]
    pub(super) fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub(super) fn breaks(&self) -> Breaks {
        self.breaks
    }

    /// The number of bytes chunks must always stay under.
    #[inline]
    pub(super) const fn chunk_max() -> usize {
        // We can exceed the max by 3 bytes at most, which happens when the
        // split point would have landed after the first byte of a 4 byte
        // code point.
        Self::max_bytes() + 3
    }

    /// The number of bytes chunks must always stay over, unless the rope
    /// fits in a single chunk.
    #[inline]
    pub(super) const fn chunk_min() -> usize {
        Self::min_bytes() - 3
    }

    #[inline]
    pub(super) fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the offset of the last cluster start at or before `offset`,
    /// if there is one.
    #[inline]
    pub(super) fn last_start_at_or_before(
        &self,
        offset: usize,
    ) -> Option<usize> {
        match (self.breaks.first, self.breaks.last) {
            (Some(first), _) if offset < first => None,
            (_, Some(last)) if last <= offset => Some(last),
            _ => self.starts().take_while(|&start| start <= offset).last(),
        }
    }

    #[inline]
    pub(super) fn len(&self) -> usize {
        self.text.len()
    }

    /// The number of bytes chunks should aim to stay under.
    #[inline]
    pub(super) const fn max_bytes() -> usize {
        CHUNK_MAX_BYTES
    }

    /// The number of bytes chunks should aim to stay over.
    #[inline]
    pub(super) const fn min_bytes() -> usize {
        CHUNK_MIN_BYTES
    }

    #[inline]
    pub(super) fn new(text: &str, breaks: Breaks) -> Self {
        Self { text: text.to_owned(), breaks }
    }

    /// Returns the first cluster start after `offset`, which must either be
    /// a cluster start itself or come before the first one.
    #[inline]
    pub(super) fn next_start_after(&self, offset: usize) -> Option<usize> {
        match (self.breaks.first, self.breaks.last) {
            (None, _) => None,
            (Some(first), _) if offset < first => Some(first),
            (_, Some(last)) if offset >= last => None,
            _ => {
                // Segmentation can restart at any cluster start.
                self.text[offset..]
                    .grapheme_indices(true)
                    .nth(1)
                    .map(|(idx, _)| offset + idx)
            },
        }
    }

    /// Returns the offset of the `n`-th cluster start, if there is one.
    #[inline]
    pub(super) fn nth_start(&self, n: usize) -> Option<usize> {
        if n >= self.breaks.count {
            None
        } else if n + 1 == self.breaks.count {
            self.breaks.last
        } else {
            self.starts().nth(n)
        }
    }

    /// Appends the contents of the chunk that follows.
    #[inline]
    fn push_chunk(&mut self, other: Self) {
        self.breaks.append(other.breaks, self.text.len());
        self.text.push_str(&other.text);
    }

    /// Splits the chunk in two at the given byte offset, which has to lie
    /// on a char boundary, returning the right half.
    #[inline]
    fn split_off(&mut self, at: usize) -> Self {
        let mut left = Breaks::default();
        let mut right = Breaks::default();

        for start in self.starts() {
            if start < at {
                left.push(start);
            } else {
                right.push(start - at);
            }
        }

        let text = self.text.split_off(at);
        self.breaks = left;
        Self { text, breaks: right }
    }

    /// Returns the number of cluster starts strictly before `offset`.
    #[inline]
    pub(super) fn starts_before(&self, offset: usize) -> usize {
        match (self.breaks.first, self.breaks.last) {
            (Some(first), _) if offset <= first => 0,
            (_, Some(last)) if last < offset => self.breaks.count,
            _ => self.starts().take_while(|&start| start < offset).count(),
        }
    }

    /// Returns an iterator over the byte offsets of the cluster starts in
    /// this chunk.
    #[inline]
    pub(super) fn starts(&self) -> impl Iterator<Item = usize> + '_ {
        let first = self.breaks.first.unwrap_or(self.text.len());

        self.text[first..]
            .grapheme_indices(true)
            .map(move |(idx, _)| first + idx)
    }
}

impl Leaf for Chunk {
    type Summary = ChunkSummary;

    #[inline]
    fn summarize(&self) -> ChunkSummary {
        ChunkSummary {
            bytes: self.text.len(),
            utf16_units: str_indices::utf16::count(&self.text),
            scalars: str_indices::chars::count(&self.text),
            characters: self.breaks.count,
        }
    }

    #[inline]
    fn is_underfilled(&self) -> bool {
        self.text.len() < Self::chunk_min()
    }

    #[inline]
    fn balance_leaves(left: &mut Self, right: &mut Self) -> bool {
        let mut joined = core::mem::take(left);
        joined.push_chunk(core::mem::take(right));

        if joined.len() <= Self::max_bytes() {
            *left = joined;
            return true;
        }

        let mid = floor_char_boundary(joined.as_str(), joined.len() / 2);

        *right = joined.split_off(mid);
        *left = joined;
        false
    }
}

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub(crate) struct ChunkSummary {
    pub(crate) bytes: usize,
    pub(crate) utf16_units: usize,
    pub(crate) scalars: usize,
    pub(crate) characters: usize,
}

impl Add for ChunkSummary {
    type Output = Self;

    #[inline]
    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sub for ChunkSummary {
    type Output = Self;

    #[inline]
    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl AddAssign for ChunkSummary {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.bytes += rhs.bytes;
        self.utf16_units += rhs.utf16_units;
        self.scalars += rhs.scalars;
        self.characters += rhs.characters;
    }
}

impl SubAssign for ChunkSummary {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.bytes -= rhs.bytes;
        self.utf16_units -= rhs.utf16_units;
        self.scalars -= rhs.scalars;
        self.characters -= rhs.characters;
    }
}

impl Summary for ChunkSummary {}

/// Splits a string into pieces suitable to become chunks, i.e. pieces
/// between [`Chunk::chunk_min()`] and [`Chunk::max_bytes()`] bytes long
/// unless the whole string is shorter than that.
pub(super) struct Segmenter<'a> {
    text: &'a str,
    yielded: usize,
}

impl<'a> Segmenter<'a> {
    #[inline]
    pub(super) fn new(text: &'a str) -> Self {
        Self { text, yielded: 0 }
    }
}

impl<'a> Iterator for Segmenter<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let mut remaining = self.text.len() - self.yielded;

        let piece = if remaining == 0 {
            return None;
        } else if remaining > Chunk::max_bytes() {
            let mut piece_len = Chunk::max_bytes();

            remaining -= piece_len;

            if remaining < Chunk::min_bytes() {
                piece_len -= Chunk::min_bytes() - remaining;
            }

            let rest = &self.text[self.yielded..];

            let mut split = piece_len;
            while !rest.is_char_boundary(split) {
                split += 1;
            }

            &rest[..split]
        } else {
            debug_assert!(
                self.yielded == 0 || remaining >= Chunk::chunk_min()
            );

            &self.text[self.yielded..]
        };

        self.yielded += piece.len();

        Some(piece)
    }
}
