use core::ops::Range;
use std::borrow::Cow;

use super::chunk::Chunk;
use super::index::Index;
use super::metrics::ByteMetric;
use super::rope::{FANOUT, Rope};
use super::views::{Granularity, Utf16Unit};
use crate::tree::Leaves;

/// The chunks overlapping a byte range, each with the byte offset it
/// starts at.
#[derive(Clone)]
struct RawChunks<'a> {
    leaves: Leaves<'a, FANOUT, Chunk>,
    start_of_next: usize,
    end: usize,
}

impl<'a> RawChunks<'a> {
    #[inline]
    fn new(rope: &'a Rope, byte_range: Range<usize>) -> Self {
        if byte_range.is_empty() {
            return Self {
                leaves: rope.tree.leaves_from(rope.tree.leaf_count()),
                start_of_next: byte_range.start,
                end: byte_range.end,
            };
        }

        let pos = rope.tree.leaf_at_measure(ByteMetric(byte_range.start));

        Self {
            leaves: rope.tree.leaves_from(pos.index),
            start_of_next: pos.before.bytes,
            end: byte_range.end,
        }
    }
}

impl<'a> Iterator for RawChunks<'a> {
    type Item = (&'a Chunk, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.start_of_next >= self.end {
            return None;
        }

        let chunk = self.leaves.next()?;
        let start = self.start_of_next;
        self.start_of_next += chunk.len();
        Some((chunk, start))
    }
}

/// An iterator over the chunks of a [`Rope`], clipped to the iterated
/// range.
///
/// This is created by [`Rope::chunks()`].
///
/// # Examples
///
/// ```
/// # use bigtext::Rope;
/// #
/// let r = Rope::from("foo bar baz");
/// assert_eq!(r.chunks().collect::<String>(), "foo bar baz");
/// ```
#[derive(Clone)]
pub struct Chunks<'a> {
    raw: RawChunks<'a>,
    range: Range<usize>,
}

impl<'a> Chunks<'a> {
    #[inline]
    pub(super) fn new(rope: &'a Rope, byte_range: Range<usize>) -> Self {
        let raw = RawChunks::new(rope, byte_range.clone());
        Self { raw, range: byte_range }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (chunk, start) = self.raw.next()?;

        let text = chunk.as_str();
        let lo = self.range.start.saturating_sub(start);
        let hi = text.len().min(self.range.end - start);

        Some(&text[lo..hi])
    }
}

impl core::iter::FusedIterator for Chunks<'_> {}

/// An iterator over the bytes of a [`Rope`].
///
/// This is created by [`Rope::bytes()`] and by
/// [`Utf8View::iter()`](crate::Utf8View::iter).
#[derive(Clone)]
pub struct Bytes<'a> {
    chunks: Chunks<'a>,
    current: core::slice::Iter<'a, u8>,
    remaining: usize,
}

impl<'a> Bytes<'a> {
    #[inline]
    pub(super) fn new(rope: &'a Rope, byte_range: Range<usize>) -> Self {
        Self {
            remaining: byte_range.len(),
            chunks: Chunks::new(rope, byte_range),
            current: [].iter(),
        }
    }
}

impl Iterator for Bytes<'_> {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        loop {
            if let Some(&byte) = self.current.next() {
                self.remaining -= 1;
                return Some(byte);
            }
            self.current = self.chunks.next()?.as_bytes().iter();
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Bytes<'_> {}

impl core::iter::FusedIterator for Bytes<'_> {}

/// An iterator over the `char`s of a [`Rope`].
///
/// This is created by [`Rope::chars()`] and by
/// [`ScalarView::iter()`](crate::ScalarView::iter).
#[derive(Clone)]
pub struct Chars<'a> {
    chunks: Chunks<'a>,
    current: core::str::Chars<'a>,
}

impl<'a> Chars<'a> {
    #[inline]
    pub(super) fn new(rope: &'a Rope, byte_range: Range<usize>) -> Self {
        Self { chunks: Chunks::new(rope, byte_range), current: "".chars() }
    }
}

impl Iterator for Chars<'_> {
    type Item = char;

    #[inline]
    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(ch) = self.current.next() {
                return Some(ch);
            }
            self.current = self.chunks.next()?.chars();
        }
    }
}

impl core::iter::FusedIterator for Chars<'_> {}

/// An iterator over the UTF-16 code units of a [`Rope`].
///
/// This is created by [`Rope::utf16_units()`] and by
/// [`Utf16View::iter()`](crate::Utf16View::iter).
///
/// # Examples
///
/// ```
/// # use bigtext::Rope;
/// #
/// let r = Rope::from("a🗻");
/// let units = r.utf16_units().collect::<Vec<_>>();
///
/// assert_eq!(units, "a🗻".encode_utf16().collect::<Vec<_>>());
/// ```
#[derive(Clone)]
pub struct Utf16Units<'a> {
    chars: Chars<'a>,
    low_surrogate: Option<u16>,
    remaining: usize,
}

impl<'a> Utf16Units<'a> {
    #[inline]
    pub(super) fn new(rope: &'a Rope, range: Range<Index>) -> Self {
        let remaining = Utf16Unit::offset_of(rope, range.end)
            - Utf16Unit::offset_of(rope, range.start);

        // A trailing end includes the code point the low surrogate belongs
        // to, whose high surrogate is the last unit yielded.
        let end = if range.end.trailing {
            range.end.offset + rope.char_at(range.end).len_utf8()
        } else {
            range.end.offset
        };

        let mut chars = Chars::new(rope, range.start.offset..end);

        let mut low_surrogate = None;

        if range.start.trailing {
            if let Some(ch) = chars.next() {
                let mut buf = [0; 2];
                low_surrogate = Some(ch.encode_utf16(&mut buf)[1]);
            }
        }

        Self { chars, low_surrogate, remaining }
    }
}

impl Iterator for Utf16Units<'_> {
    type Item = u16;

    #[inline]
    fn next(&mut self) -> Option<u16> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;

        if let Some(unit) = self.low_surrogate.take() {
            return Some(unit);
        }

        let ch = self.chars.next()?;
        let mut buf = [0; 2];
        let units = ch.encode_utf16(&mut buf);

        if units.len() == 2 {
            self.low_surrogate = Some(units[1]);
        }

        Some(units[0])
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Utf16Units<'_> {}

impl core::iter::FusedIterator for Utf16Units<'_> {}

/// An iterator over the extended grapheme clusters of a [`Rope`].
///
/// Clusters that lie within a single chunk are borrowed, the ones
/// straddling chunk boundaries are allocated.
///
/// This is created by [`Rope::graphemes()`] and by
/// [`CharacterView::iter()`](crate::CharacterView::iter).
///
/// # Examples
///
/// ```
/// # use bigtext::Rope;
/// #
/// let r = Rope::from("a\u{200d}🐕‍🦺bc");
/// let characters = r.graphemes().collect::<Vec<_>>();
///
/// assert_eq!(characters, ["a\u{200d}", "🐕‍🦺", "b", "c"]);
/// ```
#[derive(Clone)]
pub struct Graphemes<'a> {
    raw: RawChunks<'a>,

    /// The chunk containing `pos`.
    current: Option<(&'a Chunk, usize)>,

    /// The byte offset of the next cluster to yield, always a cluster
    /// start.
    pos: usize,

    end: usize,
}

impl<'a> Graphemes<'a> {
    #[inline]
    pub(super) fn new(rope: &'a Rope, byte_range: Range<usize>) -> Self {
        let mut raw = RawChunks::new(rope, byte_range.clone());
        let current = raw.next();
        Self { raw, current, pos: byte_range.start, end: byte_range.end }
    }
}

impl<'a> Iterator for Graphemes<'a> {
    type Item = Cow<'a, str>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }

        let (chunk, start) = self.current?;
        let text = chunk.as_str();
        let local = self.pos - start;
        let chunk_end = (start + text.len()).min(self.end);

        if let Some(next) = chunk.next_start_after(local) {
            if start + next < chunk_end {
                self.pos = start + next;
                return Some(Cow::Borrowed(&text[local..next]));
            }
        }

        let head = &text[local..chunk_end - start];
        self.pos = chunk_end;

        let mut grapheme: Option<String> = None;

        while self.pos < self.end {
            let Some((next_chunk, next_start)) = self.raw.next() else {
                self.pos = self.end;
                break;
            };

            self.current = Some((next_chunk, next_start));

            let limit = next_chunk.len().min(self.end - next_start);

            let cut = next_chunk
                .breaks()
                .first
                .map_or(limit, |first| first.min(limit));

            if cut > 0 {
                grapheme
                    .get_or_insert_with(|| head.to_owned())
                    .push_str(&next_chunk.as_str()[..cut]);
            }

            self.pos = next_start + cut;

            if cut < next_chunk.len() {
                break;
            }
        }

        Some(grapheme.map_or(Cow::Borrowed(head), Cow::Owned))
    }
}

impl core::iter::FusedIterator for Graphemes<'_> {}

#[cfg(test)]
mod tests {
    use unicode_segmentation::UnicodeSegmentation;

    use super::*;

    #[test]
    fn chunks_in_range() {
        let text = "Hello, world! ".repeat(10);
        let r = Rope::from(text.as_str());

        for (start, end) in [(0, 0), (0, 5), (3, 40), (17, 140), (140, 140)] {
            let chunks = Chunks::new(&r, start..end).collect::<String>();
            assert_eq!(chunks, &text[start..end]);
        }
    }

    #[test]
    fn bytes_and_chars() {
        let text = "🗻∈🌏 foo bär ".repeat(8);
        let r = Rope::from(text.as_str());

        assert_eq!(r.bytes().len(), text.len());
        assert!(r.bytes().eq(text.bytes()));
        assert!(r.chars().eq(text.chars()));
        assert!(Chars::new(&r, 4..20).eq(text[4..20].chars()));
    }

    #[test]
    fn utf16_units_with_trailing_bounds() {
        let r = Rope::from("a🗻b🌏");

        let all = r.utf16_units().collect::<Vec<_>>();
        assert_eq!(all, "a🗻b🌏".encode_utf16().collect::<Vec<_>>());

        let from_low = Utf16Units::new(
            &r,
            Index::with_trailing(1, true)..Index::with_trailing(6, true),
        )
        .collect::<Vec<_>>();

        assert_eq!(from_low, all[2..5]);
    }

    #[test]
    fn graphemes_match_segmentation() {
        let text = "e\u{301}\u{302}\u{303} 🐕‍🦺\r\n🇮🇹🇫🇷 नमस्ते ".repeat(12);
        let r = Rope::from(text.as_str());

        let ours = r.graphemes().collect::<Vec<_>>();
        let theirs = text.graphemes(true).collect::<Vec<_>>();

        assert_eq!(ours, theirs);
        assert_eq!(r.character_len(), theirs.len());
    }

    #[test]
    fn graphemes_spanning_many_chunks() {
        let text = format!("a{}b", "\u{301}".repeat(100));
        let r = Rope::from(text.as_str());

        let characters = r.graphemes().collect::<Vec<_>>();

        assert_eq!(characters.len(), 2);
        assert!(matches!(characters[0], Cow::Owned(_)));
        assert_eq!(characters[0], &text[..text.len() - 1]);
        assert_eq!(characters[1], "b");
    }
}
