use core::ops::{Range, RangeBounds};
use core::sync::atomic::{AtomicU64, Ordering};
use std::borrow::Cow;

use super::chunk::{Chunk, Segmenter};
use super::graphemes::BreakScanner;
use super::index::{Hint, Index};
use super::iterators::{Bytes, Chars, Chunks, Graphemes, Utf16Units};
use super::metrics::{ByteMetric, CharacterMetric, ScalarMetric, Utf16Metric};
use super::utils::*;
use super::views::{Character, Granularity, Scalar, View};
use super::{CharacterView, ScalarView, Utf16View, Utf8View};
use crate::tree::{LeafPath, LeafPosition, Tree};

#[cfg(any(test, feature = "arity_4"))]
pub(super) const FANOUT: usize = 4;

#[cfg(not(any(test, feature = "arity_4")))]
pub(super) const FANOUT: usize = 16;

/// Returns a stamp no rope has been given before.
#[inline]
fn next_stamp() -> u64 {
    static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);
    NEXT_STAMP.fetch_add(1, Ordering::Relaxed)
}

/// A persistent UTF-8 text rope.
///
/// Cloning a `Rope` is `O(1)`, and clones share all of their storage until
/// one of them is edited, at which point only the parts of the tree on the
/// path to the edit are copied.
///
/// The text can be navigated in UTF-8 code units, UTF-16 code units,
/// Unicode scalar values or extended grapheme clusters through the
/// corresponding [views](Self::characters), all of which share the same
/// [`Index`] type.
#[derive(Clone)]
pub struct Rope {
    pub(super) tree: Tree<FANOUT, Chunk>,

    /// Changes every time the rope is mutated. Index hints computed on a
    /// different stamp are ignored.
    pub(super) stamp: u64,
}

/// The chunk containing some byte offset, together with where it starts.
#[derive(Copy, Clone, Debug)]
pub(super) struct Located<'a> {
    pub(super) chunk: &'a Chunk,
    pub(super) start: usize,
    path: Option<LeafPath>,
}

impl<'a> Located<'a> {
    #[inline]
    pub(super) fn end(&self) -> usize {
        self.start + self.chunk.len()
    }

    #[inline]
    pub(super) fn text(&self) -> &'a str {
        self.chunk.as_str()
    }
}

impl<'a> From<LeafPosition<'a, Chunk>> for Located<'a> {
    #[inline]
    fn from(pos: LeafPosition<'a, Chunk>) -> Self {
        Self { chunk: pos.leaf, start: pos.before.bytes, path: pos.path }
    }
}

impl Rope {
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        self.tree.assert_invariants();

        let mut scanner = BreakScanner::default();

        for (idx, chunk) in self.tree.leaves().enumerate() {
            assert!(
                chunk.len() <= Chunk::chunk_max(),
                "chunk {idx} is {} bytes long, the max is {}",
                chunk.len(),
                Chunk::chunk_max()
            );

            assert!(
                !chunk.is_empty() || self.tree.leaf_count() == 1,
                "chunk {idx} is empty"
            );

            let breaks = scanner.scan(chunk.as_str());

            assert_eq!(
                breaks,
                chunk.breaks(),
                "chunk {idx} ({chunk:?}) has stale grapheme breaks"
            );
        }
    }

    /// Returns the byte at `byte_index`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds (i.e. greater than or equal to
    /// [`byte_len()`](Self::byte_len())).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigtext::Rope;
    /// #
    /// let r = Rope::from("bar");
    ///
    /// assert_eq!(r.byte(0), b'b');
    /// assert_eq!(r.byte(2), b'r');
    /// ```
    #[track_caller]
    #[inline]
    pub fn byte(&self, byte_index: usize) -> u8 {
        if byte_index >= self.byte_len() {
            byte_index_out_of_bounds(byte_index, self.byte_len());
        }

        let loc = self.locate_byte(byte_index);
        loc.chunk.as_str().as_bytes()[byte_index - loc.start]
    }

    /// Returns the length of the text in bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.tree.summary().bytes
    }

    /// Returns an iterator over the bytes of the text.
    #[inline]
    pub fn bytes(&self) -> Bytes<'_> {
        Bytes::new(self, 0..self.byte_len())
    }

    /// Returns the number of extended grapheme clusters in the text.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigtext::Rope;
    /// #
    /// let r = Rope::from("a\u{200d}🐕‍🦺bc");
    ///
    /// assert_eq!(r.character_len(), 4);
    /// assert_eq!(r.scalar_len(), 7);
    /// ```
    #[inline]
    pub fn character_len(&self) -> usize {
        self.tree.measure::<CharacterMetric>().0
    }

    /// Returns a view of the text as a sequence of extended grapheme
    /// clusters.
    #[inline]
    pub fn characters(&self) -> CharacterView<'_> {
        View::new(self)
    }

    /// Returns an iterator over the `char`s of the text.
    #[inline]
    pub fn chars(&self) -> Chars<'_> {
        Chars::new(self, 0..self.byte_len())
    }

    /// Returns an iterator over the chunks of the text.
    #[inline]
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks::new(self, 0..self.byte_len())
    }

    /// Removes all the text.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Deletes the text in the given byte range.
    ///
    /// # Panics
    ///
    /// Panics if the start is greater than the end, if the end is out of
    /// bounds or if either of them doesn't lie on a char boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigtext::Rope;
    /// #
    /// let mut r = Rope::from("Hello, world!");
    /// r.delete(5..12);
    /// assert_eq!(r, "Hello!");
    /// ```
    #[track_caller]
    #[inline]
    pub fn delete<R>(&mut self, byte_range: R)
    where
        R: RangeBounds<usize>,
    {
        self.replace(byte_range, "");
    }

    /// Returns the end index of the rope, which is the same in every view.
    #[inline]
    pub fn end_index(&self) -> Index {
        Index::new(self.byte_len())
    }

    /// Returns the same index with a hint of where its chunk is, making
    /// the following navigations from it cheaper.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[track_caller]
    #[inline]
    pub fn ensure_leaf(&self, index: Index) -> Index {
        self.check_index(index);
        let loc = self.locate(index);
        self.index_near(index.offset, index.trailing, &loc)
    }

    /// Returns a new rope containing only the text in the given byte range.
    ///
    /// The new rope shares all the chunks that are entirely within the
    /// range with this one.
    ///
    /// # Panics
    ///
    /// Panics if the start is greater than the end, if the end is out of
    /// bounds or if either of them doesn't lie on a char boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigtext::Rope;
    /// #
    /// let r = Rope::from("🗻∈🌏");
    /// assert_eq!(r.extract(4..7), "∈");
    /// ```
    #[track_caller]
    #[inline]
    pub fn extract<R>(&self, byte_range: R) -> Rope
    where
        R: RangeBounds<usize>,
    {
        let (start, end) = self.check_byte_range(byte_range);

        let mut rope = self.clone();

        if end < rope.byte_len() {
            rope.replace_unchecked(end, rope.byte_len(), "");
        }

        if start > 0 {
            rope.replace_unchecked(0, start, "");
        }

        rope
    }

    /// Returns an iterator over the extended grapheme clusters of the text.
    #[inline]
    pub fn graphemes(&self) -> Graphemes<'_> {
        Graphemes::new(self, 0..self.byte_len())
    }

    /// Inserts `text` at the given byte offset.
    ///
    /// # Panics
    ///
    /// Panics if the offset is out of bounds or if it doesn't lie on a char
    /// boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigtext::Rope;
    /// #
    /// let mut r = Rope::from("Hello!");
    /// r.insert(5, ", world");
    /// assert_eq!(r, "Hello, world!");
    /// ```
    #[track_caller]
    #[inline]
    pub fn insert<T>(&mut self, byte_offset: usize, text: T)
    where
        T: AsRef<str>,
    {
        self.replace(byte_offset..byte_offset, text);
    }

    /// Inserts `text` at the given index, which is first rounded down to a
    /// scalar boundary.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[track_caller]
    #[inline]
    pub fn insert_at<T>(&mut self, index: Index, text: T)
    where
        T: AsRef<str>,
    {
        self.replace_subrange(index..index, text);
    }

    /// Returns whether the two ropes share the same storage, in which case
    /// they're guaranteed to contain the same text.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigtext::Rope;
    /// #
    /// let r = Rope::from("foo");
    /// let mut clone = r.clone();
    /// assert!(r.is_identical(&clone));
    ///
    /// clone.insert(3, "bar");
    /// assert!(!r.is_identical(&clone));
    /// ```
    #[inline]
    pub fn is_identical(&self, other: &Self) -> bool {
        self.tree.ptr_eq(&other.tree)
    }

    /// Returns whether the byte offset lies on a `char` boundary. Offsets
    /// past the end are never boundaries.
    #[inline]
    pub fn is_char_boundary(&self, byte_offset: usize) -> bool {
        if byte_offset == 0 || byte_offset == self.byte_len() {
            return true;
        }

        if byte_offset > self.byte_len() {
            return false;
        }

        let loc = self.locate_byte(byte_offset);
        loc.text().is_char_boundary(byte_offset - loc.start)
    }

    /// Returns whether the byte offset lies on an extended grapheme cluster
    /// boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigtext::Rope;
    /// #
    /// let r = Rope::from("e\u{301}!");
    ///
    /// assert!(r.is_character_boundary(0));
    /// assert!(!r.is_character_boundary(1));
    /// assert!(r.is_character_boundary(3));
    /// ```
    #[inline]
    pub fn is_character_boundary(&self, byte_offset: usize) -> bool {
        self.is_char_boundary(byte_offset)
            && Character::round_down(self, Index::new(byte_offset)).offset
                == byte_offset
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.byte_len() == 0
    }

    /// Creates an empty rope.
    #[inline]
    pub fn new() -> Self {
        Self { tree: Tree::default(), stamp: next_stamp() }
    }

    /// Appends `text` at the end of the rope.
    #[inline]
    pub fn push_str<T>(&mut self, text: T)
    where
        T: AsRef<str>,
    {
        let end = self.byte_len();
        self.replace(end..end, text);
    }

    /// Removes the text between the two indices, which are first rounded
    /// down to scalar boundaries.
    ///
    /// # Panics
    ///
    /// Panics if the start comes after the end or if the end is out of
    /// bounds.
    #[track_caller]
    #[inline]
    pub fn remove_subrange(&mut self, range: Range<Index>) {
        self.replace_subrange(range, "");
    }

    /// Replaces the text in the given byte range with `text`.
    ///
    /// # Panics
    ///
    /// Panics if the start is greater than the end, if the end is out of
    /// bounds or if either of them doesn't lie on a char boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigtext::Rope;
    /// #
    /// let mut r = Rope::from("café");
    /// r.replace(3..5, "e\u{301}");
    ///
    /// assert_eq!(r, "café");
    /// assert!(!r.utf8_eq(&Rope::from("café")));
    /// ```
    #[track_caller]
    #[inline]
    pub fn replace<R, T>(&mut self, byte_range: R, text: T)
    where
        R: RangeBounds<usize>,
        T: AsRef<str>,
    {
        let (start, end) = self.check_byte_range(byte_range);

        let text = text.as_ref();

        if start == end && text.is_empty() {
            return;
        }

        self.replace_unchecked(start, end, text);
    }

    /// Replaces the text between the two indices, which are first rounded
    /// down to scalar boundaries.
    ///
    /// # Panics
    ///
    /// Panics if the start comes after the end or if the end is out of
    /// bounds.
    #[track_caller]
    #[inline]
    pub fn replace_subrange<T>(&mut self, range: Range<Index>, text: T)
    where
        T: AsRef<str>,
    {
        let (start, end) = self.check_index_range(range);

        let start = Scalar::round_down(self, start).offset;
        let end = Scalar::round_down(self, end).offset;

        let text = text.as_ref();

        if start == end && text.is_empty() {
            return;
        }

        self.replace_unchecked(start, end, text);
    }

    /// Returns the number of Unicode scalar values in the text.
    #[inline]
    pub fn scalar_len(&self) -> usize {
        self.tree.measure::<ScalarMetric>().0
    }

    /// Returns a view of the text as a sequence of Unicode scalar values.
    #[inline]
    pub fn scalars(&self) -> ScalarView<'_> {
        View::new(self)
    }

    /// Returns the start index of the rope, which is the same in every
    /// view.
    #[inline]
    pub fn start_index(&self) -> Index {
        Index::new(0)
    }

    /// Shortens the rope to the given byte length.
    ///
    /// # Panics
    ///
    /// Panics if the length is greater than the current one or if it
    /// doesn't lie on a char boundary.
    #[track_caller]
    #[inline]
    pub fn truncate(&mut self, byte_len: usize) {
        self.delete(byte_len..);
    }

    /// Calls `f` with the text in the given byte range and replaces it
    /// with the returned string.
    ///
    /// If `f` fails its error is returned as is and the rope is left
    /// untouched.
    ///
    /// # Panics
    ///
    /// Panics if the start is greater than the end, if the end is out of
    /// bounds or if either of them doesn't lie on a char boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigtext::Rope;
    /// #
    /// let mut r = Rope::from("count: 41");
    ///
    /// r.try_replace_with(7.., |n| {
    ///     n.parse::<u32>().map(|n| (n + 1).to_string())
    /// })
    /// .unwrap();
    /// assert_eq!(r, "count: 42");
    ///
    /// assert!(r.try_replace_with(..5, |s| s.parse::<u32>()
    ///     .map(|n| n.to_string()))
    ///     .is_err());
    /// assert_eq!(r, "count: 42");
    /// ```
    #[track_caller]
    #[inline]
    pub fn try_replace_with<R, F, E>(
        &mut self,
        byte_range: R,
        f: F,
    ) -> Result<(), E>
    where
        R: RangeBounds<usize>,
        F: FnOnce(&str) -> Result<String, E>,
    {
        let (start, end) = self.check_byte_range(byte_range);

        let replacement = f(&self.text_in(start..end))?;

        if start != end || !replacement.is_empty() {
            self.replace_unchecked(start, end, &replacement);
        }

        Ok(())
    }

    /// Keeps only the extended grapheme clusters for which `f` returns
    /// `Ok(true)`.
    ///
    /// If `f` fails its error is returned as is and the rope is left
    /// untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigtext::Rope;
    /// #
    /// let mut r = Rope::from("a1b2🐕‍🦺3");
    ///
    /// r.try_retain_characters(|c| {
    ///     Ok::<_, ()>(!c.chars().all(|ch| ch.is_ascii_digit()))
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(r, "ab🐕‍🦺");
    /// ```
    #[inline]
    pub fn try_retain_characters<F, E>(&mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&str) -> Result<bool, E>,
    {
        let mut builder = super::RopeBuilder::new();
        let mut removed = false;

        for character in self.graphemes() {
            if f(&character)? {
                builder.append(&*character);
            } else {
                removed = true;
            }
        }

        if removed {
            *self = builder.build();
        }

        Ok(())
    }

    /// Returns the length of the text in UTF-16 code units.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigtext::Rope;
    /// #
    /// let r = Rope::from("a🗻");
    /// assert_eq!(r.utf16_len(), 3);
    /// ```
    #[inline]
    pub fn utf16_len(&self) -> usize {
        self.tree.measure::<Utf16Metric>().0
    }

    /// Returns a view of the text as a sequence of UTF-16 code units.
    #[inline]
    pub fn utf16(&self) -> Utf16View<'_> {
        View::new(self)
    }

    /// Returns an iterator over the UTF-16 code units of the text.
    #[inline]
    pub fn utf16_units(&self) -> Utf16Units<'_> {
        Utf16Units::new(self, self.start_index()..self.end_index())
    }

    /// Returns a view of the text as a sequence of UTF-8 code units.
    #[inline]
    pub fn utf8(&self) -> Utf8View<'_> {
        View::new(self)
    }
}

/// Internals shared with the views and the iterators.
impl Rope {
    /// Returns the `char` starting at `byte_offset`, which must be a char
    /// boundary before the end.
    #[inline]
    pub(super) fn char_at(&self, index: Index) -> char {
        let loc = self.locate(index);

        match loc.text()[index.offset - loc.start..].chars().next() {
            Some(ch) => ch,
            None => unreachable!("{index:?} is at the end of the rope"),
        }
    }

    /// Returns the `char` ending at `byte_offset`, which must be a char
    /// boundary after the start.
    #[inline]
    pub(super) fn char_before(&self, index: Index) -> char {
        let loc = self.locate_before(index);

        match loc.text()[..index.offset - loc.start].chars().next_back() {
            Some(ch) => ch,
            None => unreachable!("{index:?} is at the start of the rope"),
        }
    }

    #[track_caller]
    #[inline]
    pub(super) fn check_byte_range<R>(&self, byte_range: R) -> (usize, usize)
    where
        R: RangeBounds<usize>,
    {
        let (start, end) =
            range_bounds_to_start_end(byte_range, 0, self.byte_len());

        if start > end {
            byte_start_after_end(start, end);
        }

        if end > self.byte_len() {
            byte_offset_out_of_bounds(end, self.byte_len());
        }

        if !self.is_char_boundary(start) {
            byte_offset_not_char_boundary(start);
        }

        if !self.is_char_boundary(end) {
            byte_offset_not_char_boundary(end);
        }

        (start, end)
    }

    #[track_caller]
    #[inline]
    pub(super) fn check_index(&self, index: Index) {
        if index.offset > self.byte_len() {
            index_out_of_bounds(index.offset, self.byte_len());
        }
    }

    #[track_caller]
    #[inline]
    pub(super) fn check_index_range(
        &self,
        range: Range<Index>,
    ) -> (Index, Index) {
        self.check_index(range.end);

        if range.start > range.end {
            index_start_after_end(range.start.offset, range.end.offset);
        }

        (range.start, range.end)
    }

    /// Returns the largest char boundary less than or equal to the index.
    #[inline]
    pub(super) fn floor_char_boundary(&self, index: Index) -> Index {
        if index.offset >= self.byte_len() {
            return Index::new(self.byte_len());
        }

        let loc = self.locate(index);
        let local = floor_char_boundary(loc.text(), index.offset - loc.start);
        self.index_near(loc.start + local, false, &loc)
    }

    /// Creates an index at the given offset, with a hint pointing to the
    /// located chunk if it contains the offset.
    #[inline]
    pub(super) fn index_near(
        &self,
        offset: usize,
        trailing: bool,
        loc: &Located<'_>,
    ) -> Index {
        let in_chunk = loc.start <= offset
            && (offset < loc.end() || offset == self.byte_len());

        let hint = loc.path.filter(|_| in_chunk).map(|path| Hint {
            stamp: self.stamp,
            path,
            chunk_start: loc.start,
            chunk_len: loc.chunk.len(),
        });

        Index { offset, trailing, hint }
    }

    /// Returns the chunk containing the byte at the index, or the last
    /// chunk if the index is at the end of the rope.
    #[inline]
    pub(super) fn locate(&self, index: Index) -> Located<'_> {
        if let Some(hint) = index.hint {
            let at_end = index.offset == self.byte_len()
                && hint.chunk_start + hint.chunk_len == index.offset;

            let fresh = hint.stamp == self.stamp;

            if fresh && (hint.contains(index.offset) || at_end) {
                return Located {
                    chunk: self.tree.leaf_at_path(hint.path),
                    start: hint.chunk_start,
                    path: Some(hint.path),
                };
            }
        }

        self.locate_byte(index.offset)
    }

    /// Returns the chunk containing the byte just before the index, which
    /// must not be at the start of the rope.
    #[inline]
    pub(super) fn locate_before(&self, index: Index) -> Located<'_> {
        debug_assert!(index.offset > 0);

        if let Some(hint) = index.hint {
            if hint.stamp == self.stamp
                && hint.chunk_start < index.offset
                && index.offset <= hint.chunk_start + hint.chunk_len
            {
                return Located {
                    chunk: self.tree.leaf_at_path(hint.path),
                    start: hint.chunk_start,
                    path: Some(hint.path),
                };
            }
        }

        self.locate_byte(index.offset - 1)
    }

    #[inline]
    pub(super) fn locate_byte(&self, byte_offset: usize) -> Located<'_> {
        self.tree.leaf_at_measure(ByteMetric(byte_offset)).into()
    }

    /// Returns the chunk after the located one, following its path when it
    /// has one.
    #[inline]
    pub(super) fn next_located(
        &self,
        loc: &Located<'_>,
    ) -> Option<Located<'_>> {
        if loc.end() >= self.byte_len() {
            return None;
        }

        match loc.path.and_then(|path| self.tree.next_leaf(path)) {
            Some((path, chunk)) => {
                Some(Located { chunk, start: loc.end(), path: Some(path) })
            },
            None => Some(self.locate_byte(loc.end())),
        }
    }

    /// Returns the chunk before the located one, following its path when
    /// it has one.
    #[inline]
    pub(super) fn prev_located(
        &self,
        loc: &Located<'_>,
    ) -> Option<Located<'_>> {
        if loc.start == 0 {
            return None;
        }

        match loc.path.and_then(|path| self.tree.prev_leaf(path)) {
            Some((path, chunk)) => Some(Located {
                chunk,
                start: loc.start - chunk.len(),
                path: Some(path),
            }),
            None => Some(self.locate_byte(loc.start - 1)),
        }
    }

    /// Returns the text in the given byte range, borrowing it if it lies
    /// within a single chunk.
    #[inline]
    pub(super) fn text_in(&self, byte_range: Range<usize>) -> Cow<'_, str> {
        if byte_range.is_empty() {
            return Cow::Borrowed("");
        }

        let loc = self.locate_byte(byte_range.start);

        if byte_range.end <= loc.end() {
            let text = loc.text();
            Cow::Borrowed(
                &text[byte_range.start - loc.start..byte_range.end - loc.start],
            )
        } else {
            Cow::Owned(Chunks::new(self, byte_range).collect())
        }
    }
}

/// The edit engine.
impl Rope {
    /// Returns the text of the last (possibly unfinished) grapheme cluster
    /// before the leaf with the given index.
    fn carry_before(&self, leaf_idx: usize) -> String {
        let mut pieces = Vec::new();
        let mut idx = leaf_idx;

        while idx > 0 {
            idx -= 1;

            let chunk = self.tree.leaf(idx);

            match chunk.breaks().last {
                Some(last) => {
                    pieces.push(&chunk.as_str()[last..]);
                    break;
                },
                None => pieces.push(chunk.as_str()),
            }
        }

        pieces.iter().rev().copied().collect()
    }

    /// Replaces the text in `start..end` with `text`, assuming both
    /// offsets have already been checked.
    pub(super) fn replace_unchecked(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
    ) {
        let leaf_count = self.tree.leaf_count();

        let first = self.tree.leaf_at_measure(ByteMetric(start));

        let last = if end > start {
            self.tree.leaf_at_measure(ByteMetric(end - 1))
        } else {
            first
        };

        let mut lo = first.index;
        let mut hi = last.index + 1;

        let head = &first.leaf.as_str()[..start - first.before.bytes];
        let tail = &last.leaf.as_str()[end - last.before.bytes..];

        let mut region =
            String::with_capacity(head.len() + text.len() + tail.len());
        region.push_str(head);
        region.push_str(text);
        region.push_str(tail);

        // The region has to be big enough to stand on its own unless it's
        // the whole rope.
        if region.len() < Chunk::min_bytes() {
            if lo > 0 {
                lo -= 1;
                region.insert_str(0, self.tree.leaf(lo).as_str());
            } else if hi < leaf_count {
                region.push_str(self.tree.leaf(hi).as_str());
                hi += 1;
            }
        }

        let mut scanner = BreakScanner::with_carry(self.carry_before(lo));

        let mut leaves = Segmenter::new(&region)
            .map(|piece| Chunk::new(piece, scanner.scan(piece)))
            .collect::<Vec<_>>();

        let inserted_leaves = leaves.len();

        // Keep rescanning the following leaves until one of them ends up
        // with the same breaks it already had and starts a new cluster,
        // after which segmentation is back in sync.
        while hi < leaf_count {
            let chunk = self.tree.leaf(hi);
            let breaks = scanner.scan(chunk.as_str());

            if breaks == chunk.breaks() && breaks.first.is_some() {
                break;
            }

            leaves.push(Chunk::new(chunk.as_str(), breaks));
            hi += 1;
        }

        tracing::trace!(
            start,
            end,
            inserted_bytes = text.len(),
            replaced_leaves = hi - lo,
            new_leaves = leaves.len(),
            resynced_leaves = leaves.len() - inserted_leaves,
            depth = self.tree.depth(),
            "replaced byte range"
        );

        self.tree.replace_leaves(lo..hi, leaves);
        self.stamp = next_stamp();
    }
}

impl Default for Rope {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Rope {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Rope(\"")?;
        debug_chunks(self.chunks(), f)?;
        f.write_str("\")")
    }
}

impl core::fmt::Display for Rope {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for chunk in self.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl From<&str> for Rope {
    #[inline]
    fn from(text: &str) -> Self {
        let mut scanner = BreakScanner::default();

        let tree = Tree::from_leaves(
            Segmenter::new(text)
                .map(|piece| Chunk::new(piece, scanner.scan(piece))),
        );

        Self { tree, stamp: next_stamp() }
    }
}

impl From<String> for Rope {
    #[inline]
    fn from(text: String) -> Self {
        Self::from(&*text)
    }
}

impl From<Cow<'_, str>> for Rope {
    #[inline]
    fn from(text: Cow<'_, str>) -> Self {
        Self::from(&*text)
    }
}

impl From<&Rope> for String {
    #[inline]
    fn from(rope: &Rope) -> Self {
        let mut text = String::with_capacity(rope.byte_len());
        for chunk in rope.chunks() {
            text.push_str(chunk);
        }
        text
    }
}

impl From<Rope> for String {
    #[inline]
    fn from(rope: Rope) -> Self {
        (&rope).into()
    }
}

impl<'a> FromIterator<&'a str> for Rope {
    #[inline]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut builder = super::RopeBuilder::new();
        for text in iter {
            builder.append(text);
        }
        builder.build()
    }
}

impl FromIterator<String> for Rope {
    #[inline]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut builder = super::RopeBuilder::new();
        for text in iter {
            builder.append(text);
        }
        builder.build()
    }
}

impl Rope {
    #[inline]
    pub(super) fn from_tree(tree: Tree<FANOUT, Chunk>) -> Self {
        Self { tree, stamp: next_stamp() }
    }
}
