//! Views of a [`Rope`] as a sequence of elements of some granularity, all
//! sharing the rope's [`Index`] type.

use core::cmp::Ordering;
use core::fmt::Debug;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::Range;
use std::borrow::Cow;

use super::compare::{canonical_cmp, canonical_eq, canonical_hash};
use super::index::Index;
use super::iterators::{Bytes, Chars, Chunks, Graphemes, Utf16Units};
use super::metrics::{ByteMetric, CharacterMetric, ScalarMetric, Utf16Metric};
use super::rope::{Located, Rope};
use super::utils::*;

mod sealed {
    pub trait Sealed {}
}

/// The unit in which a view counts and navigates the text.
///
/// This trait is sealed: it's implemented by [`Utf8Unit`], [`Utf16Unit`],
/// [`Scalar`] and [`Character`] and can't be implemented outside of this
/// crate.
pub trait Granularity: Copy + Debug + sealed::Sealed {
    /// The type of the elements yielded by the view.
    type Element<'a>;

    /// The iterator over the elements of the view.
    type Iter<'a>: Iterator<Item = Self::Element<'a>>;

    #[doc(hidden)]
    const NAME: &'static str;

    #[doc(hidden)]
    fn len(rope: &Rope) -> usize;

    /// Returns the closest boundary at or before the index.
    #[doc(hidden)]
    fn round_down(rope: &Rope, index: Index) -> Index;

    /// Returns the boundary after the index, which has to be a boundary
    /// before the end.
    #[doc(hidden)]
    fn step_forward(rope: &Rope, index: Index) -> Index;

    /// Returns the boundary before the index, which has to be a boundary
    /// after the start.
    #[doc(hidden)]
    fn step_backward(rope: &Rope, index: Index) -> Index;

    /// Returns the number of elements before the index, which has to be a
    /// boundary.
    #[doc(hidden)]
    fn offset_of(rope: &Rope, index: Index) -> usize;

    /// Returns the boundary preceded by `offset` elements.
    #[doc(hidden)]
    fn index_at(rope: &Rope, offset: usize) -> Index;

    #[doc(hidden)]
    fn element(rope: &Rope, index: Index) -> Self::Element<'_>;

    #[doc(hidden)]
    fn iter(rope: &Rope, range: Range<Index>) -> Self::Iter<'_>;

    #[doc(hidden)]
    fn eq_ranges(
        lhs: &Rope,
        lhs_range: Range<Index>,
        rhs: &Rope,
        rhs_range: Range<Index>,
    ) -> bool;

    #[doc(hidden)]
    fn cmp_ranges(
        lhs: &Rope,
        lhs_range: Range<Index>,
        rhs: &Rope,
        rhs_range: Range<Index>,
    ) -> Ordering;

    #[doc(hidden)]
    fn hash_range<H: Hasher>(rope: &Rope, range: Range<Index>, state: &mut H);
}

/// UTF-8 code units, i.e. bytes.
#[derive(Copy, Clone, Debug)]
pub enum Utf8Unit {}

/// UTF-16 code units. Code points outside of the Basic Multilingual Plane
/// are split in a surrogate pair, and the index of the low surrogate is
/// marked as [trailing](Index::is_trailing_surrogate).
#[derive(Copy, Clone, Debug)]
pub enum Utf16Unit {}

/// Unicode scalar values, i.e. `char`s.
#[derive(Copy, Clone, Debug)]
pub enum Scalar {}

/// Extended grapheme clusters, i.e. user-perceived characters.
#[derive(Copy, Clone, Debug)]
pub enum Character {}

impl sealed::Sealed for Utf8Unit {}
impl sealed::Sealed for Utf16Unit {}
impl sealed::Sealed for Scalar {}
impl sealed::Sealed for Character {}

/// Implements the comparison and hashing methods for granularities whose
/// elements are compared one by one.
macro_rules! elementwise_comparison {
    () => {
        #[inline]
        fn eq_ranges(
            lhs: &Rope,
            lhs_range: Range<Index>,
            rhs: &Rope,
            rhs_range: Range<Index>,
        ) -> bool {
            Self::iter(lhs, lhs_range).eq(Self::iter(rhs, rhs_range))
        }

        #[inline]
        fn cmp_ranges(
            lhs: &Rope,
            lhs_range: Range<Index>,
            rhs: &Rope,
            rhs_range: Range<Index>,
        ) -> Ordering {
            Self::iter(lhs, lhs_range).cmp(Self::iter(rhs, rhs_range))
        }

        #[inline]
        fn hash_range<H: Hasher>(
            rope: &Rope,
            range: Range<Index>,
            state: &mut H,
        ) {
            for element in Self::iter(rope, range) {
                element.hash(state);
            }
            state.write_u8(0xff);
        }
    };
}

impl Granularity for Utf8Unit {
    type Element<'a> = u8;
    type Iter<'a> = Bytes<'a>;

    const NAME: &'static str = "Utf8View";

    #[inline]
    fn len(rope: &Rope) -> usize {
        rope.byte_len()
    }

    #[inline]
    fn round_down(_: &Rope, index: Index) -> Index {
        index.moved(index.offset, false)
    }

    #[inline]
    fn step_forward(_: &Rope, index: Index) -> Index {
        index.moved(index.offset + 1, false)
    }

    #[inline]
    fn step_backward(_: &Rope, index: Index) -> Index {
        index.moved(index.offset - 1, false)
    }

    #[inline]
    fn offset_of(_: &Rope, index: Index) -> usize {
        index.offset
    }

    #[inline]
    fn index_at(_: &Rope, offset: usize) -> Index {
        Index::new(offset)
    }

    #[inline]
    fn element(rope: &Rope, index: Index) -> u8 {
        let loc = rope.locate(index);
        loc.text().as_bytes()[index.offset - loc.start]
    }

    #[inline]
    fn iter(rope: &Rope, range: Range<Index>) -> Bytes<'_> {
        Bytes::new(rope, range.start.offset..range.end.offset)
    }

    elementwise_comparison!();
}

impl Granularity for Utf16Unit {
    type Element<'a> = u16;
    type Iter<'a> = Utf16Units<'a>;

    const NAME: &'static str = "Utf16View";

    #[inline]
    fn len(rope: &Rope) -> usize {
        rope.utf16_len()
    }

    #[inline]
    fn round_down(rope: &Rope, index: Index) -> Index {
        let floor = rope.floor_char_boundary(index);

        let trailing = index.trailing
            && floor.offset == index.offset
            && floor.offset < rope.byte_len()
            && rope.char_at(floor).len_utf16() == 2;

        Index { trailing, ..floor }
    }

    #[inline]
    fn step_forward(rope: &Rope, index: Index) -> Index {
        let ch = rope.char_at(index);

        if !index.trailing && ch.len_utf16() == 2 {
            Index { trailing: true, ..index }
        } else {
            index.moved(index.offset + ch.len_utf8(), false)
        }
    }

    #[inline]
    fn step_backward(rope: &Rope, index: Index) -> Index {
        if index.trailing {
            return Index { trailing: false, ..index };
        }

        let ch = rope.char_before(index);
        let offset = index.offset - ch.len_utf8();
        index.moved(offset, ch.len_utf16() == 2)
    }

    #[inline]
    fn offset_of(rope: &Rope, index: Index) -> usize {
        let pos = rope.tree.leaf_at_measure(ByteMetric(index.offset));

        pos.before.utf16_units
            + str_indices::utf16::from_byte_idx(
                pos.leaf.as_str(),
                index.offset - pos.before.bytes,
            )
            + index.trailing as usize
    }

    #[inline]
    fn index_at(rope: &Rope, offset: usize) -> Index {
        if offset >= rope.utf16_len() {
            return rope.end_index();
        }

        let pos = rope.tree.leaf_at_measure(Utf16Metric(offset));

        let (local, trailing) =
            utf16_to_byte(pos.leaf.as_str(), offset - pos.before.utf16_units);

        let loc = Located::from(pos);
        rope.index_near(loc.start + local, trailing, &loc)
    }

    #[inline]
    fn element(rope: &Rope, index: Index) -> u16 {
        let mut buf = [0; 2];
        let units = rope.char_at(index).encode_utf16(&mut buf);
        units[index.trailing as usize]
    }

    #[inline]
    fn iter(rope: &Rope, range: Range<Index>) -> Utf16Units<'_> {
        Utf16Units::new(rope, range)
    }

    elementwise_comparison!();
}

impl Granularity for Scalar {
    type Element<'a> = char;
    type Iter<'a> = Chars<'a>;

    const NAME: &'static str = "ScalarView";

    #[inline]
    fn len(rope: &Rope) -> usize {
        rope.scalar_len()
    }

    #[inline]
    fn round_down(rope: &Rope, index: Index) -> Index {
        rope.floor_char_boundary(index)
    }

    #[inline]
    fn step_forward(rope: &Rope, index: Index) -> Index {
        let ch = rope.char_at(index);
        index.moved(index.offset + ch.len_utf8(), false)
    }

    #[inline]
    fn step_backward(rope: &Rope, index: Index) -> Index {
        let ch = rope.char_before(index);
        index.moved(index.offset - ch.len_utf8(), false)
    }

    #[inline]
    fn offset_of(rope: &Rope, index: Index) -> usize {
        let pos = rope.tree.leaf_at_measure(ByteMetric(index.offset));

        pos.before.scalars
            + str_indices::chars::from_byte_idx(
                pos.leaf.as_str(),
                index.offset - pos.before.bytes,
            )
    }

    #[inline]
    fn index_at(rope: &Rope, offset: usize) -> Index {
        if offset >= rope.scalar_len() {
            return rope.end_index();
        }

        let pos = rope.tree.leaf_at_measure(ScalarMetric(offset));

        let local = str_indices::chars::to_byte_idx(
            pos.leaf.as_str(),
            offset - pos.before.scalars,
        );

        let loc = Located::from(pos);
        rope.index_near(loc.start + local, false, &loc)
    }

    #[inline]
    fn element(rope: &Rope, index: Index) -> char {
        rope.char_at(index)
    }

    #[inline]
    fn iter(rope: &Rope, range: Range<Index>) -> Chars<'_> {
        Chars::new(rope, range.start.offset..range.end.offset)
    }

    elementwise_comparison!();
}

/// Returns the last cluster start before the located chunk.
#[inline]
fn character_start_before<'a>(rope: &'a Rope, loc: &Located<'a>) -> Index {
    let mut loc = *loc;

    // The first chunk always starts with a cluster.
    while let Some(prev) = rope.prev_located(&loc) {
        if let Some(last) = prev.chunk.breaks().last {
            return rope.index_near(prev.start + last, false, &prev);
        }
        loc = prev;
    }

    rope.start_index()
}

/// Returns the first cluster start after the located chunk, or the end of
/// the rope if there's none.
#[inline]
fn character_start_after<'a>(rope: &'a Rope, loc: &Located<'a>) -> Index {
    let mut loc = *loc;

    while let Some(next) = rope.next_located(&loc) {
        if let Some(first) = next.chunk.breaks().first {
            return rope.index_near(next.start + first, false, &next);
        }
        loc = next;
    }

    rope.end_index()
}

impl Granularity for Character {
    type Element<'a> = Cow<'a, str>;
    type Iter<'a> = Graphemes<'a>;

    const NAME: &'static str = "CharacterView";

    #[inline]
    fn len(rope: &Rope) -> usize {
        rope.character_len()
    }

    #[inline]
    fn round_down(rope: &Rope, index: Index) -> Index {
        let floor = rope.floor_char_boundary(index);

        if floor.offset >= rope.byte_len() {
            return rope.end_index();
        }

        let loc = rope.locate(floor);

        match loc.chunk.last_start_at_or_before(floor.offset - loc.start) {
            Some(start) => rope.index_near(loc.start + start, false, &loc),
            None => character_start_before(rope, &loc),
        }
    }

    #[inline]
    fn step_forward(rope: &Rope, index: Index) -> Index {
        let loc = rope.locate(index);

        match loc.chunk.next_start_after(index.offset - loc.start) {
            Some(next) => rope.index_near(loc.start + next, false, &loc),
            None => character_start_after(rope, &loc),
        }
    }

    #[inline]
    fn step_backward(rope: &Rope, index: Index) -> Index {
        let loc = rope.locate_before(index);

        match loc.chunk.last_start_at_or_before(index.offset - 1 - loc.start) {
            Some(start) => rope.index_near(loc.start + start, false, &loc),
            None => character_start_before(rope, &loc),
        }
    }

    #[inline]
    fn offset_of(rope: &Rope, index: Index) -> usize {
        let pos = rope.tree.leaf_at_measure(ByteMetric(index.offset));

        pos.before.characters
            + pos.leaf.starts_before(index.offset - pos.before.bytes)
    }

    #[inline]
    fn index_at(rope: &Rope, offset: usize) -> Index {
        if offset >= rope.character_len() {
            return rope.end_index();
        }

        let pos = rope.tree.leaf_at_measure(CharacterMetric(offset));

        let Some(local) = pos.leaf.nth_start(offset - pos.before.characters)
        else {
            unreachable!("the chunk's break count covers the offset");
        };

        let loc = Located::from(pos);
        rope.index_near(loc.start + local, false, &loc)
    }

    #[inline]
    fn element(rope: &Rope, index: Index) -> Cow<'_, str> {
        let next = Self::step_forward(rope, index);
        rope.text_in(index.offset..next.offset)
    }

    #[inline]
    fn iter(rope: &Rope, range: Range<Index>) -> Graphemes<'_> {
        Graphemes::new(rope, range.start.offset..range.end.offset)
    }

    #[inline]
    fn eq_ranges(
        lhs: &Rope,
        lhs_range: Range<Index>,
        rhs: &Rope,
        rhs_range: Range<Index>,
    ) -> bool {
        canonical_eq(Self::iter(lhs, lhs_range), Self::iter(rhs, rhs_range))
    }

    #[inline]
    fn cmp_ranges(
        lhs: &Rope,
        lhs_range: Range<Index>,
        rhs: &Rope,
        rhs_range: Range<Index>,
    ) -> Ordering {
        canonical_cmp(Self::iter(lhs, lhs_range), Self::iter(rhs, rhs_range))
    }

    #[inline]
    fn hash_range<H: Hasher>(rope: &Rope, range: Range<Index>, state: &mut H) {
        canonical_hash(Self::iter(rope, range), state);
    }
}

/// Moving an index by at most this many elements is done by stepping
/// instead of converting to and from offsets.
const STEPPING_DISTANCE: usize = 4;

/// The navigation logic shared by views and sub-views, working between two
/// boundaries of the same rope.
struct Span<'a, G: Granularity> {
    rope: &'a Rope,
    lower: Index,
    upper: Index,
    lower_units: usize,
    upper_units: usize,
    granularity: PhantomData<G>,
}

impl<'a, G: Granularity> Span<'a, G> {
    #[track_caller]
    #[inline]
    fn check(&self, index: Index) {
        if index < self.lower || index > self.upper {
            index_outside_bounds(
                index.offset,
                self.lower.offset,
                self.upper.offset,
            );
        }
    }

    #[track_caller]
    #[inline]
    fn distance(&self, from: Index, to: Index) -> isize {
        self.units_before(to) as isize - self.units_before(from) as isize
    }

    #[track_caller]
    #[inline]
    fn first(&self) -> Option<G::Element<'a>> {
        (self.lower < self.upper).then(|| G::element(self.rope, self.lower))
    }

    #[track_caller]
    #[inline]
    fn get(&self, index: Index) -> G::Element<'a> {
        let index = self.round_down(index);

        if index >= self.upper {
            index_at_end();
        }

        G::element(self.rope, index)
    }

    #[track_caller]
    #[inline]
    fn index_after(&self, index: Index) -> Index {
        let index = self.round_down(index);

        if index >= self.upper {
            index_after_end();
        }

        G::step_forward(self.rope, index)
    }

    #[track_caller]
    #[inline]
    fn index_at_offset(&self, offset: usize) -> Index {
        if offset > self.len() {
            offset_out_of_bounds(offset, self.len());
        }

        if offset == self.len() {
            return self.upper;
        }

        G::index_at(self.rope, self.lower_units + offset)
    }

    #[track_caller]
    #[inline]
    fn index_before(&self, index: Index) -> Index {
        let index = self.round_down(index);

        if index <= self.lower {
            index_before_start();
        }

        G::step_backward(self.rope, index)
    }

    #[track_caller]
    #[inline]
    fn index_offset_by(&self, index: Index, distance: isize) -> Index {
        let mut index = self.round_down(index);

        if distance.unsigned_abs() <= STEPPING_DISTANCE {
            for _ in 0..distance.unsigned_abs() {
                if distance > 0 {
                    if index >= self.upper {
                        distance_out_of_bounds(index.offset, distance);
                    }
                    index = G::step_forward(self.rope, index);
                } else {
                    if index <= self.lower {
                        distance_out_of_bounds(index.offset, distance);
                    }
                    index = G::step_backward(self.rope, index);
                }
            }
            return index;
        }

        let target = self.units_before(index) as isize + distance;

        if target < 0 || target as usize > self.len() {
            distance_out_of_bounds(index.offset, distance);
        }

        self.index_at_offset(target as usize)
    }

    #[track_caller]
    #[inline]
    fn index_offset_by_limited(
        &self,
        index: Index,
        distance: isize,
        limit: Index,
    ) -> Option<Index> {
        let from = self.units_before(index) as isize;
        let limit = self.units_before(limit) as isize;
        let target = from + distance;

        let passes_limit = if distance >= 0 {
            limit >= from && target > limit
        } else {
            limit <= from && target < limit
        };

        if passes_limit {
            None
        } else {
            Some(self.index_offset_by(index, distance))
        }
    }

    #[track_caller]
    #[inline]
    fn index_rounding_up(&self, index: Index) -> Index {
        let mut rounded = self.round_down(index);

        while rounded < index {
            rounded = G::step_forward(self.rope, rounded);
        }

        rounded
    }

    #[inline]
    fn iter(&self) -> G::Iter<'a> {
        G::iter(self.rope, self.lower..self.upper)
    }

    #[inline]
    fn last(&self) -> Option<G::Element<'a>> {
        (self.lower < self.upper).then(|| {
            G::element(self.rope, G::step_backward(self.rope, self.upper))
        })
    }

    #[inline]
    fn len(&self) -> usize {
        self.upper_units - self.lower_units
    }

    #[track_caller]
    #[inline]
    fn round_down(&self, index: Index) -> Index {
        self.check(index);
        G::round_down(self.rope, index).max(self.lower)
    }

    /// Returns the number of elements between the lower bound and the
    /// index.
    #[track_caller]
    #[inline]
    fn units_before(&self, index: Index) -> usize {
        let index = self.round_down(index);

        if index == self.lower {
            0
        } else if index == self.upper {
            self.len()
        } else {
            G::offset_of(self.rope, index) - self.lower_units
        }
    }

    #[inline]
    fn debug(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let start = self.lower.offset;
        let end = self.upper.offset;

        f.write_str(G::NAME)?;
        f.write_str("(\"")?;
        debug_chunks(Chunks::new(self.rope, start..end), f)?;
        f.write_str("\")")
    }
}

/// A view of a whole [`Rope`] as a sequence of elements of granularity
/// `G`.
///
/// Views are created by [`Rope::utf8()`], [`Rope::utf16()`],
/// [`Rope::scalars()`] and [`Rope::characters()`]. Every method taking an
/// index first rounds it down to the closest boundary of the view.
///
/// # Examples
///
/// ```
/// # use bigtext::Rope;
/// #
/// let r = Rope::from("cafe\u{301}!");
///
/// let characters = r.characters();
/// assert_eq!(characters.len(), 5);
///
/// let i = characters.index_at_offset(3);
/// assert_eq!(characters.get(i), "e\u{301}");
///
/// // Every view shares the same indices.
/// assert_eq!(r.scalars().offset_of(i), 3);
/// assert_eq!(r.scalars().get(r.scalars().index_after(i)), '\u{301}');
/// ```
pub struct View<'a, G: Granularity> {
    rope: &'a Rope,
    granularity: PhantomData<G>,
}

impl<G: Granularity> Clone for View<'_, G> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: Granularity> Copy for View<'_, G> {}

impl<G: Granularity> Debug for View<'_, G> {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.span().debug(f)
    }
}

impl<'a, G: Granularity> View<'a, G> {
    #[inline]
    pub(super) fn new(rope: &'a Rope) -> Self {
        Self { rope, granularity: PhantomData }
    }

    #[inline]
    fn span(&self) -> Span<'a, G> {
        Span {
            rope: self.rope,
            lower: self.rope.start_index(),
            upper: self.rope.end_index(),
            lower_units: 0,
            upper_units: G::len(self.rope),
            granularity: PhantomData,
        }
    }

    /// Returns the rope this is a view of.
    #[inline]
    pub fn base(&self) -> &'a Rope {
        self.rope
    }

    /// Returns the signed number of elements between two indices.
    #[track_caller]
    #[inline]
    pub fn distance(&self, from: Index, to: Index) -> isize {
        self.span().distance(from, to)
    }

    #[inline]
    pub fn end_index(&self) -> Index {
        self.rope.end_index()
    }

    #[inline]
    pub fn first(&self) -> Option<G::Element<'a>> {
        self.span().first()
    }

    /// Returns the element at the index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds or at the end.
    #[track_caller]
    #[inline]
    pub fn get(&self, index: Index) -> G::Element<'a> {
        self.span().get(index)
    }

    /// Returns the index of the element following the one at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds or at the end.
    #[track_caller]
    #[inline]
    pub fn index_after(&self, index: Index) -> Index {
        self.span().index_after(index)
    }

    /// Returns the index preceded by `offset` elements.
    ///
    /// # Panics
    ///
    /// Panics if the offset is greater than [`len()`](Self::len()).
    #[track_caller]
    #[inline]
    pub fn index_at_offset(&self, offset: usize) -> Index {
        self.span().index_at_offset(offset)
    }

    /// Returns the index of the element preceding the one at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds or at the start.
    #[track_caller]
    #[inline]
    pub fn index_before(&self, index: Index) -> Index {
        self.span().index_before(index)
    }

    /// Returns the index `distance` elements away from `index`.
    ///
    /// # Panics
    ///
    /// Panics if the result would be out of bounds.
    #[track_caller]
    #[inline]
    pub fn index_offset_by(&self, index: Index, distance: isize) -> Index {
        self.span().index_offset_by(index, distance)
    }

    /// Like [`index_offset_by()`](Self::index_offset_by), but returns
    /// `None` if `limit` lies between `index` and the result.
    #[track_caller]
    #[inline]
    pub fn index_offset_by_limited(
        &self,
        index: Index,
        distance: isize,
        limit: Index,
    ) -> Option<Index> {
        self.span().index_offset_by_limited(index, distance, limit)
    }

    /// Returns the closest boundary at or before the index.
    #[track_caller]
    #[inline]
    pub fn index_rounding_down(&self, index: Index) -> Index {
        self.span().round_down(index)
    }

    /// Returns the closest boundary at or after the index.
    #[track_caller]
    #[inline]
    pub fn index_rounding_up(&self, index: Index) -> Index {
        self.span().index_rounding_up(index)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> G::Iter<'a> {
        self.span().iter()
    }

    #[inline]
    pub fn last(&self) -> Option<G::Element<'a>> {
        self.span().last()
    }

    /// Returns the number of elements in the view.
    #[inline]
    pub fn len(&self) -> usize {
        G::len(self.rope)
    }

    /// Returns the number of elements before the index.
    #[track_caller]
    #[inline]
    pub fn offset_of(&self, index: Index) -> usize {
        self.span().units_before(index)
    }

    /// Returns a sub-view over the given range, sharing the rope's
    /// storage.
    ///
    /// # Panics
    ///
    /// Panics if the start comes after the end or if the end is out of
    /// bounds.
    #[track_caller]
    #[inline]
    pub fn slice(&self, range: Range<Index>) -> SubView<G> {
        SubView::new(self.rope.clone(), range)
    }

    #[inline]
    pub fn start_index(&self) -> Index {
        self.rope.start_index()
    }
}

impl<'a, G: Granularity> IntoIterator for View<'a, G> {
    type Item = G::Element<'a>;
    type IntoIter = G::Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view of a range of a [`Rope`] as a sequence of elements of
/// granularity `G`.
///
/// A sub-view owns a clone of its rope, so it's cheap to create and can
/// outlive the rope it was sliced from. Its bounds are always boundaries of
/// its granularity: they're rounded down on creation and re-rounded after
/// every edit made through the sub-view.
///
/// # Examples
///
/// ```
/// # use bigtext::Rope;
/// #
/// let r = Rope::from("Hello, world!");
///
/// let utf8 = r.utf8();
/// let mut sub = utf8.slice(utf8.index_at_offset(7)..utf8.index_at_offset(12));
/// assert_eq!(sub.to_rope(), "world");
///
/// sub.insert(sub.start_index(), "big ");
/// assert_eq!(sub.to_rope(), "big world");
/// assert_eq!(sub.base(), "Hello, big world!");
///
/// // The rope it was sliced from is left untouched.
/// assert_eq!(r, "Hello, world!");
/// ```
pub struct SubView<G: Granularity> {
    base: Rope,
    lower: Index,
    upper: Index,
    lower_units: usize,
    upper_units: usize,
    granularity: PhantomData<G>,
}

impl<G: Granularity> Clone for SubView<G> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            lower: self.lower,
            upper: self.upper,
            lower_units: self.lower_units,
            upper_units: self.upper_units,
            granularity: PhantomData,
        }
    }
}

impl<G: Granularity> Debug for SubView<G> {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Sub")?;
        self.span().debug(f)
    }
}

impl<G: Granularity> SubView<G> {
    #[track_caller]
    #[inline]
    pub(super) fn new(base: Rope, range: Range<Index>) -> Self {
        let (start, end) = base.check_index_range(range);

        let mut sub = Self {
            base,
            lower: start,
            upper: end,
            lower_units: 0,
            upper_units: 0,
            granularity: PhantomData,
        };

        sub.round_bounds();
        sub
    }

    #[inline]
    fn round_bounds(&mut self) {
        self.lower = G::round_down(&self.base, self.lower);
        self.upper = G::round_down(&self.base, self.upper).max(self.lower);
        self.lower_units = G::offset_of(&self.base, self.lower);
        self.upper_units = G::offset_of(&self.base, self.upper);
    }

    #[inline]
    fn span(&self) -> Span<'_, G> {
        Span {
            rope: &self.base,
            lower: self.lower,
            upper: self.upper,
            lower_units: self.lower_units,
            upper_units: self.upper_units,
            granularity: PhantomData,
        }
    }

    /// Returns the rope this is a view of.
    #[inline]
    pub fn base(&self) -> &Rope {
        &self.base
    }

    /// Returns the range of the base rope covered by this sub-view.
    #[inline]
    pub fn bounds(&self) -> Range<Index> {
        self.lower..self.upper
    }

    /// Returns the signed number of elements between two indices.
    #[track_caller]
    #[inline]
    pub fn distance(&self, from: Index, to: Index) -> isize {
        self.span().distance(from, to)
    }

    #[inline]
    pub fn end_index(&self) -> Index {
        self.upper
    }

    #[inline]
    pub fn first(&self) -> Option<G::Element<'_>> {
        self.span().first()
    }

    /// Returns the element at the index.
    ///
    /// # Panics
    ///
    /// Panics if the index is outside the bounds or at the end.
    #[track_caller]
    #[inline]
    pub fn get(&self, index: Index) -> G::Element<'_> {
        self.span().get(index)
    }

    #[track_caller]
    #[inline]
    pub fn index_after(&self, index: Index) -> Index {
        self.span().index_after(index)
    }

    #[track_caller]
    #[inline]
    pub fn index_at_offset(&self, offset: usize) -> Index {
        self.span().index_at_offset(offset)
    }

    #[track_caller]
    #[inline]
    pub fn index_before(&self, index: Index) -> Index {
        self.span().index_before(index)
    }

    #[track_caller]
    #[inline]
    pub fn index_offset_by(&self, index: Index, distance: isize) -> Index {
        self.span().index_offset_by(index, distance)
    }

    #[track_caller]
    #[inline]
    pub fn index_offset_by_limited(
        &self,
        index: Index,
        distance: isize,
        limit: Index,
    ) -> Option<Index> {
        self.span().index_offset_by_limited(index, distance, limit)
    }

    #[track_caller]
    #[inline]
    pub fn index_rounding_down(&self, index: Index) -> Index {
        self.span().round_down(index)
    }

    #[track_caller]
    #[inline]
    pub fn index_rounding_up(&self, index: Index) -> Index {
        self.span().index_rounding_up(index)
    }

    /// Inserts `text` at the index, which is first rounded down to a scalar
    /// boundary.
    ///
    /// # Panics
    ///
    /// Panics if the index is outside the bounds.
    #[track_caller]
    #[inline]
    pub fn insert<T>(&mut self, index: Index, text: T)
    where
        T: AsRef<str>,
    {
        self.replace_subrange(index..index, text);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower == self.upper
    }

    #[inline]
    pub fn iter(&self) -> G::Iter<'_> {
        self.span().iter()
    }

    #[inline]
    pub fn last(&self) -> Option<G::Element<'_>> {
        self.span().last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.upper_units - self.lower_units
    }

    /// Returns the number of elements between the start of the sub-view
    /// and the index.
    #[track_caller]
    #[inline]
    pub fn offset_of(&self, index: Index) -> usize {
        self.span().units_before(index)
    }

    /// Appends `text` at the end of the sub-view.
    #[inline]
    pub fn push_str<T>(&mut self, text: T)
    where
        T: AsRef<str>,
    {
        self.insert(self.upper, text);
    }

    /// Removes the text between the two indices.
    ///
    /// # Panics
    ///
    /// Panics if the start comes after the end or if either of them is
    /// outside the bounds.
    #[track_caller]
    #[inline]
    pub fn remove_subrange(&mut self, range: Range<Index>) {
        self.replace_subrange(range, "");
    }

    /// Replaces the text between the two indices, which are first rounded
    /// down to scalar boundaries. The bounds of the sub-view are then
    /// rounded down again, which can make them grow or shrink when the
    /// edit merges or splits characters at its edges.
    ///
    /// If rounding moves the start of the edit before the lower bound, as
    /// with a lower bound in the middle of a scalar, the lower bound moves
    /// back with it so that the new text is part of the sub-view.
    ///
    /// # Panics
    ///
    /// Panics if the start comes after the end or if either of them is
    /// outside the bounds.
    #[track_caller]
    #[inline]
    pub fn replace_subrange<T>(&mut self, range: Range<Index>, text: T)
    where
        T: AsRef<str>,
    {
        let span = self.span();
        span.check(range.start);
        span.check(range.end);

        let (start, end) = self.base.check_index_range(range);

        let start = self.base.floor_char_boundary(start).offset;
        let end = self.base.floor_char_boundary(end).offset;

        let lower = if Index::new(start) < self.lower {
            Index::new(start)
        } else {
            Index::with_trailing(self.lower.offset, self.lower.trailing)
        };

        let old_len = self.base.byte_len();

        self.base.replace(start..end, text);

        let upper_offset = self.upper.offset + self.base.byte_len() - old_len;

        self.lower = lower;
        self.upper = Index::with_trailing(upper_offset, self.upper.trailing);

        self.round_bounds();
    }

    /// Returns a sub-view of this sub-view.
    ///
    /// # Panics
    ///
    /// Panics if the start comes after the end or if either of them is
    /// outside the bounds.
    #[track_caller]
    #[inline]
    pub fn slice(&self, range: Range<Index>) -> SubView<G> {
        let span = self.span();
        span.check(range.start);
        span.check(range.end);
        SubView::new(self.base.clone(), range)
    }

    #[inline]
    pub fn start_index(&self) -> Index {
        self.lower
    }

    /// Returns a new rope containing the text of the sub-view, sharing
    /// storage with the base rope.
    ///
    /// Bounds that don't lie on a scalar boundary are rounded down to one.
    #[inline]
    pub fn to_rope(&self) -> Rope {
        let start = self.base.floor_char_boundary(self.lower).offset;
        let end = self.base.floor_char_boundary(self.upper).offset;
        self.base.extract(start..end)
    }
}

impl<'a, G: Granularity> IntoIterator for &'a SubView<G> {
    type Item = G::Element<'a>;
    type IntoIter = G::Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<G: Granularity> SubView<G> {
    /// Returns whether both sub-views cover the same range of the same
    /// rope.
    #[inline]
    fn is_identical(&self, other: &Self) -> bool {
        self.base.is_identical(&other.base) && self.bounds() == other.bounds()
    }
}

impl<G: Granularity> PartialEq for SubView<G> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        if self.is_identical(other) {
            return true;
        }

        G::eq_ranges(&self.base, self.bounds(), &other.base, other.bounds())
    }
}

impl<G: Granularity> Eq for SubView<G> {}

impl<G: Granularity> PartialOrd for SubView<G> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<G: Granularity> Ord for SubView<G> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        if self.is_identical(other) {
            return Ordering::Equal;
        }

        G::cmp_ranges(&self.base, self.bounds(), &other.base, other.bounds())
    }
}

impl<G: Granularity> Hash for SubView<G> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        G::hash_range(&self.base, self.bounds(), state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16_trailing_indices() {
        let r = Rope::from("a🗻b");
        let utf16 = r.utf16();

        assert_eq!(utf16.len(), 4);

        let high = utf16.index_at_offset(1);
        let low = utf16.index_after(high);

        assert!(!high.is_trailing_surrogate());
        assert!(low.is_trailing_surrogate());
        assert_eq!(low.utf8_offset(), 1);
        assert_eq!(utf16.offset_of(low), 2);
        assert_eq!(utf16.index_at_offset(2), low);

        assert_eq!(utf16.get(high), 0xd83d);
        assert_eq!(utf16.get(low), 0xddfb);

        assert_eq!(utf16.index_before(low), high);
        assert_eq!(utf16.index_after(low).utf8_offset(), 5);

        // Other views ignore the surrogate half.
        assert_eq!(r.scalars().index_rounding_down(low), high);
        assert_eq!(r.scalars().index_rounding_up(low).utf8_offset(), 5);
    }

    #[test]
    fn character_rounding_across_chunks() {
        let text = format!("x{}y", "\u{301}".repeat(30));
        let r = Rope::from(text.as_str());
        let characters = r.characters();

        let middle = r.utf8().index_at_offset(31);
        assert_eq!(characters.index_rounding_down(middle), r.start_index());
        assert_eq!(
            characters.index_rounding_up(middle).utf8_offset(),
            text.len() - 1
        );

        let y = characters.index_at_offset(1);
        assert_eq!(characters.get(y), "y");
        assert_eq!(characters.index_before(y), r.start_index());
        assert_eq!(characters.get(r.start_index()), &text[..text.len() - 1]);
    }

    #[test]
    fn offset_by_and_distance() {
        let text = "héllo wörld 🌍 ".repeat(10);
        let r = Rope::from(text.as_str());

        let scalars = r.scalars();
        let start = scalars.start_index();

        for n in [0, 1, 3, 5, 17, 100, scalars.len() as isize] {
            let i = scalars.index_offset_by(start, n);
            assert_eq!(scalars.offset_of(i), n as usize);
            assert_eq!(scalars.distance(start, i), n);
            assert_eq!(scalars.index_offset_by(i, -n), start);
        }

        let ten = scalars.index_at_offset(10);
        assert_eq!(scalars.index_offset_by_limited(start, 20, ten), None);
        assert_eq!(
            scalars.index_offset_by_limited(start, 10, ten),
            Some(ten)
        );
        assert_eq!(
            scalars.index_offset_by_limited(ten, -5, start),
            Some(scalars.index_at_offset(5))
        );
    }

    #[test]
    #[should_panic]
    fn index_after_end() {
        let r = Rope::from("ab");
        let scalars = r.scalars();
        scalars.index_after(scalars.end_index());
    }

    #[test]
    fn sub_view_bounds_are_rounded() {
        let r = Rope::from("ae\u{301}bc");
        let characters = r.characters();

        // Byte 2 is inside the accented `e`.
        let sub = characters
            .slice(r.utf8().index_at_offset(2)..r.utf8().index_at_offset(5));

        assert_eq!(sub.start_index().utf8_offset(), 1);
        assert_eq!(sub.end_index().utf8_offset(), 5);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.iter().collect::<Vec<_>>(), ["e\u{301}", "b"]);
    }

    #[test]
    fn sub_view_edits_re_round_bounds() {
        let r = Rope::from("abc def");
        let characters = r.characters();
        let d = characters.index_at_offset(4);

        let mut sub = characters.slice(d..characters.end_index());
        assert_eq!(sub.to_rope(), "def");

        // A combining mark at the start of the sub-view attaches to the
        // space before it, which pulls the lower bound back.
        sub.insert(sub.start_index(), "\u{301}");
        assert_eq!(sub.base(), "abc \u{301}def");
        assert_eq!(sub.start_index().utf8_offset(), 3);
        assert_eq!(sub.to_rope(), " \u{301}def");

        sub.remove_subrange(sub.index_at_offset(1)..sub.index_at_offset(3));
        assert_eq!(sub.to_rope(), " \u{301}f");

        sub.push_str("!");
        assert_eq!(sub.to_rope(), " \u{301}f!");
        assert_eq!(sub.base(), "abc \u{301}f!");
    }

    #[test]
    fn sub_view_equality() {
        let a = Rope::from("xx café");
        let b = Rope::from("cafe\u{301} yy");

        let sa = a.characters().slice(
            a.characters().index_at_offset(3)..a.end_index(),
        );
        let sb = b.characters().slice(
            b.start_index()..b.characters().index_at_offset(4),
        );

        assert_eq!(sa, sb);
        assert_eq!(sa.len(), sb.len());

        let ua = a.utf8().slice(a.utf8().index_at_offset(3)..a.end_index());
        let ub = b.utf8().slice(b.start_index()..b.utf8().index_at_offset(6));
        assert_ne!(ua, ub);
    }
}
