//! Utility functions on strings and chunks shared by the rest of the
//! `rope` module.

use core::fmt::Write;
use core::ops::{Bound, RangeBounds};

use super::iterators::Chunks;

/// Returns the closest char boundary in `s` which is less than or equal to
/// `offset`. Offsets past the end of the string are clipped to its length.
#[inline]
pub(super) fn floor_char_boundary(s: &str, mut offset: usize) -> usize {
    if offset >= s.len() {
        return s.len();
    }

    while !s.is_char_boundary(offset) {
        offset -= 1;
    }

    offset
}

/// Converts a UTF-16 offset within `s` into a byte offset, together with
/// whether the offset points to the low surrogate of a code point outside
/// of the Basic Multilingual Plane.
#[inline]
pub(super) fn utf16_to_byte(s: &str, utf16_offset: usize) -> (usize, bool) {
    let byte_offset = str_indices::utf16::to_byte_idx(s, utf16_offset);

    let reached = str_indices::utf16::from_byte_idx(s, byte_offset);

    match reached.cmp(&utf16_offset) {
        core::cmp::Ordering::Equal => (byte_offset, false),
        core::cmp::Ordering::Less => (byte_offset, true),
        core::cmp::Ordering::Greater => (byte_offset - 4, true),
    }
}

#[inline]
pub(super) fn range_bounds_to_start_end<B>(
    range: B,
    lo: usize,
    hi: usize,
) -> (usize, usize)
where
    B: RangeBounds<usize>,
{
    let start = match range.start_bound() {
        Bound::Included(&n) => n,
        Bound::Excluded(&n) => n + 1,
        Bound::Unbounded => lo,
    };

    let end = match range.end_bound() {
        Bound::Included(&n) => n + 1,
        Bound::Excluded(&n) => n,
        Bound::Unbounded => hi,
    };

    (start, end)
}

/// Checks equality between the chunks yielded by two [`Chunks`] iterators.
///
/// It's assumed that if we get this far both iterators yield the same
/// number of bytes.
#[inline]
pub(super) fn chunks_eq_chunks(
    mut lhs: Chunks<'_>,
    mut rhs: Chunks<'_>,
) -> bool {
    let mut left_chunk = lhs.next().unwrap_or("").as_bytes();
    let mut right_chunk = rhs.next().unwrap_or("").as_bytes();

    loop {
        if left_chunk.len() < right_chunk.len() {
            if left_chunk != &right_chunk[..left_chunk.len()] {
                return false;
            }
            right_chunk = &right_chunk[left_chunk.len()..];
            left_chunk = &[];
        } else if &left_chunk[..right_chunk.len()] != right_chunk {
            return false;
        } else {
            left_chunk = &left_chunk[right_chunk.len()..];
            right_chunk = &[];
        }

        if left_chunk.is_empty() {
            match lhs.next() {
                Some(chunk) => left_chunk = chunk.as_bytes(),
                None => return true,
            }
        }

        if right_chunk.is_empty() {
            match rhs.next() {
                Some(chunk) => right_chunk = chunk.as_bytes(),
                None => return true,
            }
        }
    }
}

/// Writes the debug output of every chunk to the formatter, without
/// enclosing quotes.
#[inline]
pub(super) fn debug_chunks(
    chunks: Chunks<'_>,
    f: &mut core::fmt::Formatter<'_>,
) -> core::fmt::Result {
    for chunk in chunks {
        let mut from = 0;
        for (idx, char) in chunk.char_indices() {
            let esc = char.escape_debug();
            if esc.len() != 1 {
                f.write_str(&chunk[from..idx])?;
                for c in esc {
                    f.write_char(c)?;
                }
                from = idx + char.len_utf8();
            }
        }
        f.write_str(&chunk[from..])?;
    }

    Ok(())
}

pub(super) use panic_messages::*;

mod panic_messages {
    #[track_caller]
    #[inline]
    pub(crate) fn byte_index_out_of_bounds(
        byte_index: usize,
        byte_len: usize,
    ) -> ! {
        debug_assert!(byte_index >= byte_len);

        panic!(
            "Byte index out of bounds: the index is {byte_index} but the \
             length is {byte_len}"
        );
    }

    #[track_caller]
    #[inline]
    pub(crate) fn byte_offset_out_of_bounds(
        byte_offset: usize,
        byte_len: usize,
    ) -> ! {
        debug_assert!(byte_offset > byte_len);

        panic!(
            "Byte offset out of bounds: the offset is {byte_offset} but the \
             length is {byte_len}"
        );
    }

    #[track_caller]
    #[inline]
    pub(crate) fn byte_offset_not_char_boundary(
        byte_offset: usize,
    ) -> ! {
        panic!(
            "Byte offset is not a char boundary: the offset is \
             {byte_offset}"
        );
    }

    #[track_caller]
    #[inline]
    pub(crate) fn byte_start_after_end(
        byte_start: usize,
        byte_end: usize,
    ) -> ! {
        debug_assert!(byte_start > byte_end);

        panic!(
            "Byte start after end: the start is {byte_start} but the end is \
             {byte_end}"
        );
    }

    #[track_caller]
    #[inline]
    pub(crate) fn index_out_of_bounds(
        index_offset: usize,
        byte_len: usize,
    ) -> ! {
        debug_assert!(index_offset > byte_len);

        panic!(
            "Index out of bounds: the index is at byte {index_offset} but \
             the length is {byte_len}"
        );
    }

    #[track_caller]
    #[inline]
    pub(crate) fn index_start_after_end(
        start_offset: usize,
        end_offset: usize,
    ) -> ! {
        panic!(
            "Index range start after end: the start is at byte \
             {start_offset} but the end is at byte {end_offset}"
        );
    }

    #[track_caller]
    #[inline]
    pub(crate) fn index_after_end() -> ! {
        panic!("Cannot advance an index past the end");
    }

    #[track_caller]
    #[inline]
    pub(crate) fn index_at_end() -> ! {
        panic!("There is no element at the end index");
    }

    #[track_caller]
    #[inline]
    pub(crate) fn index_before_start() -> ! {
        panic!("Cannot move an index before the start");
    }

    #[track_caller]
    #[inline]
    pub(crate) fn index_outside_bounds(
        index_offset: usize,
        lower_offset: usize,
        upper_offset: usize,
    ) -> ! {
        panic!(
            "Index outside of bounds: the index is at byte {index_offset} \
             but the bounds are {lower_offset}..{upper_offset}"
        );
    }

    #[track_caller]
    #[inline]
    pub(crate) fn offset_out_of_bounds(offset: usize, len: usize) -> ! {
        panic!(
            "Offset out of bounds: the offset is {offset} but the length \
             is {len}"
        );
    }

    #[track_caller]
    #[inline]
    pub(crate) fn distance_out_of_bounds(start: usize, distance: isize) -> ! {
        panic!(
            "Offsetting by {distance} from {start} would move out of bounds"
        );
    }
}
