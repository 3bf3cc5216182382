use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

use crate::tree::LeafPath;

/// A position in a [`Rope`](crate::Rope), shared by all of its views.
///
/// An index is a UTF-8 offset, optionally pointing to the low surrogate of
/// the code point starting there when it's used with the UTF-16 view.
/// Indices can also carry a hint of where their chunk is in the rope, which
/// makes repeatedly navigating from the same index cheap. Hints are only
/// trusted by the rope they were produced for, and only until that rope is
/// mutated.
///
/// Equality, ordering and hashing only look at the position, never at the
/// hint.
#[derive(Copy, Clone)]
pub struct Index {
    pub(super) offset: usize,
    pub(super) trailing: bool,
    pub(super) hint: Option<Hint>,
}

/// Where the chunk containing an index was found.
#[derive(Copy, Clone, Debug)]
pub(super) struct Hint {
    /// The generation of the rope the hint was computed on.
    pub(super) stamp: u64,
    pub(super) path: LeafPath,
    pub(super) chunk_start: usize,
    pub(super) chunk_len: usize,
}

impl Hint {
    /// Returns whether the hint's chunk contains the byte at `offset`.
    #[inline]
    pub(super) fn contains(&self, offset: usize) -> bool {
        self.chunk_start <= offset && offset < self.chunk_start + self.chunk_len
    }
}

impl core::fmt::Debug for Index {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.trailing {
            write!(f, "Index({}+1)", self.offset)
        } else {
            write!(f, "Index({})", self.offset)
        }
    }
}

impl PartialEq for Index {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.trailing == other.trailing
    }
}

impl Eq for Index {}

impl PartialOrd for Index {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Index {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        (self.offset, self.trailing).cmp(&(other.offset, other.trailing))
    }
}

impl Hash for Index {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.offset.hash(state);
        self.trailing.hash(state);
    }
}

impl Index {
    /// Returns whether the index carries a hint of where its chunk is.
    ///
    /// The hint may be stale, in which case it's simply ignored.
    #[inline]
    pub fn has_hint(&self) -> bool {
        self.hint.is_some()
    }

    /// Returns whether the index points to the second UTF-16 code unit of a
    /// code point outside of the Basic Multilingual Plane.
    #[inline]
    pub fn is_trailing_surrogate(&self) -> bool {
        self.trailing
    }

    /// Moves the index to another offset, keeping its hint if the new
    /// offset is still in the same chunk.
    #[inline]
    pub(super) fn moved(self, offset: usize, trailing: bool) -> Self {
        let hint = self.hint.filter(|hint| hint.contains(offset));
        Self { offset, trailing, hint }
    }

    #[inline]
    pub(super) fn new(offset: usize) -> Self {
        Self { offset, trailing: false, hint: None }
    }

    /// Returns the UTF-8 offset of the index.
    #[inline]
    pub fn utf8_offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub(super) fn with_trailing(offset: usize, trailing: bool) -> Self {
        Self { offset, trailing, hint: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_ignores_hints() {
        let plain = Index::new(4);

        let hinted = Index {
            hint: Some(Hint {
                stamp: 1,
                path: LeafPath::default(),
                chunk_start: 0,
                chunk_len: 8,
            }),
            ..plain
        };

        assert_eq!(plain, hinted);
        assert!(Index::new(3) < hinted);
        assert!(hinted < Index::with_trailing(4, true));
        assert!(Index::with_trailing(4, true) < Index::new(5));
    }

    #[test]
    fn moving_drops_hint_outside_chunk() {
        let index = Index {
            offset: 2,
            trailing: false,
            hint: Some(Hint {
                stamp: 7,
                path: LeafPath::default(),
                chunk_start: 0,
                chunk_len: 4,
            }),
        };

        assert!(index.moved(3, false).has_hint());
        assert!(!index.moved(4, false).has_hint());
    }

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", Index::new(3)), "Index(3)");
        assert_eq!(
            format!("{:?}", Index::with_trailing(3, true)),
            "Index(3+1)"
        );
    }
}
