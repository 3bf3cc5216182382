/// The sequence of child positions leading from the root of a tree down to
/// one of its leaves, packed 4 bits per level.
///
/// Paths only make sense for the tree they were computed on, so callers
/// are expected to pair them with some way of telling whether that tree has
/// changed since.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct LeafPath {
    bits: u128,
    len: u8,
}

const BITS_PER_LEVEL: usize = 4;

const MAX_LEVELS: usize = u128::BITS as usize / BITS_PER_LEVEL;

const LEVEL_MASK: u128 = (1 << BITS_PER_LEVEL) - 1;

impl core::fmt::Debug for LeafPath {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_list().entries((0..self.len()).map(|l| self.get(l))).finish()
    }
}

impl LeafPath {
    /// Returns the position of the child taken at the given level, where
    /// level `0` is the root.
    #[inline]
    pub fn get(&self, level: usize) -> usize {
        debug_assert!(level < self.len());
        ((self.bits >> (level * BITS_PER_LEVEL)) & LEVEL_MASK) as usize
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends a level to the path, returning `false` if the path can't
    /// grow any deeper.
    #[inline]
    #[must_use]
    pub fn push(&mut self, child: usize) -> bool {
        debug_assert!((child as u128) <= LEVEL_MASK);

        if self.len() == MAX_LEVELS {
            return false;
        }

        self.bits |= (child as u128 & LEVEL_MASK)
            << (self.len() * BITS_PER_LEVEL);
        self.len += 1;
        true
    }

    /// Keeps the first `len` levels of the path.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len() {
            return;
        }

        let keep = len * BITS_PER_LEVEL;
        self.bits &= if keep == 0 { 0 } else { u128::MAX >> (128 - keep) };
        self.len = len as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_get_truncate() {
        let mut path = LeafPath::default();
        assert!(path.is_empty());

        for child in [3, 0, 15, 7] {
            assert!(path.push(child));
        }

        assert_eq!(path.len(), 4);
        assert_eq!(path.get(0), 3);
        assert_eq!(path.get(2), 15);
        assert_eq!(path.get(3), 7);

        path.truncate(2);
        assert_eq!(path.len(), 2);

        assert!(path.push(9));
        assert_eq!(path.get(1), 0);
        assert_eq!(path.get(2), 9);

        assert_eq!(format!("{path:?}"), "[3, 0, 9]");
    }

    #[test]
    fn deepest_path() {
        let mut path = LeafPath::default();

        for _ in 0..MAX_LEVELS {
            assert!(path.push(15));
        }

        assert!(!path.push(1));
        assert_eq!(path.get(MAX_LEVELS - 1), 15);

        path.truncate(0);
        assert_eq!(path, LeafPath::default());
    }
}
