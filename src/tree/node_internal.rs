use std::sync::Arc;

use super::{Leaf, Node};

#[derive(Clone)]
pub(super) struct Inode<const N: usize, L: Leaf> {
    children: Vec<Arc<Node<N, L>>>,
    summary: L::Summary,
    depth: usize,
    leaf_count: usize,
}

impl<const N: usize, L: Leaf> core::fmt::Debug for Inode<N, L> {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Inode")
            .field("children", &self.children)
            .field("summary", &self.summary)
            .field("depth", &self.depth)
            .field("leaf_count", &self.leaf_count)
            .finish()
    }
}

impl<const N: usize, L: Leaf> Inode<N, L> {
    /// Checks the invariants of this inode and of every node in its
    /// subtree. The root is the only inode allowed to have as few as two
    /// children.
    pub(super) fn assert_invariants(&self, is_root: bool) {
        let min = if is_root { 2 } else { Self::min_children() };

        assert!(
            self.len() >= min,
            "An internal node of depth {} was supposed to contain at least \
             {} children but actually contains {}",
            self.depth(),
            min,
            self.len()
        );

        assert!(
            self.len() <= Self::max_children(),
            "An internal node of depth {} was supposed to contain at most {} \
             children but actually contains {}",
            self.depth(),
            Self::max_children(),
            self.len()
        );

        let actual_leaves =
            self.children().iter().map(|c| c.leaf_count()).sum::<usize>();

        assert_eq!(
            self.leaf_count,
            actual_leaves,
            "An internal node of depth {} thought it contained {} leaves in \
             its subtree, but actually contains {}",
            self.depth(),
            self.leaf_count,
            actual_leaves
        );

        let mut summary = L::Summary::default();

        for child in self.children() {
            assert_eq!(
                self.depth(),
                child.depth() + 1,
                "An internal node at depth {} contains a node of depth {}",
                self.depth(),
                child.depth()
            );

            summary += *child.summary();

            child.assert_invariants();
        }

        assert_eq!(summary, self.summary);
    }

    #[inline]
    pub(super) fn children(&self) -> &[Arc<Node<N, L>>] {
        &self.children
    }

    #[inline]
    pub(super) fn depth(&self) -> usize {
        self.depth
    }

    /// Creates a new inode from its children.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty or if its nodes are not all at the
    /// same depth.
    #[inline]
    pub(super) fn from_children(children: Vec<Arc<Node<N, L>>>) -> Self {
        assert!(!children.is_empty(), "an inode needs at least one child");

        let depth = children[0].depth() + 1;

        debug_assert!(children.iter().all(|c| c.depth() + 1 == depth));

        let mut summary = L::Summary::default();
        let mut leaf_count = 0;

        for child in &children {
            summary += *child.summary();
            leaf_count += child.leaf_count();
        }

        Self { children, summary, depth, leaf_count }
    }

    #[inline]
    pub(super) fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    #[inline]
    pub(super) fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub(super) const fn max_children() -> usize {
        N
    }

    #[inline]
    pub(super) const fn min_children() -> usize {
        N / 2
    }

    #[inline]
    pub(super) fn summary(&self) -> &L::Summary {
        &self.summary
    }
}
