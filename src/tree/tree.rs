use core::ops::Range;
use std::sync::Arc;

use super::{Inode, Leaf, LeafPath, Leaves, Metric, Node, TreeBuilder};

/// A persistent B-tree whose nodes are reference counted and shared between
/// clones.
///
/// Every edit goes through [`replace_leaves`](Self::replace_leaves), which
/// only re-creates the nodes on the paths to the replaced leaves and reuses
/// all the others.
pub struct Tree<const FANOUT: usize, L: Leaf> {
    pub(super) root: Arc<Node<FANOUT, L>>,
}

impl<const FANOUT: usize, L: Leaf> Clone for Tree<FANOUT, L> {
    #[inline]
    fn clone(&self) -> Self {
        Self { root: Arc::clone(&self.root) }
    }
}

impl<const FANOUT: usize, L: Leaf> core::fmt::Debug for Tree<FANOUT, L> {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            f.debug_struct("Tree").field("root", &self.root).finish()
        } else {
            write!(f, "{:#?}", self.root)
        }
    }
}

impl<const FANOUT: usize, L: Leaf + Default> Default for Tree<FANOUT, L> {
    #[inline]
    fn default() -> Self {
        Self { root: Arc::new(Node::default()) }
    }
}

/// A leaf together with everything needed to locate it in its tree.
#[derive(Debug)]
pub struct LeafPosition<'a, L: Leaf> {
    pub leaf: &'a L,

    /// The sum of the summaries of all the leaves before this one.
    pub before: L::Summary,

    /// The index of the leaf.
    pub index: usize,

    /// The path from the root to the leaf, or `None` if the tree is too
    /// deep for it to fit in a [`LeafPath`].
    pub path: Option<LeafPath>,
}

impl<L: Leaf> Clone for LeafPosition<'_, L> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: Leaf> Copy for LeafPosition<'_, L> {}

impl<const FANOUT: usize, L: Leaf> Tree<FANOUT, L> {
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        match &*self.root {
            Node::Internal(inode) => inode.assert_invariants(true),
            Node::Leaf(leaf) => leaf.assert_invariants(),
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Creates a new tree from its leaves.
    #[inline]
    pub fn from_leaves<I>(leaves: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Default,
    {
        let mut builder = TreeBuilder::new();

        for leaf in leaves {
            builder.push_leaf(leaf);
        }

        builder.build()
    }

    /// Returns the leaf with the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn leaf(&self, leaf_idx: usize) -> &L {
        assert!(
            leaf_idx < self.leaf_count(),
            "leaf index out of bounds: the index is {} but the tree only has \
             {} leaves",
            leaf_idx,
            self.leaf_count()
        );

        let mut idx = leaf_idx;
        let mut node = &*self.root;

        'outer: loop {
            match node {
                Node::Internal(inode) => {
                    for child in inode.children() {
                        let count = child.leaf_count();
                        if idx < count {
                            node = child;
                            continue 'outer;
                        }
                        idx -= count;
                    }
                    unreachable!("the leaf index was checked above");
                },

                Node::Leaf(leaf) => return leaf.value(),
            }
        }
    }

    /// Returns the leaf containing the given measure, i.e. the first leaf
    /// such that the measure of all the leaves up to and including it is
    /// greater than `measure`. If no such leaf exists the last leaf is
    /// returned.
    #[inline]
    pub fn leaf_at_measure<M>(&self, measure: M) -> LeafPosition<'_, L>
    where
        M: Metric<L::Summary>,
    {
        let mut before = L::Summary::default();
        let mut measured = M::zero();
        let mut index = 0;
        let mut path = Some(LeafPath::default());
        let mut node = &*self.root;

        loop {
            match node {
                Node::Internal(inode) => {
                    let last_idx = inode.len() - 1;
                    let mut child_idx = last_idx;

                    for (idx, child) in inode.children().iter().enumerate() {
                        let this = M::measure(child.summary());

                        if idx == last_idx || measure < measured + this {
                            child_idx = idx;
                            break;
                        }

                        measured += this;
                        before += *child.summary();
                        index += child.leaf_count();
                    }

                    path =
                        path.and_then(|mut p| p.push(child_idx).then_some(p));
                    node = &inode.children()[child_idx];
                },

                Node::Leaf(leaf) => {
                    return LeafPosition {
                        leaf: leaf.value(),
                        before,
                        index,
                        path,
                    };
                },
            }
        }
    }

    /// Returns the leaf at the end of the given path.
    ///
    /// # Panics
    ///
    /// Panics if the path doesn't lead to a leaf of this tree.
    #[inline]
    pub fn leaf_at_path(&self, path: LeafPath) -> &L {
        let mut node = &*self.root;

        for level in 0..path.len() {
            node = &node.children()[path.get(level)];
        }

        node.as_leaf().value()
    }

    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    #[inline]
    pub fn leaves(&self) -> Leaves<'_, FANOUT, L> {
        self.leaves_from(0)
    }

    /// Returns an iterator over the leaves starting from the one with the
    /// given index, which can be equal to the number of leaves.
    #[inline]
    pub fn leaves_from(&self, leaf_idx: usize) -> Leaves<'_, FANOUT, L> {
        Leaves::new(&self.root, leaf_idx)
    }

    #[inline]
    pub fn measure<M: Metric<L::Summary>>(&self) -> M {
        M::measure(self.summary())
    }

    /// Returns the leaf after the one at the end of `path`, together with
    /// its own path.
    #[inline]
    pub fn next_leaf(&self, path: LeafPath) -> Option<(LeafPath, &L)> {
        // The deepest inode along the path with a child after the one the
        // path goes through.
        let mut pivot = None;
        let mut node = &*self.root;

        for level in 0..path.len() {
            let inode = node.as_internal();
            let child_idx = path.get(level);

            if child_idx + 1 < inode.len() {
                pivot = Some((level, inode));
            }

            node = &*inode.children()[child_idx];
        }

        let (level, inode) = pivot?;
        let child_idx = path.get(level) + 1;

        let mut next = path;
        next.truncate(level);
        let _ = next.push(child_idx);

        let mut node = &*inode.children()[child_idx];

        while let Node::Internal(inode) = node {
            let _ = next.push(0);
            node = &*inode.children()[0];
        }

        Some((next, node.as_leaf().value()))
    }

    /// Returns the leaf before the one at the end of `path`, together with
    /// its own path.
    #[inline]
    pub fn prev_leaf(&self, path: LeafPath) -> Option<(LeafPath, &L)> {
        let mut pivot = None;
        let mut node = &*self.root;

        for level in 0..path.len() {
            let inode = node.as_internal();
            let child_idx = path.get(level);

            if child_idx > 0 {
                pivot = Some((level, inode));
            }

            node = &*inode.children()[child_idx];
        }

        let (level, inode) = pivot?;
        let child_idx = path.get(level) - 1;

        let mut prev = path;
        prev.truncate(level);
        let _ = prev.push(child_idx);

        let mut node = &*inode.children()[child_idx];

        while let Node::Internal(inode) = node {
            let last_idx = inode.len() - 1;
            let _ = prev.push(last_idx);
            node = &*inode.children()[last_idx];
        }

        Some((prev, node.as_leaf().value()))
    }

    /// Returns whether both trees share the same root.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Replaces the leaves in `leaf_range` with the ones yielded by `leaves`,
    /// rebalancing the tree as needed.
    ///
    /// Every subtree that doesn't contain any of the replaced leaves is
    /// shared with the old tree.
    #[inline]
    pub fn replace_leaves<I>(&mut self, leaf_range: Range<usize>, leaves: I)
    where
        I: IntoIterator<Item = L>,
        L: Default,
    {
        debug_assert!(leaf_range.start <= leaf_range.end);
        debug_assert!(leaf_range.end <= self.leaf_count());

        let mut builder = TreeBuilder::new();

        builder.push_leaves_of(self, 0..leaf_range.start);

        for leaf in leaves {
            builder.push_leaf(leaf);
        }

        builder.push_leaves_of(self, leaf_range.end..self.leaf_count());

        *self = builder.build();
    }

    #[inline]
    pub fn summary(&self) -> &L::Summary {
        self.root.summary()
    }
}
