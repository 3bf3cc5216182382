use super::{Inode, Leaf, Node};

/// An iterator over the leaves of a [`Tree`](super::Tree), from left to
/// right.
///
/// This iterator is created via the [`leaves`](super::Tree::leaves) and
/// [`leaves_from`](super::Tree::leaves_from) methods on `Tree`.
pub struct Leaves<'a, const FANOUT: usize, L: Leaf> {
    /// The internal nodes on the path to the next leaf, each with the index
    /// of the child we're currently visiting.
    path: Vec<(&'a Inode<FANOUT, L>, usize)>,

    /// The next leaf to yield.
    next: Option<&'a L>,

    /// The number of leaves left to yield, including `next`.
    remaining: usize,
}

impl<const FANOUT: usize, L: Leaf> Clone for Leaves<'_, FANOUT, L> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            next: self.next,
            remaining: self.remaining,
        }
    }
}

impl<'a, const FANOUT: usize, L: Leaf> Leaves<'a, FANOUT, L> {
    /// Starts yielding at the leaf with the given index, which can be equal
    /// to the number of leaves in the tree for an empty iterator.
    pub(super) fn new(root: &'a Node<FANOUT, L>, leaf_idx: usize) -> Self {
        let leaf_count = root.leaf_count();

        debug_assert!(leaf_idx <= leaf_count);

        if leaf_idx >= leaf_count {
            return Self { path: Vec::new(), next: None, remaining: 0 };
        }

        let mut path = Vec::with_capacity(root.depth());
        let mut idx = leaf_idx;
        let mut node = root;

        'outer: loop {
            match node {
                Node::Internal(inode) => {
                    let children = inode.children().iter();

                    for (child_idx, child) in children.enumerate() {
                        let count = child.leaf_count();
                        if idx < count {
                            path.push((inode, child_idx));
                            node = child;
                            continue 'outer;
                        }
                        idx -= count;
                    }
                    unreachable!("the leaf index was checked above");
                },

                Node::Leaf(leaf) => {
                    return Self {
                        path,
                        next: Some(leaf.value()),
                        remaining: leaf_count - leaf_idx,
                    };
                },
            }
        }
    }

    fn advance(&mut self) {
        while let Some((inode, child_idx)) = self.path.pop() {
            if child_idx + 1 < inode.len() {
                self.path.push((inode, child_idx + 1));

                let mut node = &*inode.children()[child_idx + 1];

                while let Node::Internal(inode) = node {
                    self.path.push((inode, 0));
                    node = &*inode.children()[0];
                }

                self.next = Some(node.as_leaf().value());
                return;
            }
        }

        self.next = None;
    }
}

impl<'a, const FANOUT: usize, L: Leaf> Iterator for Leaves<'a, FANOUT, L> {
    type Item = &'a L;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let leaf = self.next?;
        self.remaining -= 1;
        self.advance();
        Some(leaf)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<const FANOUT: usize, L: Leaf> ExactSizeIterator
    for Leaves<'_, FANOUT, L>
{
}

impl<const FANOUT: usize, L: Leaf> core::iter::FusedIterator
    for Leaves<'_, FANOUT, L>
{
}
