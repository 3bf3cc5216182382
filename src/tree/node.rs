use std::sync::Arc;

use super::{Inode, Leaf, Lnode};

#[derive(Clone)]
pub(super) enum Node<const N: usize, L: Leaf> {
    Internal(Inode<N, L>),
    Leaf(Lnode<L>),
}

impl<const N: usize, L: Leaf + Default> Default for Node<N, L> {
    #[inline]
    fn default() -> Self {
        Node::Leaf(Lnode::from(L::default()))
    }
}

impl<const N: usize, L: Leaf> core::fmt::Debug for Node<N, L> {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            match self {
                Self::Internal(inode) => {
                    f.debug_tuple("Internal").field(&inode).finish()
                },
                Self::Leaf(leaf) => {
                    f.debug_tuple("Leaf").field(&leaf).finish()
                },
            }
        } else {
            match self {
                Self::Internal(inode) => write!(f, "{inode:#?}"),
                Self::Leaf(leaf) => write!(f, "{leaf:#?}"),
            }
        }
    }
}

impl<const N: usize, L: Leaf> From<L> for Node<N, L> {
    #[inline]
    fn from(leaf: L) -> Self {
        Self::Leaf(Lnode::from(leaf))
    }
}

impl<const N: usize, L: Leaf> Node<N, L> {
    #[inline]
    pub(super) fn as_internal(&self) -> &Inode<N, L> {
        match self {
            Node::Internal(inode) => inode,
            Node::Leaf(_) => unreachable!(
                "A node was expected to be an internal node but it's a leaf"
            ),
        }
    }

    #[inline]
    pub(super) fn as_leaf(&self) -> &Lnode<L> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => unreachable!(
                "A node was expected to be a leaf but it's an internal node"
            ),
        }
    }

    /// Checks the invariants of a non-root node and of its subtree.
    pub(super) fn assert_invariants(&self) {
        match self {
            Node::Internal(inode) => inode.assert_invariants(false),
            Node::Leaf(leaf) => {
                leaf.assert_invariants();
                assert!(
                    !leaf.value().is_underfilled(),
                    "A non-root leaf is underfilled: {leaf:?}"
                );
            },
        }
    }

    /// Returns the children of an internal node, or panics if this is a
    /// leaf.
    #[inline]
    pub(super) fn children(&self) -> &[Arc<Node<N, L>>] {
        self.as_internal().children()
    }

    #[inline]
    pub(super) fn depth(&self) -> usize {
        match self {
            Node::Internal(inode) => inode.depth(),
            Node::Leaf(_) => 0,
        }
    }

    /// Returns whether this node can be the child of an internal node
    /// without violating the occupancy invariants.
    #[inline]
    pub(super) fn is_ok_child(&self) -> bool {
        match self {
            Node::Internal(inode) => {
                inode.len() >= Inode::<N, L>::min_children()
            },
            Node::Leaf(leaf) => !leaf.value().is_underfilled(),
        }
    }

    #[inline]
    pub(super) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    #[inline]
    pub(super) fn leaf_count(&self) -> usize {
        match self {
            Node::Internal(inode) => inode.leaf_count(),
            Node::Leaf(_) => 1,
        }
    }

    #[inline]
    pub(super) fn summary(&self) -> &L::Summary {
        match self {
            Node::Internal(inode) => inode.summary(),
            Node::Leaf(leaf) => leaf.summary(),
        }
    }
}
