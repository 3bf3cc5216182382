use core::cmp::Ordering;
use core::ops::Range;
use std::sync::Arc;

use super::{Inode, Leaf, Node, Tree};

/// Incrementally assembles a balanced [`Tree`] from leaves and already
/// built subtrees, pushed in order from left to right.
///
/// Pushed subtrees are reused as they are whenever they satisfy the
/// occupancy invariants, which is what makes splicing a small range of
/// leaves into a big tree touch only `O(log n)` nodes.
pub struct TreeBuilder<const FANOUT: usize, L: Leaf> {
    /// A stack of partially filled levels.
    ///
    /// # Invariants
    ///
    /// - all the nodes within a stack level have the same depth;
    ///
    /// - the levels are sorted by strictly decreasing depth, i.e. the node
    /// at the top of the stack is the shallowest one;
    ///
    /// - every level contains between 1 and `FANOUT - 1` nodes.
    stack: Vec<Vec<Arc<Node<FANOUT, L>>>>,
}

impl<const FANOUT: usize, L: Leaf> Default for TreeBuilder<FANOUT, L> {
    #[inline]
    fn default() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<const FANOUT: usize, L: Leaf> Clone for TreeBuilder<FANOUT, L> {
    #[inline]
    fn clone(&self) -> Self {
        Self { stack: self.stack.clone() }
    }
}

impl<const FANOUT: usize, L: Leaf> core::fmt::Debug for TreeBuilder<FANOUT, L> {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("levels", &self.stack.len())
            .finish()
    }
}

impl<const FANOUT: usize, L: Leaf> TreeBuilder<FANOUT, L> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push_leaf(&mut self, leaf: L) {
        self.push(Arc::new(Node::from(leaf)));
    }

    /// Pushes the leaves of `tree` whose indices fall within `leaf_range`,
    /// sharing every subtree that's entirely contained in the range.
    #[inline]
    pub fn push_leaves_of(
        &mut self,
        tree: &Tree<FANOUT, L>,
        leaf_range: Range<usize>,
    ) {
        self.push_slice(&tree.root, leaf_range);
    }

    #[inline]
    pub fn build(mut self) -> Tree<FANOUT, L>
    where
        L: Default,
    {
        let Some(mut root) = self.pop() else {
            return Tree::default();
        };

        while let Some(node) = self.pop() {
            root = concat(node, root);
        }

        Tree { root: pull_up_singular(root) }
    }

    fn pop(&mut self) -> Option<Arc<Node<FANOUT, L>>> {
        let mut nodes = self.stack.pop()?;

        if nodes.len() == 1 {
            return nodes.pop();
        }

        // Only the last node of a level can be underfilled.
        if let Some(last) = nodes.pop() {
            if last.is_ok_child() {
                nodes.push(last);
            } else if let Some(prev) = nodes.pop() {
                let (left, right) = if last.is_leaf() {
                    balance_leaf_nodes(prev, last)
                } else {
                    rebalance_children(prev.children(), last.children())
                };
                nodes.push(left);
                nodes.extend(right);
            }
        }

        if nodes.len() == 1 {
            nodes.pop()
        } else {
            Some(Arc::new(Node::Internal(Inode::from_children(nodes))))
        }
    }

    fn push(&mut self, mut node: Arc<Node<FANOUT, L>>) {
        loop {
            let ordering = match self.stack.last() {
                Some(level) => level[0].depth().cmp(&node.depth()),
                None => Ordering::Greater,
            };

            match ordering {
                Ordering::Less => {
                    let Some(top) = self.pop() else { unreachable!() };
                    node = concat(top, node);
                },

                Ordering::Equal => {
                    let Some(level) = self.stack.last_mut() else {
                        unreachable!()
                    };

                    let Some(last) = level.pop() else { unreachable!() };

                    if last.is_ok_child() && node.is_ok_child() {
                        level.push(last);
                        level.push(node);
                    } else if node.is_leaf() {
                        let (left, right) = balance_leaf_nodes(last, node);
                        level.push(left);
                        level.extend(right);
                    } else {
                        let (left, right) = rebalance_children(
                            last.children(),
                            node.children(),
                        );
                        level.push(left);
                        level.extend(right);
                    }

                    if level.len() < FANOUT {
                        break;
                    }

                    let Some(full) = self.pop() else { unreachable!() };
                    node = full;
                },

                Ordering::Greater => {
                    self.stack.push(vec![node]);
                    break;
                },
            }
        }
    }

    fn push_slice(&mut self, node: &Arc<Node<FANOUT, L>>, range: Range<usize>) {
        if range.is_empty() {
            return;
        }

        if range.start == 0 && range.end == node.leaf_count() {
            self.push(Arc::clone(node));
            return;
        }

        let mut offset = 0;

        for child in node.children() {
            let count = child.leaf_count();

            let start = range.start.max(offset);
            let end = range.end.min(offset + count);

            if start < end {
                self.push_slice(child, start - offset..end - offset);
            }

            offset += count;

            if offset >= range.end {
                break;
            }
        }
    }
}

/// Joins two nodes, with every leaf of `left` ending up before every leaf
/// of `right`. The result might be a node whose number of children is below
/// the minimum, which is fine as long as it ends up being the root.
fn concat<const N: usize, L: Leaf>(
    left: Arc<Node<N, L>>,
    right: Arc<Node<N, L>>,
) -> Arc<Node<N, L>> {
    let left_depth = left.depth();
    let right_depth = right.depth();

    match left_depth.cmp(&right_depth) {
        Ordering::Less => {
            let children = right.children();

            if left_depth == right_depth - 1 && left.is_ok_child() {
                return merge_nodes(&[left], children);
            }

            let first = concat(left, Arc::clone(&children[0]));

            if first.depth() == right_depth - 1 {
                merge_nodes(&[first], &children[1..])
            } else {
                merge_nodes(first.children(), &children[1..])
            }
        },

        Ordering::Equal => {
            if left.is_ok_child() && right.is_ok_child() {
                return Arc::new(Node::Internal(Inode::from_children(vec![
                    left, right,
                ])));
            }

            if left_depth == 0 {
                let (left, right) = balance_leaf_nodes(left, right);
                return match right {
                    Some(right) => Arc::new(Node::Internal(
                        Inode::from_children(vec![left, right]),
                    )),
                    None => left,
                };
            }

            merge_nodes(left.children(), right.children())
        },

        Ordering::Greater => {
            let children = left.children();

            if right_depth == left_depth - 1 && right.is_ok_child() {
                return merge_nodes(children, &[right]);
            }

            let last_idx = children.len() - 1;

            let last = concat(Arc::clone(&children[last_idx]), right);

            if last.depth() == left_depth - 1 {
                merge_nodes(&children[..last_idx], &[last])
            } else {
                merge_nodes(&children[..last_idx], last.children())
            }
        },
    }
}

/// Creates a node out of the concatenation of two runs of sibling nodes,
/// splitting it in two if it wouldn't fit in a single inode.
fn merge_nodes<const N: usize, L: Leaf>(
    left: &[Arc<Node<N, L>>],
    right: &[Arc<Node<N, L>>],
) -> Arc<Node<N, L>> {
    let (left, right) = rebalance_children(left, right);

    match right {
        Some(right) => {
            Arc::new(Node::Internal(Inode::from_children(vec![left, right])))
        },
        None => left,
    }
}

fn rebalance_children<const N: usize, L: Leaf>(
    left: &[Arc<Node<N, L>>],
    right: &[Arc<Node<N, L>>],
) -> (Arc<Node<N, L>>, Option<Arc<Node<N, L>>>) {
    let total = left.len() + right.len();

    let mut children = Vec::with_capacity(total);
    children.extend(left.iter().cloned());
    children.extend(right.iter().cloned());

    if total <= N {
        return (Arc::new(Node::Internal(Inode::from_children(children))), None);
    }

    let split = (total / 2).max(Inode::<N, L>::min_children());
    let second = children.split_off(split);

    (
        Arc::new(Node::Internal(Inode::from_children(children))),
        Some(Arc::new(Node::Internal(Inode::from_children(second)))),
    )
}

fn balance_leaf_nodes<const N: usize, L: Leaf>(
    left: Arc<Node<N, L>>,
    right: Arc<Node<N, L>>,
) -> (Arc<Node<N, L>>, Option<Arc<Node<N, L>>>) {
    if left.is_ok_child() && right.is_ok_child() {
        return (left, Some(right));
    }

    let mut left = left.as_leaf().value().clone();
    let mut right = right.as_leaf().value().clone();

    if L::balance_leaves(&mut left, &mut right) {
        (Arc::new(Node::from(left)), None)
    } else {
        (Arc::new(Node::from(left)), Some(Arc::new(Node::from(right))))
    }
}

/// Replaces a chain of internal nodes with a single child with the first
/// descendant that has more than one.
fn pull_up_singular<const N: usize, L: Leaf>(
    mut root: Arc<Node<N, L>>,
) -> Arc<Node<N, L>> {
    while let Node::Internal(inode) = &*root {
        if inode.len() != 1 {
            break;
        }
        root = Arc::clone(&inode.children()[0]);
    }
    root
}
