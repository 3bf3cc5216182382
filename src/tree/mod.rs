//! A generic persistent B-tree, with summaries cached in every node.

mod leaf_path;
mod leaves;
mod node;
mod node_internal;
mod node_leaf;
mod traits;
mod tree;
mod tree_builder;

pub use leaf_path::LeafPath;
pub use leaves::Leaves;
use node::Node;
use node_internal::Inode;
use node_leaf::Lnode;
pub use traits::{Leaf, Metric, Summary};
pub use tree::{LeafPosition, Tree};
pub use tree_builder::TreeBuilder;
