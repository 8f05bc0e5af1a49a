//! Hierarchy module for institutional structures.
//!
//! Provides [`HierarchyTree`], a rooted tree whose levels follow a fixed
//! ladder (rectorate, faculty, department, program, course), with
//! search, subtree removal, and breadth/depth-first traversals.

mod tree;

pub use tree::{
    FlattenedNode, HierarchyStatistics, HierarchyTree, NodeKind, TreeError, TreeNode, TreeResult,
    DEFAULT_ROOT_NAME,
};
