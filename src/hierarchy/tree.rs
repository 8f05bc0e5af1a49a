//! Institutional hierarchy tree.
//!
//! A rooted n-ary tree whose levels follow a fixed ladder of kinds:
//! rectorate, faculty, department, program, course. Each kind admits
//! exactly one child kind, so the tree is at most five levels deep.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Default name of the root node.
pub const DEFAULT_ROOT_NAME: &str = "Central Rectorate";

/// The level of an entity in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// The root of the tree
    Rectorate,
    Faculty,
    Department,
    Program,
    /// Leaf level
    Course,
}

impl NodeKind {
    /// All kinds from root to leaf.
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Rectorate,
        NodeKind::Faculty,
        NodeKind::Department,
        NodeKind::Program,
        NodeKind::Course,
    ];

    /// Returns the level of this kind (0 = root).
    pub fn level(self) -> usize {
        match self {
            NodeKind::Rectorate => 0,
            NodeKind::Faculty => 1,
            NodeKind::Department => 2,
            NodeKind::Program => 3,
            NodeKind::Course => 4,
        }
    }

    /// Returns the only kind allowed directly below this one.
    pub fn child_kind(self) -> Option<NodeKind> {
        match self {
            NodeKind::Rectorate => Some(NodeKind::Faculty),
            NodeKind::Faculty => Some(NodeKind::Department),
            NodeKind::Department => Some(NodeKind::Program),
            NodeKind::Program => Some(NodeKind::Course),
            NodeKind::Course => None,
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Rectorate => "Rectorate",
            NodeKind::Faculty => "Faculty",
            NodeKind::Department => "Department",
            NodeKind::Program => "Program",
            NodeKind::Course => "Course",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rectorate" => Ok(NodeKind::Rectorate),
            "faculty" => Ok(NodeKind::Faculty),
            "department" => Ok(NodeKind::Department),
            "program" => Ok(NodeKind::Program),
            "course" => Ok(NodeKind::Course),
            _ => Err(format!(
                "Unknown entity kind: '{}'. Valid kinds: rectorate, faculty, department, program, course",
                s
            )),
        }
    }
}

/// Errors that can occur when changing the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("parent '{0}' not found")]
    ParentNotFound(String),

    #[error("a {parent_kind} cannot contain a {requested}")]
    InvalidChildKind {
        parent_kind: NodeKind,
        requested: NodeKind,
    },

    #[error("'{parent}' already has a child named '{name}'")]
    DuplicateChild { parent: String, name: String },

    #[error("the root node cannot be removed")]
    RootRemoval,

    #[error("entity '{0}' not found")]
    NotFound(String),
}

/// Result type for hierarchy operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// A node in the hierarchy tree
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    /// Entity name
    pub name: String,
    /// Entity kind
    pub kind: NodeKind,
    /// Free-form description
    pub description: String,
    /// Child entities in insertion order
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a new leaf node
    pub fn new(name: impl Into<String>, kind: NodeKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            children: Vec::new(),
        }
    }

    /// Check if this node has children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Depth-first search for the first node named `name`, this node included.
    pub fn find(&self, name: &str) -> Option<&TreeNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut TreeNode> {
        if self.name == name {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(name))
    }

    /// Detaches the first descendant named `name`, in depth-first order.
    fn remove_descendant(&mut self, name: &str) -> Option<TreeNode> {
        for i in 0..self.children.len() {
            if self.children[i].name == name {
                return Some(self.children.remove(i));
            }
            if let Some(node) = self.children[i].remove_descendant(name) {
                return Some(node);
            }
        }
        None
    }

    fn path_to<'a>(&'a self, name: &str, path: &mut Vec<&'a TreeNode>) -> bool {
        path.push(self);
        if self.name == name {
            return true;
        }
        for child in &self.children {
            if child.path_to(name, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    fn collect_depth_first<'a>(&'a self, result: &mut Vec<&'a TreeNode>) {
        result.push(self);
        for child in &self.children {
            child.collect_depth_first(result);
        }
    }

    fn flatten_recursive(&self, result: &mut Vec<FlattenedNode>, ancestors_are_last: &mut Vec<bool>) {
        let depth = ancestors_are_last.len();
        result.push(FlattenedNode {
            name: self.name.clone(),
            kind: self.kind,
            depth,
            is_last_child: ancestors_are_last.last().copied().unwrap_or(true),
            ancestors_are_last: ancestors_are_last.clone(),
        });

        let child_count = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            ancestors_are_last.push(i == child_count - 1);
            child.flatten_recursive(result, ancestors_are_last);
            ancestors_are_last.pop();
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.name)
    }
}

/// A flattened representation of a tree node for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedNode {
    /// Entity name
    pub name: String,
    /// Entity kind
    pub kind: NodeKind,
    /// Depth in the tree
    pub depth: usize,
    /// Whether this is the last child of its parent
    pub is_last_child: bool,
    /// For the node itself and each ancestor below the root, whether it is
    /// the last child of its parent
    ancestors_are_last: Vec<bool>,
}

impl FlattenedNode {
    /// Build the tree prefix (indentation and branch lines)
    pub fn tree_prefix(&self) -> String {
        let mut prefix = String::new();
        if self.depth == 0 {
            return prefix;
        }

        for &is_last in &self.ancestors_are_last[..self.depth - 1] {
            if is_last {
                prefix.push_str("    ");
            } else {
                prefix.push_str("│   ");
            }
        }

        if self.is_last_child {
            prefix.push_str("└── ");
        } else {
            prefix.push_str("├── ");
        }
        prefix
    }
}

/// Per-kind node counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyStatistics {
    pub rectorates: usize,
    pub faculties: usize,
    pub departments: usize,
    pub programs: usize,
    pub courses: usize,
}

impl HierarchyStatistics {
    /// Returns the count for one kind.
    pub fn count(&self, kind: NodeKind) -> usize {
        match kind {
            NodeKind::Rectorate => self.rectorates,
            NodeKind::Faculty => self.faculties,
            NodeKind::Department => self.departments,
            NodeKind::Program => self.programs,
            NodeKind::Course => self.courses,
        }
    }

    fn increment(&mut self, kind: NodeKind) {
        let slot = match kind {
            NodeKind::Rectorate => &mut self.rectorates,
            NodeKind::Faculty => &mut self.faculties,
            NodeKind::Department => &mut self.departments,
            NodeKind::Program => &mut self.programs,
            NodeKind::Course => &mut self.courses,
        };
        *slot += 1;
    }

    /// Returns the total number of nodes.
    pub fn total(&self) -> usize {
        NodeKind::ALL.iter().map(|&kind| self.count(kind)).sum()
    }
}

/// A rooted hierarchy with a fixed kind ladder.
///
/// # Example
///
/// ```rust
/// use depscope::hierarchy::{HierarchyTree, NodeKind};
///
/// let mut tree = HierarchyTree::new("National University");
/// tree.insert("National University", "Engineering", NodeKind::Faculty, "")
///     .unwrap();
///
/// // A faculty cannot hold a course directly
/// assert!(tree
///     .insert("Engineering", "Algorithms", NodeKind::Course, "")
///     .is_err());
/// assert_eq!(tree.children("National University").len(), 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct HierarchyTree {
    root: TreeNode,
}

impl Default for HierarchyTree {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_NAME)
    }
}

impl HierarchyTree {
    /// Creates a tree holding only a rectorate root.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root: TreeNode::new(
                root_name,
                NodeKind::Rectorate,
                "Highest university authority",
            ),
        }
    }

    /// Returns the root node.
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Inserts a new entity below `parent_name`.
    ///
    /// # Errors
    ///
    /// - [`TreeError::ParentNotFound`] if no node is named `parent_name`
    /// - [`TreeError::InvalidChildKind`] if `kind` is not the parent's child kind
    /// - [`TreeError::DuplicateChild`] if the parent already has a child named `name`
    pub fn insert(
        &mut self,
        parent_name: &str,
        name: &str,
        kind: NodeKind,
        description: &str,
    ) -> TreeResult<()> {
        let parent = self
            .root
            .find_mut(parent_name)
            .ok_or_else(|| TreeError::ParentNotFound(parent_name.to_string()))?;

        if parent.kind.child_kind() != Some(kind) {
            return Err(TreeError::InvalidChildKind {
                parent_kind: parent.kind,
                requested: kind,
            });
        }
        if parent.children.iter().any(|child| child.name == name) {
            return Err(TreeError::DuplicateChild {
                parent: parent_name.to_string(),
                name: name.to_string(),
            });
        }

        parent.children.push(TreeNode::new(name, kind, description));
        debug!(parent = parent_name, name, %kind, "entity inserted");
        Ok(())
    }

    /// Removes the named entity together with its whole subtree.
    ///
    /// # Returns
    ///
    /// The detached subtree.
    pub fn remove(&mut self, name: &str) -> TreeResult<TreeNode> {
        if name == self.root.name {
            return Err(TreeError::RootRemoval);
        }
        let removed = self
            .root
            .remove_descendant(name)
            .ok_or_else(|| TreeError::NotFound(name.to_string()))?;

        debug!(name, kind = %removed.kind, "entity removed");
        Ok(removed)
    }

    /// Finds the first node named `name` in depth-first order.
    pub fn find(&self, name: &str) -> Option<&TreeNode> {
        self.root.find(name)
    }

    /// Gets the direct children of `name` (empty if unknown).
    pub fn children(&self, name: &str) -> &[TreeNode] {
        self.find(name)
            .map_or(&[], |node| node.children.as_slice())
    }

    /// Gets the nodes from the root down to `name` (empty if unknown).
    pub fn path_to(&self, name: &str) -> Vec<&TreeNode> {
        let mut path = Vec::new();
        if !self.root.path_to(name, &mut path) {
            path.clear();
        }
        path
    }

    /// Breadth-first traversal grouped by level.
    pub fn levels(&self) -> Vec<Vec<&TreeNode>> {
        let mut levels = Vec::new();
        let mut current = vec![&self.root];

        while !current.is_empty() {
            let next: Vec<&TreeNode> = current
                .iter()
                .flat_map(|&node| node.children.iter())
                .collect();
            levels.push(current);
            current = next;
        }

        levels
    }

    /// Depth-first (pre-order) traversal of the whole tree.
    pub fn depth_first(&self) -> Vec<&TreeNode> {
        let mut result = Vec::new();
        self.root.collect_depth_first(&mut result);
        result
    }

    /// Counts nodes per kind.
    pub fn statistics(&self) -> HierarchyStatistics {
        let mut stats = HierarchyStatistics::default();
        for node in self.depth_first() {
            stats.increment(node.kind);
        }
        stats
    }

    /// Flatten the tree into a list for rendering
    pub fn flatten(&self) -> Vec<FlattenedNode> {
        let mut result = Vec::new();
        self.root.flatten_recursive(&mut result, &mut Vec::new());
        result
    }

    /// Renders the tree with box-drawing branch lines, one node per line.
    pub fn render(&self) -> String {
        self.flatten()
            .iter()
            .map(|node| format!("{}{}: {}", node.tree_prefix(), node.kind, node.name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
