//! Call tree storage
//!
//! The live tree is an arena: every node gets a [`NodeId`] at creation and
//! keeps it forever. Parents own their children through `children` id lists;
//! the `parent` field is a plain handle used for walking upwards. Truncating a
//! `children` list detaches nodes but never removes them from the arena.
//!
//! [`SnapshotNode`] is the owned, frozen form of a subtree. It holds no ids
//! and no references into the arena, so a snapshot cannot observe later
//! mutations of the live tree.
//!
//! @module replay/tree

use serde::Serialize;

// =============================================================================
// TYPES
// =============================================================================

/// Stable arena index of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Last known resolution outcome of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Truth {
    #[default]
    Unknown,
    Succeeded,
    Failed,
}

impl std::fmt::Display for Truth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Truth::Unknown => write!(f, "unknown"),
            Truth::Succeeded => write!(f, "succeeded"),
            Truth::Failed => write!(f, "failed"),
        }
    }
}

/// One call frame in the live tree
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub truth: Truth,
    pub depth: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Leaf added when a frame closed without sub-calls
    pub synthesized: bool,
}

// =============================================================================
// LIVE TREE
// =============================================================================

/// Label of the synthetic root frame
pub const ROOT_LABEL: &str = "root";

/// Arena-backed call tree with a single `root` frame
#[derive(Debug, Clone)]
pub struct CallTree {
    nodes: Vec<Node>,
}

impl CallTree {
    /// Create a tree holding only the root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                id: NodeId(0),
                label: ROOT_LABEL.to_string(),
                truth: Truth::Unknown,
                depth: 0,
                parent: None,
                children: Vec::new(),
                synthesized: false,
            }],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a node by id
    ///
    /// Ids are only minted by this tree, so lookup cannot miss.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Append a new last child under `parent` and return its id
    pub fn add_child(&mut self, parent: NodeId, label: impl Into<String>, truth: Truth) -> NodeId {
        self.push_node(parent, label.into(), truth, false)
    }

    /// Append the leaf that stands in for the sub-calls of a closed frame
    pub fn add_leaf(&mut self, parent: NodeId, label: impl Into<String>, truth: Truth) -> NodeId {
        self.push_node(parent, label.into(), truth, true)
    }

    fn push_node(&mut self, parent: NodeId, label: String, truth: Truth, synthesized: bool) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let depth = self.node(parent).depth + 1;
        self.nodes.push(Node {
            id,
            label,
            truth,
            depth,
            parent: Some(parent),
            children: Vec::new(),
            synthesized,
        });
        self.node_mut(parent).children.push(id);
        id
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Keep the first `len` children of `id`, detaching the rest
    pub fn truncate_children(&mut self, id: NodeId, len: usize) {
        self.node_mut(id).children.truncate(len);
    }

    /// Number of nodes ever created, attached or not
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Ids from `id` up to and including the root
    pub fn ancestry(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut cursor = id;
        while let Some(parent) = self.parent(cursor) {
            chain.push(parent);
            cursor = parent;
        }
        chain
    }

    /// Number of nodes reachable from the root
    pub fn attached_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            count += 1;
            stack.extend(self.children(id).iter().copied());
        }
        count
    }

    /// Deep copy of the subtree at `id` as an owned value tree.
    ///
    /// Nodes are built in reverse pre-order so every child is finished
    /// before its parent; the stack depth stays constant.
    pub fn freeze(&self, id: NodeId) -> SnapshotNode {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            order.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }

        let mut built: Vec<SnapshotNode> = Vec::new();
        for &next in order.iter().rev() {
            let node = self.node(next);
            let mut children = built.split_off(built.len() - node.children.len());
            children.reverse();
            built.push(SnapshotNode {
                label: node.label.clone(),
                truth: node.truth,
                depth: node.depth,
                children,
            });
        }

        // `order` starts with `id`, so exactly one node is left
        built.pop().unwrap_or_else(|| SnapshotNode::leaf(self.node(id)))
    }

    /// Deep copy of the whole attached tree
    pub fn freeze_root(&self) -> SnapshotNode {
        self.freeze(self.root())
    }
}

impl Default for CallTree {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// FROZEN TREE
// =============================================================================

/// Owned, immutable copy of a call frame and its subtree
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotNode {
    pub label: String,
    pub truth: Truth,
    pub depth: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    fn leaf(node: &Node) -> Self {
        Self {
            label: node.label.clone(),
            truth: node.truth,
            depth: node.depth,
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this subtree
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Always false: a subtree holds at least its own node
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Depth of the deepest node relative to this one
    pub fn height(&self) -> usize {
        self.walk_with_level()
            .into_iter()
            .map(|(level, _)| level)
            .max()
            .unwrap_or(0)
    }

    /// Pre-order walk over the subtree
    pub fn walk(&self) -> Vec<&SnapshotNode> {
        self.walk_with_level()
            .into_iter()
            .map(|(_, node)| node)
            .collect()
    }

    /// Pre-order walk paired with each node's distance from `self`
    pub fn walk_with_level(&self) -> Vec<(usize, &SnapshotNode)> {
        let mut out = Vec::new();
        let mut stack = vec![(0, self)];
        while let Some((level, node)) = stack.pop() {
            out.push((level, node));
            stack.extend(node.children.iter().rev().map(|c| (level + 1, c)));
        }
        out
    }

    /// Outcome of the first top-level call, if there is one
    pub fn first_call_truth(&self) -> Option<Truth> {
        self.children.first().map(|c| c.truth)
    }

    /// True when the first top-level call succeeded
    pub fn is_successful(&self) -> bool {
        self.first_call_truth() == Some(Truth::Succeeded)
    }
}

impl PartialEq for SnapshotNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = vec![(self, other)];
        while let Some((a, b)) = pairs.pop() {
            if a.label != b.label
                || a.truth != b.truth
                || a.depth != b.depth
                || a.children.len() != b.children.len()
            {
                return false;
            }
            pairs.extend(a.children.iter().zip(b.children.iter()));
        }
        true
    }
}

impl Eq for SnapshotNode {}

// Dropping a deep chain recursively would overflow the stack
impl Drop for SnapshotNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
