//! Huffman tree construction.
//!
//! The tree is an owned binary tree: a [`Node`] is either a leaf carrying a
//! symbol, or an internal node owning exactly two subtrees. The sum type
//! makes a node with a single child unrepresentable.
//!
//! # Construction
//!
//! Leaves for every symbol with a positive count go into a min-priority
//! queue. The two lightest nodes are popped (first pop becomes the left
//! child, second the right), merged, and pushed back until one node remains.
//!
//! # Tie-breaking
//!
//! The queue is ordered by `(weight, sequence)`, where `sequence` is the
//! order in which a node was pushed. Leaves are pushed in ascending symbol
//! order and every merged node takes the next sequence number, so equal
//! weights pop in insertion order. The exact tree shape, and therefore the
//! exact output bytes, depend only on the frequency table.
//!
//! # Edge Cases
//!
//! - No symbols: the tree is empty (no root).
//! - One symbol: a placeholder leaf of weight 1 is added so the real symbol
//!   still gets a one-bit code.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::alphabet::Symbol;
use crate::counter::FrequencyTable;

/// A node of a Huffman tree.
///
/// `Clone`, `PartialEq` and `Drop` walk the tree with an explicit stack, so
/// trees parsed from an artifact may be as deep as they have leaves. The
/// derived `Debug` recurses and is only meant for small trees.
#[derive(Debug)]
pub enum Node {
    /// A symbol, or the placeholder (`None`) that pads a one-symbol tree.
    Leaf { symbol: Option<Symbol>, weight: u64 },
    /// Merged frequency mass of two subtrees.
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        Node::Leaf {
            symbol: Some(symbol),
            weight,
        }
    }

    /// The reserved "no symbol" leaf.
    pub fn placeholder() -> Self {
        Node::Leaf {
            symbol: None,
            weight: 1,
        }
    }

    /// Merge two nodes under a new internal node.
    pub fn merge(left: Node, right: Node) -> Self {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Structural equality: same shape and same leaf symbols, weights ignored.
    ///
    /// Weights are not persisted, so a tree read back from an artifact only
    /// matches the tree it was built from in this sense.
    pub fn same_shape(&self, other: &Node) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            match (a, b) {
                (Node::Leaf { symbol: x, .. }, Node::Leaf { symbol: y, .. }) => {
                    if x != y {
                        return false;
                    }
                }
                (
                    Node::Internal {
                        left: al,
                        right: ar,
                        ..
                    },
                    Node::Internal {
                        left: bl,
                        right: br,
                        ..
                    },
                ) => {
                    stack.push((ar, br));
                    stack.push((al, bl));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Node {
    /// Copy of this node with placeholder children.
    fn shallow_copy(&self) -> Node {
        match self {
            Node::Leaf { symbol, weight } => Node::Leaf {
                symbol: *symbol,
                weight: *weight,
            },
            Node::Internal { weight, .. } => Node::Internal {
                weight: *weight,
                left: Box::new(Node::placeholder()),
                right: Box::new(Node::placeholder()),
            },
        }
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        let mut root = self.shallow_copy();
        {
            let mut stack: Vec<(&Node, &mut Node)> = vec![(self, &mut root)];
            while let Some((src, dst)) = stack.pop() {
                if let (
                    Node::Internal { left: sl, right: sr, .. },
                    Node::Internal { left: dl, right: dr, .. },
                ) = (src, dst)
                {
                    **dl = sl.shallow_copy();
                    **dr = sr.shallow_copy();
                    stack.push((&**sl, &mut **dl));
                    stack.push((&**sr, &mut **dr));
                }
            }
        }
        root
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            match (a, b) {
                (
                    Node::Leaf { symbol: x, weight: wx },
                    Node::Leaf { symbol: y, weight: wy },
                ) => {
                    if x != y || wx != wy {
                        return false;
                    }
                }
                (
                    Node::Internal {
                        weight: wa,
                        left: al,
                        right: ar,
                    },
                    Node::Internal {
                        weight: wb,
                        left: bl,
                        right: br,
                    },
                ) => {
                    if wa != wb {
                        return false;
                    }
                    stack.push((ar.as_ref(), br.as_ref()));
                    stack.push((al.as_ref(), bl.as_ref()));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Node {}

impl Drop for Node {
    fn drop(&mut self) {
        // Detach internal children so each node drops with leaf children only
        fn detach(child: &mut Box<Node>, stack: &mut Vec<Node>) {
            if !child.is_leaf() {
                stack.push(std::mem::replace(child.as_mut(), Node::placeholder()));
            }
        }

        let mut stack = Vec::new();
        if let Node::Internal { left, right, .. } = self {
            detach(left, &mut stack);
            detach(right, &mut stack);
        }
        while let Some(mut node) = stack.pop() {
            if let Node::Internal { left, right, .. } = &mut node {
                detach(left, &mut stack);
                detach(right, &mut stack);
            }
        }
    }
}

/// A Huffman tree, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HuffmanTree {
    root: Option<Node>,
}

impl HuffmanTree {
    /// The tree of an empty input.
    pub fn empty() -> Self {
        Self { root: None }
    }

    pub fn from_root(root: Node) -> Self {
        Self { root: Some(root) }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Leaves in depth-first, left-to-right order.
    pub fn leaves(&self) -> Vec<&Node> {
        let mut leaves = Vec::new();
        let mut stack: Vec<&Node> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf { .. } => leaves.push(node),
                Node::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        leaves
    }

    /// Number of leaves, placeholder included.
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Depth of the deepest leaf; 0 for an empty tree.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Node, usize)> = self.root.iter().map(|root| (root, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            match node {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        deepest
    }

    /// Sum of `weight * depth` over all leaves.
    ///
    /// For a tree built by [`build_tree`] this is the minimum over all binary
    /// trees with the same leaf weights. Saturates at `u64::MAX`.
    pub fn weighted_path_length(&self) -> u64 {
        let mut total = 0;
        let mut stack: Vec<(&Node, u64)> = self.root.iter().map(|root| (root, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            match node {
                Node::Leaf { weight, .. } => {
                    total = weight.saturating_mul(depth).saturating_add(total)
                }
                Node::Internal { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        total
    }

    /// See [`Node::same_shape`].
    pub fn same_shape(&self, other: &HuffmanTree) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same_shape(b),
            _ => false,
        }
    }
}

/// A queued node with its insertion sequence number.
#[derive(Debug)]
struct QueuedNode {
    node: Node,
    sequence: u64,
}

// Implement ordering for the heap (min-heap: lightest, then oldest, first)
impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        (other.node.weight(), other.sequence).cmp(&(self.node.weight(), self.sequence))
    }
}

/// Min-priority queue with stable ordering for equal weights.
struct NodeQueue {
    heap: BinaryHeap<QueuedNode>,
    next_sequence: u64,
}

impl NodeQueue {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    fn push(&mut self, node: Node) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(QueuedNode { node, sequence });
    }

    fn pop(&mut self) -> Option<Node> {
        self.heap.pop().map(|queued| queued.node)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Build the Huffman tree for a frequency table.
pub fn build_tree(frequencies: &FrequencyTable) -> HuffmanTree {
    let mut queue = NodeQueue::with_capacity(frequencies.distinct() + 1);
    for (symbol, count) in frequencies.present() {
        queue.push(Node::leaf(symbol, count));
    }

    if queue.len() == 1 {
        queue.push(Node::placeholder());
    }

    while queue.len() > 1 {
        // len > 1, so both pops succeed
        let (Some(left), Some(right)) = (queue.pop(), queue.pop()) else {
            break;
        };
        queue.push(Node::merge(left, right));
    }

    match queue.pop() {
        Some(root) => HuffmanTree::from_root(root),
        None => HuffmanTree::empty(),
    }
}
