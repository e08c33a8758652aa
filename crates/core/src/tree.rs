//! Huffman tree construction by greedy frequency merge.
//!
//! Nodes live in an arena owned by [`HuffmanTree`] and refer to their
//! children by index. Every internal node has exactly two children and every
//! node except the root has exactly one parent.
//!
//! # Merge order
//!
//! The builder always merges the two lowest nodes under [`merge_order`]:
//! frequency ascending, then a tie-break key. At equal frequency internal
//! nodes come before leaves, older internal nodes before newer ones, and
//! leaves by ascending symbol. This is a total order, so a frequency table
//! always produces the same tree no matter what order the input bytes
//! arrived in.
//!
//! # Shape encoding
//!
//! [`HuffmanTree::write_shape`] stores the tree pre-order, one marker bit per
//! node (1 = leaf, followed by its 8-bit symbol; 0 = internal). Weights are
//! not stored since decoding does not need them; a tree read back with
//! [`HuffmanTree::read_shape`] has all weights set to zero.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use log::{debug, trace};

use crate::bitio::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::error::{FormatError, Result};
use crate::frequency::{FrequencyTable, Symbol, ALPHABET_SIZE};

/// Index of a node in its tree's arena.
pub type NodeId = usize;

/// Most nodes a tree over a 256-symbol alphabet can have.
pub const MAX_NODES: usize = 2 * ALPHABET_SIZE - 1;

/// A tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Leaf { symbol: Symbol, freq: u64 },
    Internal { freq: u64, left: NodeId, right: NodeId },
}

impl Node {
    pub fn freq(&self) -> u64 {
        match *self {
            Node::Leaf { freq, .. } | Node::Internal { freq, .. } => freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match *self {
            Node::Leaf { symbol, .. } => Some(symbol),
            Node::Internal { .. } => None,
        }
    }

    /// `(left, right)` for internal nodes.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match *self {
            Node::Internal { left, right, .. } => Some((left, right)),
            Node::Leaf { .. } => None,
        }
    }

    /// The child reached by following `bit` (false = left, true = right).
    pub fn child(&self, bit: bool) -> Option<NodeId> {
        self.children()
            .map(|(left, right)| if bit { right } else { left })
    }
}

/// Tie-break key for nodes of equal frequency. Variant order matters: every
/// internal node sorts before every leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TieBreak {
    /// Carries the merge sequence number.
    Internal(usize),
    Leaf(Symbol),
}

/// A node waiting in the priority queue.
#[derive(Debug, Clone, Copy)]
struct Pending {
    freq: u64,
    key: TieBreak,
    id: NodeId,
}

/// The total order used to pick the next two nodes to merge.
fn merge_order(a: &Pending, b: &Pending) -> Ordering {
    a.freq.cmp(&b.freq).then_with(|| a.key.cmp(&b.key))
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        merge_order(self, other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        merge_order(self, other)
    }
}

/// Placeholder leaf injected when the input has a single distinct symbol,
/// so that symbol still gets a one-bit code.
pub fn sentinel_for(sole: Symbol) -> Symbol {
    if sole == 0 {
        1
    } else {
        0
    }
}

/// A strict binary prefix tree over byte symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree for `freqs`.
    ///
    /// Returns `None` when every count is zero (empty input).
    pub fn build(freqs: &FrequencyTable) -> Option<Self> {
        let mut nodes = Vec::with_capacity(MAX_NODES);
        let mut queue = BinaryHeap::with_capacity(ALPHABET_SIZE);

        for (symbol, freq) in freqs.iter() {
            let id = nodes.len();
            nodes.push(Node::Leaf { symbol, freq });
            queue.push(Reverse(Pending {
                freq,
                key: TieBreak::Leaf(symbol),
                id,
            }));
        }

        if let [Node::Leaf { symbol: sole, .. }] = nodes[..] {
            let symbol = sentinel_for(sole);
            let id = nodes.len();
            nodes.push(Node::Leaf { symbol, freq: 0 });
            queue.push(Reverse(Pending {
                freq: 0,
                key: TieBreak::Leaf(symbol),
                id,
            }));
        }

        let mut merges = 0;
        loop {
            let Reverse(left) = queue.pop()?;
            let Some(Reverse(right)) = queue.pop() else {
                let tree = Self {
                    nodes,
                    root: left.id,
                };
                debug!(
                    "built tree: {} leaves, {} internal nodes, depth {}",
                    tree.leaf_count(),
                    tree.internal_count(),
                    tree.depth()
                );
                return Some(tree);
            };

            let freq = left.freq + right.freq;
            let id = nodes.len();
            trace!(
                "merge #{merges}: node {} ({}) + node {} ({}) -> node {id} ({freq})",
                left.id,
                left.freq,
                right.id,
                right.freq
            );
            nodes.push(Node::Internal {
                freq,
                left: left.id,
                right: right.id,
            });
            queue.push(Reverse(Pending {
                freq,
                key: TieBreak::Internal(merges),
                id,
            }));
            merges += 1;
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node at `id`, or `None` if no such node exists.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// All nodes in arena order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    pub fn internal_count(&self) -> usize {
        self.nodes.len() - self.leaf_count()
    }

    /// Frequency at the root, i.e. the input length for built trees.
    pub fn weight(&self) -> u64 {
        self.nodes.get(self.root).map_or(0, Node::freq)
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes.get(id) {
                Some(Node::Internal { left, right, .. }) => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
                Some(Node::Leaf { .. }) => deepest = deepest.max(depth),
                None => {}
            }
        }
        deepest
    }

    /// Same arena, different root; lets tests build malformed trees.
    #[cfg(test)]
    pub(crate) fn with_root(&self, root: NodeId) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root,
        }
    }

    /// Derive the code table for this tree.
    pub fn code_table(&self) -> CodeTable {
        CodeTable::from_tree(self)
    }

    /// Write the tree shape pre-order.
    pub fn write_shape(&self, writer: &mut BitWriter) {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.nodes.get(id) {
                Some(&Node::Leaf { symbol, .. }) => {
                    writer.write_bit(true);
                    for shift in (0..8).rev() {
                        writer.write_bit((symbol >> shift) & 1 == 1);
                    }
                }
                Some(&Node::Internal { left, right, .. }) => {
                    writer.write_bit(false);
                    stack.push(right);
                    stack.push(left);
                }
                None => {}
            }
        }
    }

    /// Rebuild a tree written by [`write_shape`](Self::write_shape).
    ///
    /// # Errors
    /// `FormatError::MalformedTree` if the encoding ends early, has a leaf
    /// at the root, repeats a symbol or holds more than [`MAX_NODES`] nodes.
    pub fn read_shape(reader: &mut BitReader<'_>) -> Result<Self> {
        let truncated = || FormatError::MalformedTree("encoding ends mid-tree");

        let mut nodes: Vec<Node> = Vec::new();
        let mut seen = [false; ALPHABET_SIZE];
        // Internal nodes still missing a child, with whether the left one is set.
        let mut open: Vec<(NodeId, bool)> = Vec::new();

        loop {
            if nodes.len() == MAX_NODES {
                return Err(FormatError::MalformedTree("too many nodes").into());
            }

            let id = nodes.len();
            let is_leaf = reader.read_bit().map_err(|_| truncated())?;
            if is_leaf {
                let symbol = reader.read_bits(8).map_err(|_| truncated())? as Symbol;
                if std::mem::replace(&mut seen[usize::from(symbol)], true) {
                    return Err(FormatError::MalformedTree("symbol appears twice").into());
                }
                nodes.push(Node::Leaf { symbol, freq: 0 });
            } else {
                nodes.push(Node::Internal {
                    freq: 0,
                    left: id,
                    right: id,
                });
            }

            if let Some(top) = open.last_mut() {
                let parent = top.0;
                let is_right = top.1;
                top.1 = true;
                if is_right {
                    open.pop();
                }
                if let Node::Internal { left, right, .. } = &mut nodes[parent] {
                    if is_right {
                        *right = id;
                    } else {
                        *left = id;
                    }
                }
            } else if is_leaf {
                return Err(FormatError::MalformedTree("root is a leaf").into());
            }

            if !is_leaf {
                open.push((id, false));
            }
            if open.is_empty() {
                break;
            }
        }

        Ok(Self { nodes, root: 0 })
    }
}
