//! Builds the Huffman tree from a frequency table with the two-queue merge.
//!
//! Leaves are sorted once into a FIFO queue. Every merged node goes to the back of a
//! second FIFO queue, and because merged weights never decrease that queue stays sorted
//! too. Each step takes the lighter of the two queue fronts, preferring the leaf on a
//! tie, so a given table always yields the same tree shape.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

use log::{debug, trace};

use crate::tools::freq_count::FreqTable;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Node {
    Leaf { symbol: u8, count: u64 },
    Internal {
        count: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn leaf(symbol: u8, count: u64) -> Node {
        Node::Leaf { symbol, count }
    }

    /// Merge two nodes. The first one taken becomes the left child.
    pub fn internal(left: Node, right: Node) -> Node {
        Node::Internal {
            count: left.count() + right.count(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            Node::Leaf { count, .. } | Node::Internal { count, .. } => *count,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Byte value of a leaf, None for an internal node.
    pub fn symbol(&self) -> Option<u8> {
        match self {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    /// Sort Nodes by increasing count. On equal counts a leaf comes before an internal
    /// node, and two leaves go by increasing byte value.
    pub fn cmp_weight(&self, other: &Self) -> Ordering {
        self.count()
            .cmp(&other.count())
            .then_with(|| match (self.symbol(), other.symbol()) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}

/// Binary prefix-code tree. Empty input has no root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Option<Node>,
}

impl HuffmanTree {
    /// Build the tree for the non-zero entries of the table.
    pub fn from_frequencies(freqs: &FreqTable) -> Self {
        let mut leaves: Vec<Node> = freqs
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| Node::leaf(symbol as u8, count))
            .collect();
        leaves.sort_by(Node::cmp_weight);
        debug!("Building tree from {} leaves", leaves.len());

        let mut leaf_q: VecDeque<Node> = leaves.into();
        let mut merge_q: VecDeque<Node> = VecDeque::with_capacity(leaf_q.len());

        while leaf_q.len() + merge_q.len() > 1 {
            let (Some(left), Some(right)) = (
                take_lightest(&mut leaf_q, &mut merge_q),
                take_lightest(&mut leaf_q, &mut merge_q),
            ) else {
                unreachable!("two nodes are queued")
            };
            trace!("merge {} + {}", left.count(), right.count());
            merge_q.push_back(Node::internal(left, right));
        }

        // A lone leaf never reaches the merge queue and is the root itself.
        let root = merge_q.pop_front().or_else(|| leaf_q.pop_front());
        HuffmanTree { root }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Nodes in preorder, left child before right child.
    pub fn preorder(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut stack: Vec<&Node> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            if let Node::Internal { left, right, .. } = node {
                stack.push(right);
                stack.push(left);
            }
        }
        out
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&Node, usize)> = self.root.iter().map(|n| (n, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            if let Node::Internal { left, right, .. } = node {
                stack.push((right.as_ref(), depth + 1));
                stack.push((left.as_ref(), depth + 1));
            }
        }
        height
    }
}

/// Pop the lighter front of the two queues. Leaves win ties.
fn take_lightest(leaf_q: &mut VecDeque<Node>, merge_q: &mut VecDeque<Node>) -> Option<Node> {
    match (leaf_q.front(), merge_q.front()) {
        (Some(leaf), Some(merged)) if merged.count() < leaf.count() => merge_q.pop_front(),
        (Some(_), _) => leaf_q.pop_front(),
        (None, _) => merge_q.pop_front(),
    }
}

impl Display for HuffmanTree {
    /// Preorder listing: leaves as `*byte:count`, internal nodes as their count.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, node) in self.preorder().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match node {
                Node::Leaf { symbol, count } => write!(f, "*{}:{}", symbol, count)?,
                Node::Internal { count, .. } => write!(f, "{}", count)?,
            }
        }
        Ok(())
    }
}
