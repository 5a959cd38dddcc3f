//! Turns the tree into per-byte codes.
//!
//! A code is the path from the root to its leaf: 0 for each left edge, 1 for each
//! right edge. Bits are stored root-edge first, least significant bit first in each
//! byte, which is the order the BitWriter puts them on the stream.

use log::trace;

use super::tree::{HuffmanTree, Node};
use crate::tools::freq_count::FreqTable;

/// Longest code the table can hold. A tree with 256 leaves is at most 255 edges deep.
pub const MAX_CODE_BITS: usize = 256;

/// One bit code of up to MAX_CODE_BITS bits.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Code {
    bits: [u8; MAX_CODE_BITS / 8],
    len: u16,
}

impl Code {
    /// The zero length code.
    pub fn empty() -> Self {
        Code {
            bits: [0; MAX_CODE_BITS / 8],
            len: 0,
        }
    }

    /// This code with one more bit on the end.
    pub fn with_bit(&self, bit: bool) -> Self {
        let len = self.len as usize;
        assert!(len < MAX_CODE_BITS, "code longer than {} bits", MAX_CODE_BITS);
        let mut next = *self;
        if bit {
            next.bits[len / 8] |= 1_u8 << (len % 8);
        }
        next.len += 1;
        next
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bit(&self, index: usize) -> bool {
        index < self.len() && (self.bits[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Packed bits, just long enough to hold the code.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits[..(self.len() + 7) / 8]
    }
}

impl std::fmt::Debug for Code {
    /// Prints the bits in stream order, e.g. `Code(011)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Code(")?;
        for i in 0..self.len() {
            write!(f, "{}", self.bit(i) as u8)?;
        }
        write!(f, ")")
    }
}

/// Code for every byte value that occurs in the input.
#[derive(Clone, Debug)]
pub struct CodeTable {
    codes: [Option<Code>; 256],
}

impl CodeTable {
    /// Walk the tree once and record the code of each leaf. A tree made of a single leaf
    /// has no edges, so that byte gets the one bit code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes: [Option<Code>; 256] = [None; 256];
        let mut stack: Vec<(&Node, Code)> = Vec::new();

        match tree.root() {
            None => {}
            Some(Node::Leaf { symbol, .. }) => {
                codes[*symbol as usize] = Some(Code::empty().with_bit(false));
            }
            Some(Node::Internal { left, right, .. }) => {
                stack.push((right.as_ref(), Code::empty().with_bit(true)));
                stack.push((left.as_ref(), Code::empty().with_bit(false)));
            }
        }

        while let Some((node, code)) = stack.pop() {
            match node {
                Node::Leaf { symbol, .. } => {
                    trace!("{:>3}: {:?}", symbol, code);
                    codes[*symbol as usize] = Some(code);
                }
                Node::Internal { left, right, .. } => {
                    stack.push((right.as_ref(), code.with_bit(true)));
                    stack.push((left.as_ref(), code.with_bit(false)));
                }
            }
        }
        CodeTable { codes }
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// (byte, code) for every byte that has a code.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol as u8, c)))
    }

    /// Total payload size in bits for the given counts.
    pub fn encoded_bits(&self, freqs: &FreqTable) -> u64 {
        self.iter()
            .map(|(symbol, code)| code.len() as u64 * freqs[symbol as usize])
            .sum()
    }
}
