//! Reference decoder used by the tests to check that encoded streams round trip.

use super::encoder::{MAGIC, RECORD_SIZE};
use crate::huffman_coding::tree::Node;

/// Reads bits least significant first, the order the BitWriter puts them down.
struct BitReader<'a> {
    data: &'a [u8],
    bit: usize,
}

impl<'a> BitReader<'a> {
    fn read_bit(&mut self) -> bool {
        let byte = self.data[self.bit / 8];
        let bit = (byte >> (self.bit % 8)) & 1 == 1;
        self.bit += 1;
        bit
    }
}

/// Rebuild the tree from preorder records. Returns the root and the bytes consumed,
/// including the footer.
fn read_tree(data: &[u8]) -> (Option<Node>, usize) {
    let mut records = Vec::new();
    let mut pos = 0;
    loop {
        let record = u64::from_le_bytes(data[pos..pos + RECORD_SIZE].try_into().unwrap());
        pos += RECORD_SIZE;
        if record == 0 {
            break;
        }
        records.push(record);
    }

    // Walk the records backwards: every internal node takes the two subtrees built
    // right after it, which sit on top of the stack with the left one uppermost.
    let mut stack: Vec<Node> = Vec::new();
    for &record in records.iter().rev() {
        let count = (record >> 1) & ((1 << 55) - 1);
        if record & 1 == 1 {
            stack.push(Node::leaf((record >> 56) as u8, count));
        } else {
            let left = stack.pop().expect("internal node without left child");
            let right = stack.pop().expect("internal node without right child");
            let node = Node::internal(left, right);
            assert_eq!(node.count(), count);
            stack.push(node);
        }
    }
    assert!(stack.len() <= 1, "records hold more than one tree");
    (stack.pop(), pos)
}

/// Decode a whole compressed stream. The root count says how many bytes to produce.
pub fn decode(data: &[u8]) -> Vec<u8> {
    assert_eq!(&data[..MAGIC.len()], &MAGIC, "bad magic");
    let (root, used) = read_tree(&data[MAGIC.len()..]);
    let payload = &data[MAGIC.len() + used..];
    let root = match root {
        Some(root) => root,
        None => {
            assert!(payload.is_empty());
            return Vec::new();
        }
    };

    let mut reader = BitReader {
        data: payload,
        bit: 0,
    };
    let mut out = Vec::with_capacity(root.count() as usize);
    for _ in 0..root.count() {
        let mut node = &root;
        if let Node::Leaf { symbol, .. } = node {
            // A lone leaf is written as one zero bit per byte
            assert!(!reader.read_bit());
            out.push(*symbol);
            continue;
        }
        while let Node::Internal { left, right, .. } = node {
            node = if reader.read_bit() { right.as_ref() } else { left.as_ref() };
        }
        if let Node::Leaf { symbol, .. } = node {
            out.push(*symbol);
        }
    }
    // Only zero padding may follow the last code
    assert!(reader.bit + 8 > payload.len() * 8, "trailing payload bytes");
    out
}
