//! The compression module manages the compression side of huffpack.
//!
//! Compression happens in the following steps:
//! - Frequency count: read the input once and count every byte value.
//! - Huffman tree: merge the counts into a prefix-code tree.
//! - Code table: derive the bit code of every byte from the tree.
//! - Output: write the magic header, the tree in preorder and then every input byte's code.
//!
//! There is no decompressor. The tests carry a small reference decoder to prove that the
//! output holds everything needed to restore the input.
//!

pub mod compress;
pub mod encoder;
#[cfg(test)]
mod oracle;
