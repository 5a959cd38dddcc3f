//! The huffman module builds the prefix code for huffpack.
//!
//! A single Huffman tree covers the whole input. It is built from the byte counts with a
//! two-queue merge, which needs no priority queue and breaks ties the same way every time.
//! The tree is written into the output, so its exact shape matters: any change to the tie
//! rules changes the bytes on disk.
//!
//! The code table is derived from the tree once and only read while the payload is written.
//!

pub mod code_table;
pub mod tree;
