//! Canonical Huffman compressor.
//!
//! Version 0.1.0
//!
//! Counts the bytes of the input, builds one Huffman tree for the whole stream and writes
//! the tree followed by the input re-encoded with the tree's codes.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> huffpack test.txt`
//!
//! This will compress the file and create the file test.txt.huff.
//! The original file is left in place.
//!
//! From code, `compression::encoder::HuffmanEncoder` does the same for any seekable source.
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;
