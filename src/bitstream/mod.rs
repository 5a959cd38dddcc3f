//! The bitstream module forms the output side of huffpack.
//!
//! Huffman codes are variable length, so the payload cannot be written a byte at a time.
//! The BitWriter accepts codes of any length, packs them least significant bit first and
//! passes each completed byte straight to the underlying writer.
//!
pub mod bitwriter;
