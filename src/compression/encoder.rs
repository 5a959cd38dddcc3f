//! Writes the `.huff` format.
//!
//! Layout, in order:
//! - 8 byte magic header (`MAGIC`)
//! - the tree in preorder, one little-endian u64 record per node: bit 0 is the leaf
//!   flag, bits 1-55 hold the count, and the top byte holds the leaf's byte value
//!   (zero for internal nodes)
//! - one all-zero u64 record closing the tree
//! - the payload: each input byte's code, packed least significant bit first
//!
//! The input is read twice, once to count and once to encode, so the source must be
//! seekable. Use `HuffmanEncoder::buffered` for sources that are not.

use std::io::{Cursor, ErrorKind, Read, Seek, SeekFrom, Write};

use log::{debug, info, trace};

use crate::bitstream::bitwriter::BitWriter;
use crate::error::HuffError;
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::tree::{HuffmanTree, Node};
use crate::tools::freq_count::{count_frequencies, FreqTable};

/// Signature at the start of every compressed stream.
pub const MAGIC: [u8; 8] = [0x7B, 0x68, 0x75, 0x7C, 0x6D, 0x7D, 0x66, 0x66];

/// Width of the count field in a tree record.
pub const COUNT_BITS: u32 = 55;

/// Largest count a tree record can carry.
pub const MAX_COUNT: u64 = (1 << COUNT_BITS) - 1;

/// Size of a tree record and of the closing footer.
pub const RECORD_SIZE: usize = 8;

const READ_SIZE: usize = 64 * 1024;

/// What one encode produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    pub input_bytes: u64,
    /// Tree records written, not counting the footer
    pub tree_records: usize,
    pub payload_bytes: u64,
    pub output_bytes: u64,
}

/// Compresses one source. The tree and codes are built once, when the encoder is created.
pub struct HuffmanEncoder<R> {
    source: R,
    freqs: FreqTable,
    tree: HuffmanTree,
    codes: CodeTable,
}

impl<R: Read + Seek> HuffmanEncoder<R> {
    /// Count the whole source, from offset 0, and build the tree and code table. The
    /// source's current position does not matter.
    pub fn new(mut source: R) -> Result<Self, HuffError> {
        source.seek(SeekFrom::Start(0))?;
        let freqs = count_frequencies(&mut source)?;
        let tree = HuffmanTree::from_frequencies(&freqs);
        let codes = CodeTable::from_tree(&tree);
        debug!(
            "Tree has {} nodes and height {}",
            tree.preorder().len(),
            tree.height()
        );
        Ok(Self {
            source,
            freqs,
            tree,
            codes,
        })
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    pub fn frequencies(&self) -> &FreqTable {
        &self.freqs
    }

    /// Write header, tree and payload to the sink. The tree's counts cover the whole
    /// source from offset 0, so the source is rewound to its start before the payload
    /// pass. If that pass reads a byte value or a byte total the count did not see, the
    /// encode fails with SourceChanged or SourceLength.
    pub fn encode_to<W: Write>(&mut self, mut sink: W) -> Result<EncodeSummary, HuffError> {
        let records = serialize_tree(&self.tree)?;
        sink.write_all(&MAGIC)?;
        sink.write_all(&records)?;
        trace!(
            "Wrote magic and {} bytes of tree records",
            records.len()
        );

        self.source.seek(SeekFrom::Start(0))?;
        let mut bw = BitWriter::new(&mut sink);
        let mut buf = vec![0_u8; READ_SIZE];
        let mut input_bytes = 0_u64;
        loop {
            let got = match self.source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            for &byte in &buf[..got] {
                let code = self
                    .codes
                    .get(byte)
                    .ok_or(HuffError::SourceChanged { symbol: byte })?;
                bw.write_bytes(code.as_bytes(), code.len())?;
            }
            input_bytes += got as u64;
        }
        let counted: u64 = self.freqs.iter().sum();
        if input_bytes != counted {
            return Err(HuffError::SourceLength {
                counted,
                encoded: input_bytes,
            });
        }
        debug!("Payload ends at {}", bw.loc());
        bw.finish()?;
        let payload_bytes = bw.bytes_written();
        drop(bw);
        sink.flush()?;

        let summary = EncodeSummary {
            input_bytes,
            tree_records: records.len() / RECORD_SIZE - 1,
            payload_bytes,
            output_bytes: (MAGIC.len() + records.len()) as u64 + payload_bytes,
        };
        info!(
            "{} bytes in, {} bytes out ({} tree records, {} payload bytes)",
            summary.input_bytes, summary.output_bytes, summary.tree_records, summary.payload_bytes
        );
        Ok(summary)
    }
}

impl HuffmanEncoder<Cursor<Vec<u8>>> {
    /// Read a source that cannot seek into memory, then count it.
    pub fn buffered<R: Read>(mut source: R) -> Result<Self, HuffError> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;
        debug!("Buffered {} bytes of unseekable input", data.len());
        Self::new(Cursor::new(data))
    }
}

/// Pack one node into its tree record.
pub fn node_record(node: &Node) -> Result<u64, HuffError> {
    let count = node.count();
    if count > MAX_COUNT {
        return Err(HuffError::CountOverflow {
            symbol: node.symbol(),
            count,
        });
    }
    let record = match node.symbol() {
        Some(symbol) => 1 | count << 1 | (symbol as u64) << 56,
        None => count << 1,
    };
    Ok(record)
}

/// Tree records in preorder (left before right) followed by the zero footer. An empty
/// tree is just the footer.
pub fn serialize_tree(tree: &HuffmanTree) -> Result<Vec<u8>, HuffError> {
    let nodes = tree.preorder();
    let mut out = Vec::with_capacity((nodes.len() + 1) * RECORD_SIZE);
    for node in nodes {
        let record = node_record(node)?;
        trace!("record {:016x}", record);
        out.extend_from_slice(&record.to_le_bytes());
    }
    out.extend_from_slice(&0_u64.to_le_bytes());
    Ok(out)
}

/// Compress a whole byte slice into a new buffer.
pub fn encode_bytes(data: &[u8]) -> Result<Vec<u8>, HuffError> {
    let mut encoder = HuffmanEncoder::new(Cursor::new(data))?;
    let mut out = Vec::new();
    encoder.encode_to(&mut out)?;
    Ok(out)
}
