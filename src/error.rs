//! Errors raised while compressing a stream.
//!
//! I/O failures are never recovered locally; they abort the whole encode and are handed
//! back to the caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffError {
    /// Reading the input or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A node count does not fit the 55 bit count field of a tree record.
    #[error("count {count} for {symbol:?} does not fit a 55 bit tree record")]
    CountOverflow {
        /// Byte value of the leaf, or None for an internal node
        symbol: Option<u8>,
        count: u64,
    },

    /// The second pass found a byte value the first pass never counted.
    #[error("input changed between passes: byte {symbol} has no code")]
    SourceChanged { symbol: u8 },

    /// The second pass read a different number of bytes than the first one counted.
    #[error("input changed between passes: counted {counted} bytes, encoded {encoded}")]
    SourceLength { counted: u64, encoded: u64 },

    /// The output file is already there and --force was not given.
    #[error("output file {0} already exists (use --force to overwrite)")]
    OutputExists(String),

    #[error("unable to start logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}
