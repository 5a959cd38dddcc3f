use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Seek, Write};

use log::{info, warn};

use super::encoder::{EncodeSummary, HuffmanEncoder};
use crate::error::HuffError;
use crate::tools::cli::HuffOpts;

/// Compress the input defined in opts <HuffOpts>. A file is read in place; standard input
/// is buffered in memory first since it has to be read twice.
pub fn compress(opts: &HuffOpts) -> Result<(), HuffError> {
    match &opts.file {
        Some(name) => {
            let fin = File::open(name)?;
            let encoder = HuffmanEncoder::new(BufReader::new(fin))?;
            deliver(encoder, opts)
        }
        None => {
            let encoder = HuffmanEncoder::buffered(io::stdin().lock())?;
            deliver(encoder, opts)
        }
    }
}

/// Print the tree, or write the compressed stream where the options say.
fn deliver<R: Read + Seek>(
    mut encoder: HuffmanEncoder<R>,
    opts: &HuffOpts,
) -> Result<(), HuffError> {
    if opts.print_tree {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", encoder.tree())?;
        return Ok(());
    }

    let summary = match opts.target_path() {
        None => encoder.encode_to(BufWriter::new(io::stdout().lock()))?,
        Some(path) => {
            let f_out = create_output(&path, opts.force)?;
            match encoder.encode_to(BufWriter::new(f_out)) {
                Ok(summary) => summary,
                Err(e) => {
                    // Don't leave a truncated stream behind
                    warn!("Removing incomplete output {}", path);
                    let _ = fs::remove_file(&path);
                    return Err(e);
                }
            }
        }
    };
    report(&summary);
    Ok(())
}

/// Open the output file, refusing to replace an existing one unless forced.
fn create_output(path: &str, force: bool) -> Result<File, HuffError> {
    if force {
        return Ok(File::create(path)?);
    }
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => HuffError::OutputExists(path.to_string()),
            _ => HuffError::Io(e),
        })
}

fn report(summary: &EncodeSummary) {
    if summary.input_bytes == 0 {
        info!("No input, wrote {} bytes of header", summary.output_bytes);
        return;
    }
    let ratio = summary.input_bytes as f64 / summary.output_bytes as f64;
    let bits_per_byte = 8.0 * summary.output_bytes as f64 / summary.input_bytes as f64;
    let saved = 100.0 * (1.0 - summary.output_bytes as f64 / summary.input_bytes as f64);
    info!(
        "{:.3}:1, {:.3} bits/byte, {:.2}% saved, {} in, {} out.",
        ratio, bits_per_byte, saved, summary.input_bytes, summary.output_bytes
    );
}
