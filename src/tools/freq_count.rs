use std::io::{ErrorKind, Read};

use log::debug;
use rayon::prelude::*;

/// Occurrence count of every byte value, indexed by the byte.
pub type FreqTable = [u64; 256];

/// Size of each read from the source while counting.
const READ_SIZE: usize = 64 * 1024;

/// Returns a frequency count of the input data. Uses parallelism when data set is over 64k.
pub fn freqs(data: &[u8]) -> FreqTable {
    if data.len() > 64_000 {
        // 16k is pretty much the sweet spot for chunk size.
        data.par_chunks(16_000)
            .fold(
                || [0_u64; 256],
                |mut freqs, chunk| {
                    chunk.iter().for_each(|&el| freqs[el as usize] += 1);
                    freqs
                },
            )
            .reduce(
                || [0_u64; 256],
                |mut s, f| {
                    s.iter_mut().zip(f.iter()).for_each(|(a, b)| *a += b);
                    s
                },
            )
    } else {
        let mut freqs = [0_u64; 256];
        data.iter().for_each(|&el| freqs[el as usize] += 1);
        freqs
    }
}

/// Count every byte from the current position of the source to its end. The source is
/// left at its end; repositioning it for another pass is up to the caller.
pub fn count_frequencies<R: Read>(source: &mut R) -> std::io::Result<FreqTable> {
    let mut table = [0_u64; 256];
    let mut buf = vec![0_u8; READ_SIZE];
    let mut total = 0_u64;
    loop {
        let got = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        let chunk = freqs(&buf[..got]);
        table.iter_mut().zip(chunk.iter()).for_each(|(a, b)| *a += b);
        total += got as u64;
    }
    debug!(
        "Counted {} bytes, {} distinct values",
        total,
        table.iter().filter(|&&c| c > 0).count()
    );
    Ok(table)
}
