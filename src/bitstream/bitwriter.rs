use std::io::{Error, ErrorKind, Write};

use log::trace;

/// Packs bit strings of any length into bytes, least significant bit first, and hands each
/// completed byte to the underlying sink. Call finish() (or drop the writer) to put out the
/// last partial byte; its unused high bits are zero.
pub struct BitWriter<W: Write> {
    /// Handle to the output stream
    sink: W,
    /// Byte being filled. Bits land from the least significant end up.
    current: u8,
    /// Count of valid bits in current (0-7).
    used: u8,
    /// Count of full bytes handed to the sink.
    bytes_out: u64,
    /// Set once the last byte has gone out.
    finished: bool,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter on top of the sink. Nothing is written until a byte fills up.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            current: 0,
            used: 0,
            bytes_out: 0,
            finished: false,
        }
    }

    /// Append the low `count` bits of `bits`, lowest bit first. A count of 0 writes nothing.
    pub fn write(&mut self, bits: u64, count: u32) -> Result<(), Error> {
        if count > 64 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("cannot write {} bits from a 64 bit word", count),
            ));
        }
        if self.finished {
            return Err(Error::new(ErrorKind::Other, "bit writer already finished"));
        }
        let mut bits = if count < 64 { bits & ((1_u64 << count) - 1) } else { bits };
        let mut remaining = count as u8;
        while remaining > 0 {
            // Fill as much of the current byte as we can
            let take = (8 - self.used).min(remaining);
            let piece = (bits & ((1_u64 << take) - 1)) as u8;
            self.current |= piece << self.used;
            self.used += take;
            bits >>= take;
            remaining -= take;
            if self.used == 8 {
                self.push_byte()?;
            }
        }
        Ok(())
    }

    /// Append the first `count` bits of a packed bit string, lowest bit of each byte first.
    pub fn write_bytes(&mut self, data: &[u8], count: usize) -> Result<(), Error> {
        if count > data.len() * 8 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("{} bits requested from {} bytes", count, data.len()),
            ));
        }
        let mut remaining = count;
        for &byte in data {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(8);
            self.write(byte as u64, take as u32)?;
            remaining -= take;
        }
        Ok(())
    }

    /// Hand the current byte to the sink and start a new one. A failed write ends the
    /// writer: later writes are refused and nothing more goes to the sink.
    fn push_byte(&mut self) -> Result<(), Error> {
        if let Err(e) = self.sink.write_all(&[self.current]) {
            self.finished = true;
            return Err(e);
        }
        self.bytes_out += 1;
        self.current = 0;
        self.used = 0;
        Ok(())
    }

    /// Put out the remaining bits (1-7), padded with zeros in the most significant bits,
    /// and flush the sink. Only the first call does anything.
    pub fn finish(&mut self) -> Result<(), Error> {
        if self.finished {
            return Ok(());
        }
        // Mark first so a failed write is not retried when we are dropped.
        self.finished = true;
        if self.used > 0 {
            trace!("Padding last byte with {} zero bits", 8 - self.used);
            self.push_byte()?;
        }
        self.sink.flush()
    }

    /// Number of bytes handed to the sink so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_out
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.bytes_out, self.used)
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if !self.finished {
            // Nobody is left to report to; the caller should have used finish() to see errors.
            let _ = self.finish();
        }
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;

    fn written(calls: &[(u64, u32)]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut bw = BitWriter::new(&mut out);
            for &(bits, count) in calls {
                bw.write(bits, count).unwrap();
            }
            bw.finish().unwrap();
        }
        out
    }

    #[test]
    fn full_byte_test() {
        assert_eq!(written(&[(0b10101100, 8)]), vec![0b10101100]);
    }

    #[test]
    fn short_byte_test() {
        assert_eq!(written(&[(0b10101100, 5)]), vec![0b00001100]);
    }

    #[test]
    fn eight_then_four_test() {
        assert_eq!(
            written(&[(0b10101100, 8), (0b1111_0001, 4)]),
            vec![0b10101100, 0b0000_0001]
        );
    }

    #[test]
    fn crossing_byte_boundary() {
        // 3 bits, then 7 bits that straddle the first byte, then 6 more
        let out = written(&[(0b101, 3), (0b1100111, 7), (0b111111, 6)]);
        assert_eq!(out, vec![0b0011_1101, 0b1111_1111]);
    }

    #[test]
    fn zero_count_is_noop() {
        assert_eq!(written(&[(0xff, 0)]), Vec::<u8>::new());
        assert_eq!(written(&[(0b1, 1), (0xff, 0), (0b1, 1)]), vec![0b11]);
    }

    #[test]
    fn wide_writes() {
        let out = written(&[(0x0123_4567_89ab_cdef, 64), (0b1, 1)]);
        assert_eq!(
            out,
            vec![0xef, 0xcd, 0xab, 0x89, 0x67, 0x45, 0x23, 0x01, 0x01]
        );
        let out = written(&[(0b1, 1), (u64::MAX, 64)]);
        assert_eq!(out, vec![0xff; 8].into_iter().chain([0x01]).collect::<Vec<u8>>());
    }

    #[test]
    fn too_many_bits_is_an_error() {
        let mut out = Vec::new();
        let mut bw = BitWriter::new(&mut out);
        assert!(bw.write(0, 65).is_err());
        assert!(bw.write_bytes(&[0], 9).is_err());
    }

    #[test]
    fn write_bytes_test() {
        let cases: [(&[u8], usize, &[u8]); 4] = [
            (&[0b10101100], 8, &[0b10101100]),
            (&[0b10101100], 5, &[0b00001100]),
            (&[0b10101100, 0b11010001], 16, &[0b10101100, 0b11010001]),
            (&[0b10101100, 0b11010001], 12, &[0b10101100, 0b00000001]),
        ];
        for (data, count, expect) in cases {
            let mut out = Vec::new();
            {
                let mut bw = BitWriter::new(&mut out);
                bw.write_bytes(data, count).unwrap();
            }
            assert_eq!(out, expect);
        }
    }

    #[test]
    fn drop_flushes_once() {
        let mut out = Vec::new();
        {
            let mut bw = BitWriter::new(&mut out);
            bw.write(0b11, 2).unwrap();
            bw.finish().unwrap();
            bw.finish().unwrap();
            assert!(bw.write(1, 1).is_err());
        }
        assert_eq!(out, vec![0b11]);
    }

    #[test]
    fn nothing_written_means_no_bytes() {
        let mut out = Vec::new();
        drop(BitWriter::new(&mut out));
        assert!(out.is_empty());
    }

    #[test]
    fn every_split_round_trips() {
        // Write a 40 bit pattern as two pieces split at every position and read it back
        let pattern: u64 = 0xA5_3C_96_E1_7B;
        for first in 0..=40_u32 {
            let lo = pattern & ((1_u64 << first) - 1);
            let hi = pattern >> first;
            let out = written(&[(lo, first), (hi, 40 - first)]);
            assert_eq!(out.len(), 5);
            let back = out
                .iter()
                .enumerate()
                .fold(0_u64, |acc, (i, &b)| acc | (b as u64) << (8 * i));
            assert_eq!(back, pattern, "split at {}", first);
        }
    }

    /// Sink that fails every write and counts the attempts.
    struct Broken {
        attempts: usize,
    }

    impl std::io::Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            self.attempts += 1;
            Err(std::io::Error::new(std::io::ErrorKind::Other, "broken pipe"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_finish_is_not_retried_on_drop() {
        let mut sink = Broken { attempts: 0 };
        {
            let mut bw = BitWriter::new(&mut sink);
            bw.write(0b101, 3).unwrap();
            assert!(bw.finish().is_err());
            assert!(bw.finish().is_ok());
        }
        assert_eq!(sink.attempts, 1);
    }

    #[test]
    fn failed_byte_stops_the_writer() {
        let mut sink = Broken { attempts: 0 };
        {
            let mut bw = BitWriter::new(&mut sink);
            // The first byte fills up part way through and its write fails
            assert!(bw.write(0xfff, 12).is_err());
            assert!(bw.write(1, 1).is_err());
        }
        assert_eq!(sink.attempts, 1);
    }

    #[test]
    fn loc_test() {
        let mut out = Vec::new();
        let mut bw = BitWriter::new(&mut out);
        bw.write(0, 13).unwrap();
        assert_eq!(bw.loc(), "[1.5]");
        assert_eq!(bw.bytes_written(), 1);
    }
}
