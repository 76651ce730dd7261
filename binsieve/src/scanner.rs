//! Streaming pattern search over a bounded read buffer.
//!
//! Both scan variants read a file chunk by chunk and retain a tail of the
//! previous chunk so a match straddling two reads is never missed. The tail
//! size is the single invariant of the cursor: `pattern_len - 1` bytes for
//! byte patterns, `ceil(bit_len / 8)` bytes for bit patterns.

use std::io::{self, Read};
use tracing::trace;

use crate::errors::ScanResult;
use crate::pattern::{BitPattern, BytePattern};

/// New bytes requested per read on top of the carried tail
pub(crate) const CHUNK_SIZE: usize = 1024;

/// Bounded read window plus the carry-over discipline. Owned exclusively by
/// one scan invocation and discarded when the scan completes.
struct ScanCursor {
    buf: Vec<u8>,
    filled: usize,
    carry: usize,
    /// Absolute file offset of `buf[0]`
    base: u64,
}

impl ScanCursor {
    fn new(carry: usize) -> Self {
        ScanCursor {
            buf: vec![0; CHUNK_SIZE + carry],
            filled: 0,
            carry,
            base: 0,
        }
    }

    /// Reads more bytes after the retained tail. Returns the number of new
    /// bytes; 0 means end of input.
    fn fill<R: Read>(&mut self, reader: &mut R) -> io::Result<usize> {
        let n = reader.read(&mut self.buf[self.filled..])?;
        self.filled += n;
        Ok(n)
    }

    fn window(&self) -> &[u8] {
        &self.buf[..self.filled]
    }

    /// Discards consumed bytes, keeping the last `carry` bytes at the front
    /// of the buffer for the next read.
    fn slide(&mut self) {
        if self.filled > self.carry {
            let consumed = self.filled - self.carry;
            self.buf.copy_within(consumed..self.filled, 0);
            self.base += consumed as u64;
            self.filled = self.carry;
        }
    }
}

/// Finds the first occurrence of a byte pattern, comparing every window
/// against either encoding. Returns the absolute byte offset of the match,
/// or `None` once the source is exhausted.
pub fn scan_bytes<R: Read>(reader: &mut R, pattern: &BytePattern) -> ScanResult<Option<u64>> {
    let len = pattern.len();
    debug_assert!(len > 0, "zero-length patterns are rejected by the codec");

    let mut cursor = ScanCursor::new(len - 1);
    loop {
        let n = cursor.fill(reader)?;
        let window = cursor.window();
        if window.len() >= len {
            for i in 0..=window.len() - len {
                if pattern.matches(&window[i..i + len]) {
                    let offset = cursor.base + i as u64;
                    trace!(offset, "byte pattern matched");
                    return Ok(Some(offset));
                }
            }
        }
        if n == 0 {
            return Ok(None);
        }
        cursor.slide();
    }
}

/// Finds the first occurrence of a bit pattern, checking every bit offset,
/// byte-aligned or not. Returns the absolute bit offset of the match, where
/// bit 0 is the most significant bit of the first byte.
pub fn scan_bits<R: Read>(reader: &mut R, pattern: &BitPattern) -> ScanResult<Option<u64>> {
    let bit_len = pattern.bit_len();
    debug_assert!(bit_len > 0, "zero-length patterns are rejected by the codec");

    let mut cursor = ScanCursor::new(pattern.carry_bytes());
    loop {
        let n = cursor.fill(reader)?;
        let window = cursor.window();
        let total_bits = window.len() * 8;
        if total_bits >= bit_len {
            for i in 0..=total_bits - bit_len {
                if bits_match(window, i, pattern) {
                    let offset = cursor.base * 8 + i as u64;
                    trace!(bit_offset = offset, "bit pattern matched");
                    return Ok(Some(offset));
                }
            }
        }
        if n == 0 {
            return Ok(None);
        }
        cursor.slide();
    }
}

fn bit_at(bytes: &[u8], index: usize) -> u8 {
    (bytes[index / 8] >> (7 - index % 8)) & 1
}

fn bits_match(window: &[u8], start: usize, pattern: &BitPattern) -> bool {
    pattern
        .bits()
        .iter()
        .enumerate()
        .all(|(j, &bit)| bit_at(window, start + j) == bit)
}
