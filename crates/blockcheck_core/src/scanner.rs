//! Chunked zero-scan over any [`Read`] source.
//!
//! The scanner pulls one chunk at a time into a single reused buffer and stops
//! at the first chunk holding a non-zero byte, so a dirty multi-gigabyte
//! device usually costs a single read.

use crate::options::ScanOptions;
use std::io::{self, ErrorKind, Read};
use std::iter;

/// Result of a complete scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Every byte up to end-of-stream was zero.
    Empty { bytes_scanned: u64 },
    /// A non-zero byte was found at `offset`; nothing after its chunk was read.
    Dirty { offset: u64 },
}

impl ScanOutcome {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, ScanOutcome::Empty { .. })
    }
}

/// Returns true if `buf` contains only zero bytes. An empty slice is zeroed.
#[inline]
pub fn is_zeroed(buf: &[u8]) -> bool {
    buf.iter().all(|&b| b == 0)
}

/// Index of the first non-zero byte in `buf`, if any.
#[inline]
pub fn first_nonzero(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b != 0)
}

/// Scans `reader` with [`ScanOptions::default`].
pub fn is_empty<R: Read>(reader: R) -> io::Result<bool> {
    is_empty_with(reader, &ScanOptions::default())
}

/// Returns `Ok(true)` if `reader` yields only zero bytes until end-of-stream.
///
/// Read errors are returned exactly as the reader produced them; an error
/// carries no verdict about emptiness.
pub fn is_empty_with<R: Read>(reader: R, options: &ScanOptions) -> io::Result<bool> {
    scan(reader, options).map(|outcome| outcome.is_empty())
}

/// Scans `reader` chunk by chunk and reports where the first data lives.
///
/// # Errors
///
/// - `ErrorKind::InvalidInput` wrapping [`crate::CheckError::InvalidChunkSize`] when
///   `options.chunk_size` is zero or above [`crate::MAX_CHUNK_SIZE`].
/// - Any error returned by `reader.read`, other than `Interrupted`, which is
///   retried.
pub fn scan<R: Read>(mut reader: R, options: &ScanOptions) -> io::Result<ScanOutcome> {
    options
        .validate()
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e))?;

    let mut buffer = vec![0u8; options.chunk_size];
    let mut offset: u64 = 0;

    // Each item is the dirty offset of one chunk (None if the chunk is zeroed).
    let chunks = iter::from_fn(|| match read_chunk(&mut reader, &mut buffer) {
        Ok(0) => None,
        Ok(n) => {
            let chunk = &buffer[..n];
            let base = offset;
            offset += n as u64;
            tracing::trace!(offset = base, len = n, "read chunk");

            Some(Ok(first_nonzero(chunk).map(|i| base + i as u64)))
        }
        Err(e) => Some(Err(e)),
    });

    let dirty = chunks
        .filter_map(|chunk| chunk.transpose())
        .next()
        .transpose()?;

    let outcome = match dirty {
        Some(offset) => ScanOutcome::Dirty { offset },
        None => ScanOutcome::Empty {
            bytes_scanned: offset,
        },
    };
    tracing::debug!(?outcome, "scan finished");

    Ok(outcome)
}

fn read_chunk<R: Read>(reader: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buffer) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}
