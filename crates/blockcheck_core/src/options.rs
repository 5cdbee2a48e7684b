//! Scan options

use crate::error::{CheckError, Result};

pub const KIB: usize = 1024;
pub const MIB: usize = 1024 * KIB;
pub const GIB: usize = 1024 * MIB;

/// Read size used when no other is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 4 * KIB;

/// Largest accepted chunk size; the whole chunk is allocated up front.
pub const MAX_CHUNK_SIZE: usize = GIB;

/// Options for scanning a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Bytes requested per read; bounds memory use of a scan
    pub chunk_size: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ScanOptions {
    /// Sets the chunk size
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(CheckError::InvalidChunkSize(self.chunk_size));
        }
        Ok(())
    }
}
