//! Core logic for deciding whether a byte stream holds nothing but zeros.
//!
//! This crate performs no OS calls of its own: everything works over
//! [`std::io::Read`], so devices, image files, decompressors and in-memory
//! buffers are all scanned the same way.

mod error;
mod options;
pub mod scanner;

pub use error::{CheckError, Result};
pub use options::{ScanOptions, DEFAULT_CHUNK_SIZE, GIB, KIB, MAX_CHUNK_SIZE, MIB};
pub use scanner::{first_nonzero, is_empty, is_empty_with, is_zeroed, scan, ScanOutcome};
