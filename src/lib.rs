//! Pre-flight check that a block device contains only zero bytes.
//!
//! ```ignore
//! if blockcheck::is_block_device_empty("/dev/sdb")? {
//!     // never written, safe to provision
//! }
//! ```

pub use blockcheck_core::{
    first_nonzero, is_empty, is_empty_with, is_zeroed, scan, CheckError, Result, ScanOptions,
    ScanOutcome, DEFAULT_CHUNK_SIZE, GIB, KIB, MAX_CHUNK_SIZE, MIB,
};
pub use blockcheck_io::{
    is_block_device, is_block_device_empty, is_block_device_empty_with, open_block_device,
    scan_block_device, scan_path,
};
