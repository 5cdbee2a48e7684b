use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("{} is not a block device", .0.display())]
    NotBlockDevice(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid chunk size: {0} (must be between 1 and 1 GiB)")]
    InvalidChunkSize(usize),
}

impl CheckError {
    #[inline]
    pub fn is_not_block_device(&self) -> bool {
        matches!(self, CheckError::NotBlockDevice(_))
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
