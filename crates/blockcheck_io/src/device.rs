//! Block device opener.
//!
//! Resolves a path to a read-only [`File`] after checking that it names a
//! block special file, then hands the file to the zero-scanner. The file is
//! owned by the calling function, so it is closed on every return path,
//! including early exit on the first non-zero byte.

use blockcheck_core::{scanner, CheckError, Result, ScanOptions, ScanOutcome};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetKind {
    Block,
    Regular,
    Other,
}

#[cfg(unix)]
fn target_kind(path: &Path) -> Result<TargetKind> {
    use rustix::fs::{stat, FileType};

    let stat = stat(path).map_err(io::Error::from)?;
    let kind = match FileType::from_raw_mode(stat.st_mode) {
        FileType::BlockDevice => TargetKind::Block,
        FileType::RegularFile => TargetKind::Regular,
        _ => TargetKind::Other,
    };
    Ok(kind)
}

#[cfg(not(unix))]
fn target_kind(_path: &Path) -> Result<TargetKind> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Block device detection is not supported on this platform",
    )
    .into())
}

fn open_read_only(path: &Path) -> Result<File> {
    let file = OpenOptions::new().read(true).write(false).open(path)?;

    #[cfg(target_os = "linux")]
    {
        use rustix::fs::{fadvise, Advice};

        let _ = fadvise(&file, 0, None, Advice::Sequential);
    }

    Ok(file)
}

/// Returns whether `path` names a block special file. Symlinks are followed.
pub fn is_block_device(path: impl AsRef<Path>) -> Result<bool> {
    Ok(target_kind(path.as_ref())? == TargetKind::Block)
}

/// Stats `path` once and opens it read-only if its type is accepted.
fn open_target(path: &Path, allow_regular: bool) -> Result<File> {
    match target_kind(path)? {
        TargetKind::Block => {
            tracing::debug!(path = %path.display(), "opening block device");
            open_read_only(path)
        }
        TargetKind::Regular if allow_regular => {
            tracing::debug!(path = %path.display(), "opening regular file");
            open_read_only(path)
        }
        _ => Err(CheckError::NotBlockDevice(path.to_path_buf())),
    }
}

fn scan_file(path: &Path, file: File, options: &ScanOptions) -> Result<ScanOutcome> {
    let outcome = scanner::scan(file, options)?;
    tracing::debug!(path = %path.display(), ?outcome, "device scanned");

    Ok(outcome)
}

/// Opens `path` read-only, failing with [`CheckError::NotBlockDevice`] if it
/// is not a block special file. Nothing is opened in that case.
pub fn open_block_device(path: impl AsRef<Path>) -> Result<File> {
    open_target(path.as_ref(), false)
}

/// Scans the block device at `path` and reports where its first data lives.
pub fn scan_block_device(path: impl AsRef<Path>, options: &ScanOptions) -> Result<ScanOutcome> {
    let path = path.as_ref();
    options.validate()?;

    let file = open_block_device(path)?;
    scan_file(path, file, options)
}

/// Returns `Ok(true)` if the block device at `path` contains only zero bytes.
///
/// # Errors
///
/// - [`CheckError::NotBlockDevice`] if `path` is anything but a block special
///   file; the target is not read.
/// - [`CheckError::Io`] carrying the unmodified error from `stat`, `open` or
///   `read`. No emptiness verdict accompanies an error.
///
/// # Example
///
/// ```ignore
/// if blockcheck_io::is_block_device_empty("/dev/sdb")? {
///     // safe to provision
/// }
/// ```
pub fn is_block_device_empty(path: impl AsRef<Path>) -> Result<bool> {
    is_block_device_empty_with(path, &ScanOptions::default())
}

pub fn is_block_device_empty_with(path: impl AsRef<Path>, options: &ScanOptions) -> Result<bool> {
    scan_block_device(path, options).map(|outcome| outcome.is_empty())
}

/// Like [`scan_block_device`], but regular files are scanned too when
/// `allow_regular` is set. Used for disk images.
pub fn scan_path(
    path: impl AsRef<Path>,
    options: &ScanOptions,
    allow_regular: bool,
) -> Result<ScanOutcome> {
    if !allow_regular {
        return scan_block_device(path, options);
    }

    let path = path.as_ref();
    options.validate()?;

    let file = open_target(path, true)?;
    scan_file(path, file, options)
}
