//! Device-level tests.
//!
//! The loopback cases format an image with the system `mkfs.*` tools and
//! attach it with `losetup`. They return early (and pass) when the tools are
//! missing or the test does not run as root.

use blockcheck::{
    is_block_device, is_block_device_empty, scan_block_device, scan_path, CheckError,
    ScanOptions, ScanOutcome, KIB, MIB,
};
use rstest::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

// ============================================================================
// Harness
// ============================================================================

/// Runs `cmd`, returning false if it is missing or exits unsuccessfully.
fn run(cmd: &str, args: &[&str], path: &Path) -> bool {
    match Command::new(cmd).args(args).arg(path).output() {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            eprintln!(
                "{cmd} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            false
        }
        Err(e) => {
            eprintln!("skipping, cannot run {cmd}: {e}");
            false
        }
    }
}

/// Creates a sparse zeroed image of `size` bytes.
fn zeroed_image(dir: &TempDir, name: &str, size: usize) -> PathBuf {
    let path = dir.path().join(name);
    let file = File::create(&path).unwrap();
    file.set_len(size as u64).unwrap();
    file.sync_all().unwrap();
    path
}

/// Loop device attached to an image file, detached on drop.
struct LoopDevice {
    path: PathBuf,
}

impl LoopDevice {
    fn attach(image: &Path) -> Option<Self> {
        let output = Command::new("losetup")
            .args(["--find", "--show"])
            .arg(image)
            .output()
            .ok()?;

        if !output.status.success() {
            eprintln!(
                "skipping, failed to create loopback device: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        let path = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        Some(Self { path })
    }
}

impl Drop for LoopDevice {
    fn drop(&mut self) {
        let _ = Command::new("losetup").arg("-d").arg(&self.path).status();
    }
}

// ============================================================================
// Regular files and other non-block targets
// ============================================================================

#[fixture]
fn zeroed_regular_file() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test-file");
    let mut file = File::create(&path).unwrap();
    file.write_all(&vec![0u8; 256 * KIB]).unwrap();
    file.sync_all().unwrap();
    (dir, path)
}

#[rstest]
fn test_normal_file_not_block_device(zeroed_regular_file: (TempDir, PathBuf)) {
    let (_dir, path) = zeroed_regular_file;

    let result = is_block_device_empty(&path);
    assert!(matches!(result, Err(CheckError::NotBlockDevice(ref p)) if *p == path));
    assert!(!result.unwrap_or(false));
}

#[rstest]
fn test_normal_file_unreadable_still_rejected(zeroed_regular_file: (TempDir, PathBuf)) {
    // A file we cannot open is reported as "not a block device" rather than
    // an I/O error. Root ignores mode 0o000, so under root this only checks
    // the error kind; test_fifo_rejected_without_open covers that case.
    let (_dir, path) = zeroed_regular_file;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
    }

    let err = scan_block_device(&path, &ScanOptions::default()).unwrap_err();
    assert!(err.is_not_block_device());
}

#[cfg(unix)]
#[test]
fn test_fifo_rejected_without_open() {
    // Opening a FIFO for reading blocks until a writer appears, so reaching
    // the assertion proves the type check ran before any open, even as root.
    let dir = TempDir::new().unwrap();
    let fifo = dir.path().join("fifo");
    if !run("mkfifo", &[], &fifo) {
        return;
    }

    for allow_regular in [false, true] {
        let err = scan_path(&fifo, &ScanOptions::default(), allow_regular).unwrap_err();
        assert!(err.is_not_block_device());
    }
    assert!(is_block_device_empty(&fifo).unwrap_err().is_not_block_device());
}

#[rstest]
fn test_normal_file_scanned_when_allowed(zeroed_regular_file: (TempDir, PathBuf)) {
    let (_dir, path) = zeroed_regular_file;
    let outcome = scan_path(&path, &ScanOptions::default(), true).unwrap();
    assert_eq!(
        outcome,
        ScanOutcome::Empty {
            bytes_scanned: (256 * KIB) as u64
        }
    );
}

#[cfg(unix)]
#[test]
fn test_symlink_to_regular_file_rejected() {
    let dir = TempDir::new().unwrap();
    let target = zeroed_image(&dir, "image", 4 * KIB);
    let link = dir.path().join("link");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    assert!(!is_block_device(&link).unwrap());
    assert!(is_block_device_empty(&link).unwrap_err().is_not_block_device());
}

// ============================================================================
// Formatted images
// ============================================================================

#[rstest]
#[case::ext4("mkfs.ext4", &["-F"], 256 * KIB)]
#[case::ext3("mkfs.ext3", &["-F"], 256 * KIB)]
#[case::xfs("mkfs.xfs", &["-f"], 300 * MIB)]
#[case::btrfs("mkfs.btrfs", &["-f"], 1024 * MIB)]
fn test_formatted_image_not_empty(
    #[case] mkfs: &str,
    #[case] args: &[&str],
    #[case] size: usize,
) {
    let dir = TempDir::new().unwrap();
    let image = zeroed_image(&dir, "fs.img", size);
    if !run(mkfs, args, &image) {
        return;
    }

    let outcome = scan_path(&image, &ScanOptions::default(), true).unwrap();
    assert!(!outcome.is_empty(), "{mkfs} image reported empty");
}

// ============================================================================
// Loopback devices
// ============================================================================

#[rstest]
#[case::ext4(Some(("mkfs.ext4", &["-F"][..])), 256 * KIB, false)]
#[case::ext3(Some(("mkfs.ext3", &["-F"][..])), 256 * KIB, false)]
#[case::xfs(Some(("mkfs.xfs", &["-f"][..])), 300 * MIB, false)]
#[case::btrfs(Some(("mkfs.btrfs", &["-f"][..])), 1024 * MIB, false)]
#[case::no_fs(None, 256 * KIB, true)]
fn test_loopback_device(
    #[case] init: Option<(&str, &[&str])>,
    #[case] size: usize,
    #[case] want_empty: bool,
) {
    let dir = TempDir::new().unwrap();
    let image = zeroed_image(&dir, "loop.img", size);

    if let Some((mkfs, args)) = init {
        if !run(mkfs, args, &image) {
            return;
        }
    }

    let Some(device) = LoopDevice::attach(&image) else {
        return;
    };

    assert!(is_block_device(&device.path).unwrap());
    let got = is_block_device_empty(&device.path).unwrap();
    assert_eq!(got, want_empty, "{}", device.path.display());
}
