/// File handling utilities
///
/// This module provides helpers for checking what a path points to, naming
/// files in log output, searching raw file bytes and hashing file content.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use memmap2::Mmap;
use sha2::{Digest, Sha256};

/// What a path refers to on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Nothing there (or it cannot be stat'ed)
    Missing,
    /// Directory, socket, device or other non-regular entry
    NotAFile,
    /// Regular file, possibly behind a symlink
    File,
}

/// Classify a path, following symlinks.
pub fn path_kind(path: &Path) -> PathKind {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => PathKind::File,
        Ok(_) => PathKind::NotAFile,
        Err(_) => PathKind::Missing,
    }
}

/// Final path component including its extension, used in "OK" lines
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Check whether the raw bytes of a file contain `marker`.
///
/// # Arguments
///
/// * `file_path` - Path to the file
/// * `marker` - Byte sequence to look for
///
/// # Returns
///
/// True if the marker occurs anywhere in the file
pub fn contains_marker(file_path: &Path, marker: &[u8]) -> io::Result<bool> {
    let file = File::open(file_path)?;
    let len = file.metadata()?.len();

    // Zero-length files cannot be mapped on every platform.
    if marker.is_empty() || len < marker.len() as u64 {
        return Ok(marker.is_empty());
    }

    // Safety: the mapping is read-only and dropped before returning.
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(mmap.windows(marker.len()).any(|window| window == marker))
}

/// SHA-256 of the file content as lowercase hex
pub fn sha256_hex(file_path: &Path) -> io::Result<String> {
    let mut file = File::open(file_path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
