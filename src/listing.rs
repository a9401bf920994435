//! Directory listing and file metadata.
//!
//! The filesystem side of the agent: one [`FileEntry`] per path with size,
//! modification time, and an `ls -l` style mode string. Files are classified
//! as images by extension, and `.raw` files carry the geometry hypothesis
//! from [`imaging::geometry`](crate::imaging::geometry) so a browser can show
//! RAW validity without reading pixel data.
//!
//! ## Ordering
//!
//! Listings are sorted directories first, then by case-insensitive name.
//!
//! ## Failure model
//!
//! A missing directory or a path that is not a directory fails the whole
//! call. An entry whose metadata cannot be read does not: it is reported in
//! place as [`ListedItem::Unreadable`].

use crate::imaging::{self, source::extension_of};
use crate::types::{DirectoryListing, EntryType, FileEntry, ImageListing, ListedItem, RawAnalysis};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ListingError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ListingError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True for the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ListingError::DirectoryNotFound(_) | ListingError::FileNotFound(_)
        )
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ListingError> {
    std::path::absolute(path).map_err(|e| ListingError::io(path, e))
}

/// Stat `path`, keeping only a genuine `NotFound` as `not_found`.
/// Permission and other OS faults surface as [`ListingError::Io`].
fn stat(
    path: &Path,
    not_found: fn(PathBuf) -> ListingError,
) -> Result<fs::Metadata, ListingError> {
    fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => not_found(path.to_path_buf()),
        _ => ListingError::io(path, e),
    })
}

fn require_directory(path: &Path) -> Result<PathBuf, ListingError> {
    if !stat(path, ListingError::DirectoryNotFound)?.is_dir() {
        return Err(ListingError::NotADirectory(path.to_path_buf()));
    }
    absolute(path)
}

/// List the immediate children of `directory`.
pub fn list_directory(directory: &Path) -> Result<DirectoryListing, ListingError> {
    let dir = require_directory(directory)?;

    let mut items = Vec::new();
    for entry in fs::read_dir(&dir).map_err(|e| ListingError::io(&dir, e))? {
        let entry = entry.map_err(|e| ListingError::io(&dir, e))?;
        items.push(item_info(&entry.path()));
    }
    items.sort_by_cached_key(ListedItem::sort_key);

    Ok(DirectoryListing {
        path: dir.to_string_lossy().to_string(),
        items,
    })
}

/// Metadata for a single existing file or directory.
pub fn get_metadata(path: &Path) -> Result<FileEntry, ListingError> {
    stat(path, ListingError::FileNotFound)?;
    let path = absolute(path)?;
    file_entry(&path).map_err(|e| ListingError::io(&path, e))
}

/// Supported image files in `directory`, sorted by case-insensitive path.
///
/// With `recursive`, subdirectories are walked too (symlinks not followed).
pub fn list_images(directory: &Path, recursive: bool) -> Result<ImageListing, ListingError> {
    let dir = require_directory(directory)?;
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut images = Vec::new();
    for entry in WalkDir::new(&dir).min_depth(1).max_depth(max_depth) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir.as_path()).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
            ListingError::Io { path, source }
        })?;
        if !entry.file_type().is_file() || !imaging::is_supported_image(entry.path()) {
            continue;
        }
        // Files that vanish or become unreadable mid-walk are skipped.
        if let Ok(info) = file_entry(entry.path()) {
            images.push(info);
        }
    }
    images.sort_by_cached_key(|e| e.path.to_lowercase());

    Ok(ImageListing {
        path: dir.to_string_lossy().to_string(),
        images,
    })
}

fn item_info(path: &Path) -> ListedItem {
    match file_entry(path) {
        Ok(entry) => ListedItem::Entry(entry),
        Err(e) => ListedItem::Unreadable {
            name: file_name(path),
            path: path.to_string_lossy().to_string(),
            error: e.to_string(),
        },
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Build a [`FileEntry`] from `fs::metadata` (symlinks followed).
fn file_entry(path: &Path) -> std::io::Result<FileEntry> {
    let meta = fs::metadata(path)?;
    let is_dir = meta.is_dir();

    let modified = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);

    let (extension, is_image, raw_info) = if meta.is_file() {
        let ext = extension_of(path);
        let raw_info = imaging::is_raw(path)
            .then(|| RawAnalysis::from(imaging::resolve(meta.len())));
        let dotted = if ext.is_empty() {
            String::new()
        } else {
            format!(".{ext}")
        };
        (Some(dotted), Some(imaging::is_supported_image(path)), raw_info)
    } else {
        (None, None, None)
    };

    Ok(FileEntry {
        name: file_name(path),
        path: path.to_string_lossy().to_string(),
        entry_type: if is_dir {
            EntryType::Directory
        } else {
            EntryType::File
        },
        size: meta.len(),
        modified,
        permissions: permission_string(&meta),
        extension,
        is_image,
        raw_info,
    })
}

/// `ls -l` style mode string. Metadata is followed through symlinks, so a
/// link shows as its target's type.
#[cfg(unix)]
fn permission_string(meta: &fs::Metadata) -> String {
    use std::os::unix::fs::{FileTypeExt, PermissionsExt};

    let ft = meta.file_type();
    let kind = if ft.is_dir() {
        'd'
    } else if ft.is_char_device() {
        'c'
    } else if ft.is_block_device() {
        'b'
    } else if ft.is_fifo() {
        'p'
    } else if ft.is_socket() {
        's'
    } else {
        '-'
    };

    let mode = meta.permissions().mode();
    let mut out = String::with_capacity(10);
    out.push(kind);
    for (shift, special, special_char) in [(6, 0o4000, 's'), (3, 0o2000, 's'), (0, 0o1000, 't')] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        let exec = bits & 0o1 != 0;
        out.push(match (mode & special != 0, exec) {
            (true, true) => special_char,
            (true, false) => special_char.to_ascii_uppercase(),
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    out
}

#[cfg(not(unix))]
fn permission_string(meta: &fs::Metadata) -> String {
    let kind = if meta.is_dir() { 'd' } else { '-' };
    let write = if meta.permissions().readonly() { '-' } else { 'w' };
    format!("{kind}r{write}-r{write}-r{write}-")
}
