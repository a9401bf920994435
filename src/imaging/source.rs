//! Source identification and extension-based format dispatch.
//!
//! Dispatch is by extension only, compared case-insensitively. Content is
//! never sniffed: a `.png` holding JPEG bytes is decoded as PNG and fails.

use image::ImageFormat;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Extension of headerless grayscale frames.
pub const RAW_EXTENSION: &str = "raw";

/// Standard container extensions and the decoder each one selects.
const STANDARD_FORMATS: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("webp", ImageFormat::WebP),
    ("bmp", ImageFormat::Bmp),
    ("tiff", ImageFormat::Tiff),
];

/// Lower-case extension without the dot, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// How a source will be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Raw,
    Standard(ImageFormat),
}

impl SourceKind {
    /// Classify a lower-case extension (no dot). `None` means unsupported.
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext == RAW_EXTENSION {
            return Some(SourceKind::Raw);
        }
        STANDARD_FORMATS
            .iter()
            .find(|(candidate, _)| *candidate == ext)
            .map(|(_, format)| SourceKind::Standard(*format))
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Raw => "raw",
            SourceKind::Standard(_) => "standard",
        }
    }
}

/// True for `.raw` and every standard extension.
pub fn is_supported_image(path: &Path) -> bool {
    SourceKind::from_extension(&extension_of(path)).is_some()
}

pub fn is_raw(path: &Path) -> bool {
    extension_of(path) == RAW_EXTENSION
}

/// A candidate image as it was found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSource {
    /// Absolute path.
    pub path: PathBuf,
    /// Byte length at resolution time.
    pub len: u64,
    /// Lower-case extension without the dot.
    pub extension: String,
}

impl ImageSource {
    /// Stat `path` and capture its identity. Fails if it does not exist.
    pub fn resolve(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let path = std::path::absolute(path)?;
        let extension = extension_of(&path);
        Ok(Self {
            path,
            len: meta.len(),
            extension,
        })
    }

    pub fn kind(&self) -> Option<SourceKind> {
        SourceKind::from_extension(&self.extension)
    }
}
