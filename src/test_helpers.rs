//! Shared test utilities: fixture writers for RAW frames and standard images.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let frame = write_raw(tmp.path(), "frame.raw", 327_680);
//! let photo = write_rgba_png(tmp.path(), "photo.png", 400, 300);
//! ```

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

// =========================================================================
// RAW fixtures
// =========================================================================

/// A repeating 0..=255 ramp of `len` bytes.
pub fn raw_pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

/// Write a headerless RAW file of exactly `len` bytes and return its path.
pub fn write_raw(dir: &Path, name: &str, len: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, raw_pattern(len)).unwrap();
    path
}

// =========================================================================
// Standard image fixtures
// =========================================================================

/// Write a semi-transparent RGBA PNG gradient.
pub fn write_rgba_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 100])
    });
    img.save(&path).unwrap();
    path
}

/// Write an opaque RGB JPEG.
pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, 64, (y % 256) as u8]));
    img.save_with_format(&path, image::ImageFormat::Jpeg).unwrap();
    path
}
