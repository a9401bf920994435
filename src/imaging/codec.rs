//! Pixel work on top of the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP, BMP, TIFF) | `image::ImageReader` with the format chosen by extension |
//! | Normalize | `DynamicImage::to_rgb8` (drops alpha, expands palettes) |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at fixed quality |
//! | Inline payload | `base64` standard alphabet |

use super::calculations::calculate_fit_dimensions;
use super::params::Quality;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Decode a standard container, forcing the decoder picked from the extension.
///
/// Errors are returned as display strings; the caller owns the failure type.
pub fn decode_standard(path: &Path, format: ImageFormat) -> Result<DynamicImage, String> {
    let mut reader = ImageReader::open(path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    reader.set_format(format);
    reader
        .decode()
        .map_err(|e| format!("Failed to decode {}: {}", path.display(), e))
}

/// Normalize to plain 8-bit RGB.
///
/// Alpha channels and palette indices have no meaning in a JPEG thumbnail.
pub fn normalize_rgb(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// Downscale to fit `bounds`, preserving aspect ratio, with Lanczos3.
///
/// Images already inside the box are returned untouched.
pub fn fit_within(img: DynamicImage, bounds: (u32, u32)) -> DynamicImage {
    let original = (img.width(), img.height());
    let (w, h) = calculate_fit_dimensions(original, bounds);
    if (w, h) == original {
        return img;
    }
    img.resize_exact(w, h, FilterType::Lanczos3)
}

/// Encode as baseline JPEG at the given quality.
pub fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, String> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality.value());
    img.write_with_encoder(encoder)
        .map_err(|e| format!("JPEG encode failed: {}", e))?;
    Ok(buffer)
}

pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
