//! Interpretation of headerless RAW buffers as 8-bit grayscale rasters.

use super::render::ThumbnailFailure;
use image::GrayImage;

/// Validate `bytes` against the resolved geometry and wrap them as a raster.
///
/// The buffer must hold exactly `width * height` samples in row-major order.
/// Anything else is rejected as-is: the buffer is never truncated or padded.
pub fn interpret(bytes: Vec<u8>, width: u32, height: u32) -> Result<GrayImage, ThumbnailFailure> {
    let expected = width as u64 * height as u64;
    if expected == 0 {
        return Err(ThumbnailFailure::EmptyRaster { width, height });
    }

    let actual = bytes.len() as u64;
    if actual != expected {
        return Err(ThumbnailFailure::SizeMismatch { expected, actual });
    }

    GrayImage::from_raw(width, height, bytes).ok_or_else(|| {
        ThumbnailFailure::DecodeFailure(format!(
            "cannot build a {width}x{height} grayscale raster from {actual} bytes"
        ))
    })
}
