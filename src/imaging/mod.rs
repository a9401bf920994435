//! Image processing: dimension inference, decoding, and thumbnail emission.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **RAW geometry** | [`geometry::resolve`] (byte count → width × height) |
//! | **RAW decode** | [`raw::interpret`] → `image::GrayImage` |
//! | **Standard decode** | `image::ImageReader` (format chosen by extension) |
//! | **Resize** | Lanczos3, fit inside the bounding box, never upscale |
//! | **Encode** | JPEG at quality 85, written to a file or returned as base64 |
//!
//! The module is split into:
//! - **Geometry / Calculations**: Pure functions (unit testable, no I/O)
//! - **Parameters**: Bounding box and quality
//! - **Source / Raw / Codec**: Classification and pixel work
//! - **Render**: [`Renderer`] and its result types

mod calculations;
pub mod codec;
pub mod geometry;
mod params;
pub mod raw;
pub mod render;
pub mod source;

pub use calculations::calculate_fit_dimensions;
pub use geometry::{DimensionHypothesis, GeometryRule, resolve};
pub use params::{Quality, ThumbnailConfig};
pub use render::{
    EmitMode, Payload, RawInfo, RenderEvent, Renderer, Thumbnail, ThumbnailFailure,
    ThumbnailResult,
};
pub use source::{ImageSource, SourceKind, is_raw, is_supported_image};
