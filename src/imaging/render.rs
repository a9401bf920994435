//! The thumbnail renderer.
//!
//! One request moves through these states:
//!
//! ```text
//! Dispatched ─┬─ RawValidating ────┬─ Resizing ─ Encoding ─┬─ Emitted
//!             └─ StandardDecoding ─┘                       └─ Failed
//! ```
//!
//! `Failed` is reachable from every state and is returned as a value: a
//! directory scan with one bad `.raw` file among a thousand good ones must
//! still get 999 thumbnails. The renderer holds no state between requests
//! beyond its config and an optional event sink, so one instance can be
//! shared across threads.

use super::codec;
use super::geometry::{self, DimensionHypothesis, GeometryRule, SENSOR_FRAME_BYTES};
use super::params::ThumbnailConfig;
use super::raw;
use super::source::{ImageSource, SourceKind};
use image::DynamicImage;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Why a request ended in `Failed`.
///
/// Every variant is an expected, per-file outcome. Messages are meant to be
/// shown to a person browsing a directory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailFailure {
    #[error("Image file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported image format: '{extension}'")]
    UnsupportedFormat { extension: String },
    #[error("Invalid RAW file size: {reason}")]
    UnresolvedGeometry { size: u64, reason: String },
    #[error("RAW data size mismatch: expected {expected} bytes, got {actual} bytes")]
    SizeMismatch { expected: u64, actual: u64 },
    #[error("RAW image has zero area ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },
    #[error("Failed to read image: {0}")]
    ReadFailure(String),
    #[error("Image decode failed: {0}")]
    DecodeFailure(String),
    #[error("Thumbnail encode failed: {0}")]
    EncodeFailure(String),
    #[error("Failed to write thumbnail to {}: {message}", .path.display())]
    WriteFailure { path: PathBuf, message: String },
}

impl ThumbnailFailure {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ThumbnailFailure::NotFound(_) => "not_found",
            ThumbnailFailure::UnsupportedFormat { .. } => "unsupported_format",
            ThumbnailFailure::UnresolvedGeometry { .. } => "unresolved_geometry",
            ThumbnailFailure::SizeMismatch { .. } => "size_mismatch",
            ThumbnailFailure::EmptyRaster { .. } => "empty_raster",
            ThumbnailFailure::ReadFailure(_) => "read_failure",
            ThumbnailFailure::DecodeFailure(_) => "decode_failure",
            ThumbnailFailure::EncodeFailure(_) => "encode_failure",
            ThumbnailFailure::WriteFailure { .. } => "write_failure",
        }
    }
}

/// Provenance of a thumbnail rendered from a RAW frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawInfo {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "type")]
    pub sample_type: &'static str,
    pub file_size: u64,
    pub is_640x512: bool,
    pub is_square: bool,
    pub rule: GeometryRule,
}

/// Where the encoded bytes went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// File mode: bytes were written to this path.
    File { output_path: PathBuf },
    /// Inline mode: base64 of the JPEG bytes.
    Inline { thumbnail_base64: String },
}

impl Payload {
    pub fn mode(&self) -> EmitMode {
        match self {
            Payload::File { .. } => EmitMode::File,
            Payload::Inline { .. } => EmitMode::Inline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitMode {
    File,
    Inline,
}

/// A successfully emitted thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub original_size: (u32, u32),
    pub thumbnail_size: (u32, u32),
    #[serde(flatten)]
    pub payload: Payload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_info: Option<RawInfo>,
}

/// Outcome of one render request. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailResult {
    Emitted(Thumbnail),
    Failed(ThumbnailFailure),
}

impl ThumbnailResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ThumbnailResult::Emitted(_))
    }

    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        match self {
            ThumbnailResult::Emitted(t) => Some(t),
            ThumbnailResult::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ThumbnailFailure> {
        match self {
            ThumbnailResult::Emitted(_) => None,
            ThumbnailResult::Failed(f) => Some(f),
        }
    }
}

impl From<Result<Thumbnail, ThumbnailFailure>> for ThumbnailResult {
    fn from(result: Result<Thumbnail, ThumbnailFailure>) -> Self {
        match result {
            Ok(thumbnail) => ThumbnailResult::Emitted(thumbnail),
            Err(failure) => ThumbnailResult::Failed(failure),
        }
    }
}

#[derive(Serialize)]
struct ResultRecord<'a> {
    success: bool,
    #[serde(flatten)]
    thumbnail: Option<&'a Thumbnail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

impl Serialize for ThumbnailResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let record = match self {
            ThumbnailResult::Emitted(thumbnail) => ResultRecord {
                success: true,
                thumbnail: Some(thumbnail),
                error: None,
                kind: None,
            },
            ThumbnailResult::Failed(failure) => ResultRecord {
                success: false,
                thumbnail: None,
                error: Some(failure.to_string()),
                kind: Some(failure.code()),
            },
        };
        record.serialize(serializer)
    }
}

/// Progress reported through the renderer's optional sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Dispatched {
        source: PathBuf,
        kind: SourceKind,
    },
    GeometryResolved {
        source: PathBuf,
        width: u32,
        height: u32,
        rule: GeometryRule,
    },
    Emitted {
        source: PathBuf,
        original: (u32, u32),
        thumbnail: (u32, u32),
        mode: EmitMode,
    },
    Failed {
        source: PathBuf,
        failure: ThumbnailFailure,
    },
}

/// Decoded raster plus whatever the decode path learned about its origin.
struct Decoded {
    image: DynamicImage,
    original_size: (u32, u32),
    raw_info: Option<RawInfo>,
}

/// Renders bounded JPEG previews of RAW and standard images.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: ThumbnailConfig,
    events: Option<Sender<RenderEvent>>,
}

impl Renderer {
    pub fn new(config: ThumbnailConfig) -> Self {
        Self {
            config,
            events: None,
        }
    }

    /// Attach an event sink. Without one the renderer is silent.
    pub fn with_events(mut self, events: Sender<RenderEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(&self) -> &ThumbnailConfig {
        &self.config
    }

    fn emit(&self, event: RenderEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is listening.
            tx.send(event).ok();
        }
    }

    /// Render a thumbnail of `source`.
    ///
    /// With a `destination` the JPEG is written there (file mode); without one
    /// it is returned base64-encoded (inline mode).
    pub fn render(&self, source: &Path, destination: Option<&Path>) -> ThumbnailResult {
        let result = self.try_render(source, destination);
        match &result {
            Ok(thumbnail) => self.emit(RenderEvent::Emitted {
                source: source.to_path_buf(),
                original: thumbnail.original_size,
                thumbnail: thumbnail.thumbnail_size,
                mode: thumbnail.payload.mode(),
            }),
            Err(failure) => self.emit(RenderEvent::Failed {
                source: source.to_path_buf(),
                failure: failure.clone(),
            }),
        }
        result.into()
    }

    fn try_render(
        &self,
        path: &Path,
        destination: Option<&Path>,
    ) -> Result<Thumbnail, ThumbnailFailure> {
        let source = ImageSource::resolve(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ThumbnailFailure::NotFound(path.to_path_buf()),
            _ => ThumbnailFailure::ReadFailure(format!("{}: {}", path.display(), e)),
        })?;

        let kind = source
            .kind()
            .ok_or_else(|| ThumbnailFailure::UnsupportedFormat {
                extension: source.extension.clone(),
            })?;

        self.emit(RenderEvent::Dispatched {
            source: path.to_path_buf(),
            kind,
        });

        let decoded = match kind {
            SourceKind::Raw => self.decode_raw(&source)?,
            SourceKind::Standard(format) => decode_standard(&source, format)?,
        };

        self.finish(decoded, destination)
    }

    /// Render an in-memory RAW frame against an already computed hypothesis.
    ///
    /// Used when the bytes did not come from a file this renderer opened.
    /// No events are emitted.
    pub fn render_raw_buffer(
        &self,
        bytes: Vec<u8>,
        hypothesis: &DimensionHypothesis,
        destination: Option<&Path>,
    ) -> ThumbnailResult {
        let file_size = bytes.len() as u64;
        let (width, height, rule) = match hypothesis {
            DimensionHypothesis::Resolved {
                width,
                height,
                rule,
            } => (*width, *height, *rule),
            DimensionHypothesis::Unresolved { reason } => {
                return ThumbnailResult::Failed(ThumbnailFailure::UnresolvedGeometry {
                    size: file_size,
                    reason: reason.clone(),
                });
            }
        };
        raw_frame(bytes, file_size, width, height, rule)
            .and_then(|decoded| self.finish(decoded, destination))
            .into()
    }

    /// Shared tail: resize, flatten to RGB, encode, emit.
    fn finish(
        &self,
        decoded: Decoded,
        destination: Option<&Path>,
    ) -> Result<Thumbnail, ThumbnailFailure> {
        let resized = codec::fit_within(decoded.image, self.config.bounds());
        let thumbnail_size = (resized.width(), resized.height());
        // RAW frames stay single-channel through the resize
        let rgb = codec::normalize_rgb(resized);

        let bytes = codec::encode_jpeg(&rgb, self.config.quality)
            .map_err(ThumbnailFailure::EncodeFailure)?;

        let payload = match destination {
            Some(dest) => {
                std::fs::write(dest, &bytes).map_err(|e| ThumbnailFailure::WriteFailure {
                    path: dest.to_path_buf(),
                    message: e.to_string(),
                })?;
                Payload::File {
                    output_path: dest.to_path_buf(),
                }
            }
            None => Payload::Inline {
                thumbnail_base64: codec::to_base64(&bytes),
            },
        };

        Ok(Thumbnail {
            original_size: decoded.original_size,
            thumbnail_size,
            payload,
            raw_info: decoded.raw_info,
        })
    }

    fn decode_raw(&self, source: &ImageSource) -> Result<Decoded, ThumbnailFailure> {
        let (width, height, rule) = match geometry::resolve(source.len) {
            DimensionHypothesis::Resolved {
                width,
                height,
                rule,
            } => (width, height, rule),
            DimensionHypothesis::Unresolved { reason } => {
                return Err(ThumbnailFailure::UnresolvedGeometry {
                    size: source.len,
                    reason,
                });
            }
        };

        self.emit(RenderEvent::GeometryResolved {
            source: source.path.clone(),
            width,
            height,
            rule,
        });

        let bytes = std::fs::read(&source.path).map_err(|e| {
            ThumbnailFailure::ReadFailure(format!("{}: {}", source.path.display(), e))
        })?;
        raw_frame(bytes, source.len, width, height, rule)
    }
}

/// Validate a RAW buffer and attach its provenance.
///
/// `file_size` is the length the geometry was resolved from; the buffer itself
/// is checked against `width * height` independently.
fn raw_frame(
    bytes: Vec<u8>,
    file_size: u64,
    width: u32,
    height: u32,
    rule: GeometryRule,
) -> Result<Decoded, ThumbnailFailure> {
    let raster = raw::interpret(bytes, width, height)?;
    Ok(Decoded {
        image: DynamicImage::ImageLuma8(raster),
        original_size: (width, height),
        raw_info: Some(RawInfo {
            width,
            height,
            sample_type: "grayscale",
            file_size,
            is_640x512: file_size == SENSOR_FRAME_BYTES,
            is_square: width == height,
            rule,
        }),
    })
}

/// Decode, record the original size from the decoded instance, then flatten to RGB.
fn decode_standard(
    source: &ImageSource,
    format: image::ImageFormat,
) -> Result<Decoded, ThumbnailFailure> {
    let image = codec::decode_standard(&source.path, format).map_err(ThumbnailFailure::DecodeFailure)?;
    let original_size = (image.width(), image.height());
    Ok(Decoded {
        image: codec::normalize_rgb(image),
        original_size,
        raw_info: None,
    })
}
