//! # Raw Viewer Agent
//!
//! The remote half of a RAW image viewer. A viewer connects to a host, runs
//! this agent, and gets back JSON: directory listings, file metadata, and
//! small JPEG previews of the images it finds.
//!
//! RAW files here are headerless 8-bit grayscale sensor dumps. Their width
//! and height are not stored anywhere, so the agent infers them from the
//! byte count alone:
//!
//! ```text
//! 327680 bytes  →  640 × 512   (the fixed sensor frame)
//! s² bytes      →  s × s       (any perfect square)
//! anything else →  unresolved  (reported, never guessed)
//! ```
//!
//! Standard formats (JPEG, PNG, GIF, WebP, BMP, TIFF) are decoded as usual.
//! Either way the result is fitted inside a 200 × 200 box with Lanczos
//! resampling and encoded as JPEG at quality 85, then written to a file or
//! returned inline as base64.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Geometry inference, decoding, resizing, and the thumbnail renderer |
//! | [`listing`] | Directory listing and per-file metadata |
//! | [`config`] | Optional `config.toml`: bounding box and quality |
//! | [`types`] | JSON shapes returned by the listing commands |
//! | [`output`] | Human-readable progress lines for stderr |
//!
//! # Failures Are Data
//!
//! A thumbnail request never panics. A caller walking a directory can skip
//! one bad file and keep going: every outcome is an
//! [`imaging::ThumbnailResult`], either the emitted thumbnail or a
//! [`imaging::ThumbnailFailure`] with a stable `kind` code the viewer can
//! branch on.

pub mod config;
pub mod imaging;
pub mod listing;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
