//! Parameter types for thumbnail rendering.
//!
//! These structs describe *what* to produce, not *how*. The renderer reads
//! them; the config layer builds them from `config.toml`.
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 85). Clamped on construction.
//! - [`ThumbnailConfig`]: bounding box and quality for every thumbnail.

use crate::config::ThumbnailsConfig;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Bounding box and encoding settings shared by every thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
}

impl ThumbnailConfig {
    pub fn bounds(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }

    pub fn from_config(config: &ThumbnailsConfig) -> Self {
        Self {
            max_width: config.max_width,
            max_height: config.max_height,
            quality: Quality::new(config.quality),
        }
    }
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_width: 200,
            max_height: 200,
            quality: Quality::default(),
        }
    }
}
