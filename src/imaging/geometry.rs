//! Dimension inference for headerless RAW frames.
//!
//! A `.raw` file is nothing but 8-bit grayscale samples, so the only thing we
//! know about its geometry is the byte count. Two rules are tried in order:
//!
//! | Priority | Rule | Match | Geometry |
//! |---|---|---|---|
//! | 1 | Fixed sensor | exactly 327 680 bytes | 640 × 512 |
//! | 2 | Perfect square | `s * s == len` | s × s |
//!
//! The first match wins. Everything here is pure: no I/O, no allocation
//! beyond the reason string of an unresolved hypothesis.

use serde::Serialize;

/// Byte length of one frame from the fixed 640×512 sensor.
pub const SENSOR_FRAME_BYTES: u64 = 327_680;
pub const SENSOR_FRAME_WIDTH: u32 = 640;
pub const SENSOR_FRAME_HEIGHT: u32 = 512;

/// Which rule produced a resolved geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryRule {
    FixedSensor,
    PerfectSquare,
}

impl GeometryRule {
    pub fn label(self) -> &'static str {
        match self {
            GeometryRule::FixedSensor => "fixed sensor",
            GeometryRule::PerfectSquare => "perfect square",
        }
    }
}

/// Outcome of [`resolve`].
///
/// When resolved, `width * height` equals the byte length it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionHypothesis {
    Resolved {
        width: u32,
        height: u32,
        rule: GeometryRule,
    },
    Unresolved {
        reason: String,
    },
}

impl DimensionHypothesis {
    pub fn is_resolved(&self) -> bool {
        matches!(self, DimensionHypothesis::Resolved { .. })
    }

    /// `(width, height)` if resolved.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            DimensionHypothesis::Resolved { width, height, .. } => Some((*width, *height)),
            DimensionHypothesis::Unresolved { .. } => None,
        }
    }
}

/// Map a RAW file's byte length to a geometry hypothesis.
///
/// Total and deterministic for every `u64`. A length of zero resolves to a
/// degenerate `0 × 0` square; rejecting zero-area rasters is the decoder's job.
pub fn resolve(file_size: u64) -> DimensionHypothesis {
    if file_size == SENSOR_FRAME_BYTES {
        return DimensionHypothesis::Resolved {
            width: SENSOR_FRAME_WIDTH,
            height: SENSOR_FRAME_HEIGHT,
            rule: GeometryRule::FixedSensor,
        };
    }

    let side = file_size.isqrt();
    if side * side == file_size {
        // isqrt of a u64 is always below 2^32
        let side = side as u32;
        return DimensionHypothesis::Resolved {
            width: side,
            height: side,
            rule: GeometryRule::PerfectSquare,
        };
    }

    DimensionHypothesis::Unresolved {
        reason: format!(
            "size {file_size} is not {SENSOR_FRAME_BYTES} and not a perfect square"
        ),
    }
}
