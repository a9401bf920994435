//! Pure calculation functions for thumbnail dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Fit `source` inside `bounds`, preserving aspect ratio.
///
/// Images already inside the box keep their size (thumbnails never upscale).
/// Otherwise the limiting axis lands exactly on its bound and the other axis
/// is rounded, never below 1 pixel. A box with a zero side has no fit, so the
/// source size is returned unchanged.
///
/// # Examples
/// ```
/// # use raw_viewer_agent::imaging::calculate_fit_dimensions;
/// // 640x512 sensor frame into a 200x200 box → 200x160
/// assert_eq!(calculate_fit_dimensions((640, 512), (200, 200)), (200, 160));
///
/// // Small images are left alone
/// assert_eq!(calculate_fit_dimensions((100, 100), (200, 200)), (100, 100));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w == 0 || src_h == 0 || max_w == 0 || max_h == 0 {
        return source;
    }
    if src_w <= max_w && src_h <= max_h {
        return source;
    }

    let scale_w = max_w as f64 / src_w as f64;
    let scale_h = max_h as f64 / src_h as f64;

    if scale_w <= scale_h {
        // Width is the limiting axis
        let h = (src_h as f64 * scale_w).round() as u32;
        (max_w, h.clamp(1, max_h))
    } else {
        // Height is the limiting axis
        let w = (src_w as f64 * scale_h).round() as u32;
        (w.clamp(1, max_w), max_h)
    }
}
