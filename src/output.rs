//! CLI progress formatting.
//!
//! Stdout carries exactly one JSON document per command, so everything a
//! human might want to watch goes to stderr as plain lines.
//!
//! # Output Format
//!
//! ```text
//! frame.raw: raw source
//!     geometry: 640x512 (fixed sensor)
//!     thumbnail: 640x512 -> 200x160 (file)
//! ```
//!
//! Unresolved RAW geometry is expected for arbitrary `.raw` files and is
//! reported as a `warning:`; every other failure is an `error:`.
//!
//! # Architecture
//!
//! Each event has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stderr. Format
//! functions are pure: no I/O, no side effects.

use crate::imaging::{EmitMode, RenderEvent, ThumbnailFailure};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// File name for display, falling back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn severity(failure: &ThumbnailFailure) -> &'static str {
    match failure {
        ThumbnailFailure::UnresolvedGeometry { .. } => "warning",
        _ => "error",
    }
}

// ============================================================================
// Renderer events
// ============================================================================

/// Format a single renderer event as display lines.
pub fn format_render_event(event: &RenderEvent) -> Vec<String> {
    match event {
        RenderEvent::Dispatched { source, kind } => {
            vec![format!("{}: {} source", display_name(source), kind.label())]
        }
        RenderEvent::GeometryResolved {
            width,
            height,
            rule,
            ..
        } => vec![format!(
            "{}geometry: {}x{} ({})",
            indent(1),
            width,
            height,
            rule.label()
        )],
        RenderEvent::Emitted {
            original,
            thumbnail,
            mode,
            ..
        } => {
            let mode = match mode {
                EmitMode::File => "file",
                EmitMode::Inline => "inline",
            };
            vec![format!(
                "{}thumbnail: {}x{} -> {}x{} ({})",
                indent(1),
                original.0,
                original.1,
                thumbnail.0,
                thumbnail.1,
                mode
            )]
        }
        RenderEvent::Failed { source, failure } => vec![format!(
            "{}: {}: {}",
            severity(failure),
            display_name(source),
            failure
        )],
    }
}

pub fn print_render_event(event: &RenderEvent) {
    for line in format_render_event(event) {
        eprintln!("{line}");
    }
}
