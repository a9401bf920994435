//! End-to-end thumbnail behavior through the public library API.
//!
//! Fixtures are written into a fresh temp directory per test; nothing here
//! depends on files checked into the repository.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use raw_viewer_agent::imaging::{
    self, DimensionHypothesis, Payload, RenderEvent, Renderer, SourceKind, ThumbnailConfig,
    ThumbnailFailure, ThumbnailResult,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tempfile::TempDir;

fn raw_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn write_raw(dir: &Path, name: &str, len: usize) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, raw_bytes(len)).unwrap();
    path
}

fn write_image(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]));
    img.save_with_format(&path, format).unwrap();
    path
}

fn renderer() -> Renderer {
    Renderer::new(ThumbnailConfig::default())
}

fn emitted(result: &ThumbnailResult) -> &imaging::Thumbnail {
    result
        .thumbnail()
        .unwrap_or_else(|| panic!("expected Emitted, got {:?}", result.failure()))
}

fn decode_inline(result: &ThumbnailResult) -> image::DynamicImage {
    match &emitted(result).payload {
        Payload::Inline { thumbnail_base64 } => {
            let bytes = STANDARD.decode(thumbnail_base64).unwrap();
            image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap()
        }
        Payload::File { .. } => panic!("expected inline payload"),
    }
}

#[test]
fn sensor_frame_renders_at_640x512() {
    let tmp = TempDir::new().unwrap();
    let path = write_raw(tmp.path(), "frame.raw", 327_680);

    let result = renderer().render(&path, None);
    let thumb = emitted(&result);

    assert_eq!(thumb.original_size, (640, 512));
    assert_eq!(thumb.thumbnail_size, (200, 160));
    let info = thumb.raw_info.as_ref().unwrap();
    assert!(info.is_640x512);
    assert!(!info.is_square);
    assert_eq!(info.file_size, 327_680);
}

#[test]
fn square_raw_renders_at_its_side() {
    let tmp = TempDir::new().unwrap();
    let path = write_raw(tmp.path(), "square.raw", 10_000);

    let result = renderer().render(&path, None);
    let thumb = emitted(&result);

    assert_eq!(thumb.original_size, (100, 100));
    assert!(thumb.raw_info.as_ref().unwrap().is_square);
}

#[test]
fn invalid_raw_size_fails_with_reason() {
    let tmp = TempDir::new().unwrap();
    let path = write_raw(tmp.path(), "odd.raw", 1234);

    let result = renderer().render(&path, None);
    let failure = result.failure().unwrap();

    assert_eq!(failure.code(), "unresolved_geometry");
    let message = failure.to_string();
    assert!(message.contains("327680"));
    assert!(message.contains("perfect square"));
}

#[test]
fn truncated_sensor_frame_reports_byte_counts() {
    let hypothesis = imaging::resolve(327_680);
    let mut bytes = raw_bytes(327_680);
    bytes.pop();

    let result = renderer().render_raw_buffer(bytes, &hypothesis, None);

    assert_eq!(
        result.failure(),
        Some(&ThumbnailFailure::SizeMismatch {
            expected: 327_680,
            actual: 327_679,
        })
    );
    let message = result.failure().unwrap().to_string();
    assert!(message.contains("327680") && message.contains("327679"));
}

#[test]
fn exact_buffers_always_emit() {
    let renderer = renderer();
    for side in [1u64, 2, 7, 64, 181, 300] {
        let hypothesis = imaging::resolve(side * side);
        let (w, h) = hypothesis.dimensions().unwrap();
        let result = renderer.render_raw_buffer(raw_bytes((w * h) as usize), &hypothesis, None);
        assert!(result.is_success(), "side {side}: {:?}", result.failure());
    }
}

#[test]
fn unresolved_hypothesis_fails_buffer_render() {
    let hypothesis = DimensionHypothesis::Unresolved {
        reason: "nope".into(),
    };
    let result = renderer().render_raw_buffer(raw_bytes(5), &hypothesis, None);
    assert_eq!(result.failure().unwrap().code(), "unresolved_geometry");
}

#[test]
fn thumbnails_fit_the_box_and_keep_aspect() {
    let tmp = TempDir::new().unwrap();
    let renderer = renderer();
    let sizes = [(640, 480), (480, 640), (1000, 37), (37, 1000), (201, 200), (150, 90)];

    for (i, (w, h)) in sizes.into_iter().enumerate() {
        let path = write_image(tmp.path(), &format!("img{i}.png"), w, h, ImageFormat::Png);
        let result = renderer.render(&path, None);
        let thumb = emitted(&result);
        let (tw, th) = thumb.thumbnail_size;

        assert_eq!(thumb.original_size, (w, h));
        assert!(tw <= 200 && th <= 200, "{w}x{h} -> {tw}x{th}");

        // Each axis is the exact scaled size up to one pixel of rounding
        let scale = (200.0 / w as f64).min(200.0 / h as f64).min(1.0);
        assert!((tw as f64 - w as f64 * scale).abs() <= 1.0, "{w}x{h} -> {tw}x{th}");
        assert!((th as f64 - h as f64 * scale).abs() <= 1.0, "{w}x{h} -> {tw}x{th}");
    }
}

#[test]
fn inline_payload_is_a_jpeg_of_the_thumbnail_size() {
    let tmp = TempDir::new().unwrap();
    let path = write_image(tmp.path(), "photo.jpg", 800, 600, ImageFormat::Jpeg);

    let result = renderer().render(&path, None);
    let decoded = decode_inline(&result);

    assert_eq!(decoded.dimensions(), (200, 150));
    assert_eq!(emitted(&result).thumbnail_size, (200, 150));
}

#[test]
fn file_mode_writes_destination() {
    let tmp = TempDir::new().unwrap();
    let path = write_raw(tmp.path(), "frame.raw", 327_680);
    let dest = tmp.path().join("frame-thumb.jpg");

    let result = renderer().render(&path, Some(&dest));

    match &emitted(&result).payload {
        Payload::File { output_path } => assert_eq!(output_path, &dest),
        Payload::Inline { .. } => panic!("expected file payload"),
    }
    let written = image::open(&dest).unwrap();
    assert_eq!(written.dimensions(), (200, 160));
}

#[test]
fn alpha_png_is_flattened_to_rgb() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("alpha.png");
    RgbaImage::from_pixel(50, 40, Rgba([10, 200, 30, 0]))
        .save(&path)
        .unwrap();

    let result = renderer().render(&path, None);
    let decoded = decode_inline(&result);

    assert_eq!(decoded.color(), image::ColorType::Rgb8);
    assert_eq!(decoded.dimensions(), (50, 40));
}

#[test]
fn missing_source_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let result = renderer().render(&tmp.path().join("ghost.raw"), None);
    assert_eq!(result.failure().unwrap().code(), "not_found");
}

#[test]
fn unknown_extension_is_unsupported() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("notes.txt");
    fs::write(&path, "hello").unwrap();

    let result = renderer().render(&path, None);
    assert_eq!(
        result.failure(),
        Some(&ThumbnailFailure::UnsupportedFormat {
            extension: "txt".into()
        })
    );
}

#[test]
fn mislabeled_content_is_a_decode_failure() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("fake.jpg");
    fs::write(&path, b"definitely not a jpeg").unwrap();

    let result = renderer().render(&path, None);
    assert_eq!(result.failure().unwrap().code(), "decode_failure");
}

#[test]
fn extension_match_is_case_insensitive() {
    let tmp = TempDir::new().unwrap();
    let path = write_raw(tmp.path(), "FRAME.RAW", 10_000);
    assert!(renderer().render(&path, None).is_success());
}

#[test]
fn result_json_shapes() {
    let tmp = TempDir::new().unwrap();
    let good = write_raw(tmp.path(), "good.raw", 10_000);
    let bad = write_raw(tmp.path(), "bad.raw", 1234);
    let renderer = renderer();

    let ok = serde_json::to_value(renderer.render(&good, None)).unwrap();
    assert_eq!(ok["success"], true);
    assert_eq!(ok["original_size"], serde_json::json!([100, 100]));
    assert_eq!(ok["thumbnail_size"], serde_json::json!([100, 100]));
    assert!(ok["thumbnail_base64"].is_string());
    assert_eq!(ok["raw_info"]["type"], "grayscale");
    assert_eq!(ok["raw_info"]["is_square"], true);

    let err = serde_json::to_value(renderer.render(&bad, None)).unwrap();
    assert_eq!(err["success"], false);
    assert_eq!(err["kind"], "unresolved_geometry");
    assert!(err["error"].as_str().unwrap().contains("perfect square"));
}

#[test]
fn event_sink_sees_the_request_lifecycle() {
    let tmp = TempDir::new().unwrap();
    let path = write_raw(tmp.path(), "frame.raw", 327_680);
    let (tx, rx) = mpsc::channel();

    let renderer = renderer().with_events(tx);
    assert!(renderer.render(&path, None).is_success());
    drop(renderer);

    let events: Vec<RenderEvent> = rx.iter().collect();
    assert_eq!(events.len(), 3);
    assert!(matches!(
        events[0],
        RenderEvent::Dispatched {
            kind: SourceKind::Raw,
            ..
        }
    ));
    assert!(matches!(
        events[1],
        RenderEvent::GeometryResolved {
            width: 640,
            height: 512,
            ..
        }
    ));
    assert!(matches!(
        events[2],
        RenderEvent::Emitted {
            thumbnail: (200, 160),
            ..
        }
    ));
}

#[test]
fn every_standard_container_renders_to_rgb_jpeg() {
    let tmp = TempDir::new().unwrap();
    let renderer = renderer();
    // GIF is palette-indexed on disk; WebP and PNG carry alpha here
    let cases = [
        ("anim.gif", ImageFormat::Gif, true),
        ("photo.webp", ImageFormat::WebP, true),
        ("scan.bmp", ImageFormat::Bmp, false),
        ("plate.tiff", ImageFormat::Tiff, false),
        ("Photo.JPEG", ImageFormat::Jpeg, false),
        ("icon.png", ImageFormat::Png, true),
    ];

    for (name, format, alpha) in cases {
        let path = tmp.path().join(name);
        if alpha {
            RgbaImage::from_fn(320, 240, |x, y| {
                Rgba([(x % 256) as u8, (y % 256) as u8, 40, if x < 160 { 255 } else { 0 }])
            })
            .save_with_format(&path, format)
            .unwrap();
        } else {
            write_image(tmp.path(), name, 320, 240, format);
        }

        let result = renderer.render(&path, None);
        let thumb = emitted(&result);
        assert_eq!(thumb.original_size, (320, 240), "{name}");
        assert_eq!(thumb.thumbnail_size, (200, 150), "{name}");
        assert!(thumb.raw_info.is_none(), "{name}");

        let decoded = decode_inline(&result);
        assert_eq!(decoded.color(), image::ColorType::Rgb8, "{name}");
        assert_eq!(decoded.dimensions(), (200, 150), "{name}");
    }
}
