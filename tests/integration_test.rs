//! Integration tests for the complete analyze_icon pipeline
//!
//! These tests validate the end-to-end workflow including:
//! - Reference resolution for data URIs, file URLs and asset paths
//! - Decoding and contain-fit downsampling
//! - Flat icon classification and luminance
//! - Safe fallback for unsupported or broken inputs

use std::io::Cursor;
use std::path::Path;

use base64::prelude::*;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use iconscan::{
    analyze_icon, load_icon_sample, AnalysisResult, AnalyzerConfig, BuildMode,
    IconColorAnalyzer, NoopObserver, SourceResolver,
};

// ============================================================================
// Fixtures
// ============================================================================

fn analyzer() -> IconColorAnalyzer {
    IconColorAnalyzer::new().with_observer(NoopObserver)
}

/// Filled circle on a transparent background
fn circle_icon(size: u32, color: [u8; 3]) -> RgbaImage {
    let center = size as f32 / 2.0;
    let radius = size as f32 * 0.4;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        if dx * dx + dy * dy <= radius * radius {
            Rgba([color[0], color[1], color[2], 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Four colored quadrants inside a transparent border
fn multicolor_icon(size: u32) -> RgbaImage {
    let border = size / 8;
    RgbaImage::from_fn(size, size, |x, y| {
        if x < border || y < border || x >= size - border || y >= size - border {
            return Rgba([0, 0, 0, 0]);
        }
        match (x < size / 2, y < size / 2) {
            (true, true) => Rgba([230, 30, 30, 255]),
            (false, true) => Rgba([30, 200, 30, 255]),
            (true, false) => Rgba([30, 30, 220, 255]),
            (false, false) => Rgba([240, 220, 20, 255]),
        }
    })
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("encode fixture");
    bytes
}

fn png_data_uri(image: RgbaImage) -> String {
    let png = encode(DynamicImage::ImageRgba8(image), ImageFormat::Png);
    format!("data:image/png;base64,{}", BASE64_STANDARD.encode(png))
}

/// 48x48 square inset on a 64x64 transparent canvas
const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">
  <rect x="8" y="8" width="48" height="48" fill="#141414"/>
</svg>"##;

fn write_png(path: &Path, image: RgbaImage) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, encode(DynamicImage::ImageRgba8(image), ImageFormat::Png)).unwrap();
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_flat_dark_icon_from_data_uri() {
    let reference = png_data_uri(circle_icon(128, [30, 30, 30]));
    let result = analyze_icon(&reference, &SourceResolver::default(), &analyzer());

    assert_eq!(result, AnalysisResult::simple("#1e1e1e".to_string(), true));
}

#[test]
fn test_flat_light_icon_from_data_uri() {
    let reference = png_data_uri(circle_icon(48, [250, 250, 250]));
    let result = analyze_icon(&reference, &SourceResolver::default(), &analyzer());

    assert!(result.is_simple_icon);
    assert_eq!(result.main_color.as_deref(), Some("#fafafa"));
    assert!(!result.is_dark);
    assert!(result.needs_adaptation);
}

#[test]
fn test_multicolor_icon_is_not_simple() {
    let reference = png_data_uri(multicolor_icon(64));
    let result = analyze_icon(&reference, &SourceResolver::default(), &analyzer());

    assert_eq!(result, AnalysisResult::not_simple());
}

#[test]
fn test_opaque_flat_square_is_not_simple() {
    let reference = png_data_uri(RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 255])));
    let result = analyze_icon(&reference, &SourceResolver::default(), &analyzer());

    assert!(!result.is_simple_icon);
    assert!(result.main_color.is_none());
}

#[test]
fn test_transparent_icon_is_not_simple() {
    let reference = png_data_uri(RgbaImage::new(16, 16));
    let result = analyze_icon(&reference, &SourceResolver::default(), &analyzer());

    assert_eq!(result, AnalysisResult::not_simple());
}

#[test]
fn test_jpeg_without_alpha_is_not_simple() {
    let jpeg = encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, Rgb([0, 0, 0]))),
        ImageFormat::Jpeg,
    );
    let reference = format!("data:image/jpeg;base64,{}", BASE64_STANDARD.encode(jpeg));

    let sample = load_icon_sample(&reference, &SourceResolver::default(), &AnalyzerConfig::default())
        .unwrap();
    assert_eq!(sample.channels(), 3);
    assert_eq!((sample.width(), sample.height()), (0, 0));

    let result = analyze_icon(&reference, &SourceResolver::default(), &analyzer());
    assert_eq!(result, AnalysisResult::not_simple());
}

#[test]
fn test_wide_icon_is_padded_to_sample() {
    // Fully opaque but wide: letterboxing adds the transparent background
    let reference = png_data_uri(RgbaImage::from_pixel(96, 32, Rgba([200, 20, 20, 255])));

    let sample = load_icon_sample(&reference, &SourceResolver::default(), &AnalyzerConfig::default())
        .unwrap();
    assert_eq!((sample.width(), sample.height()), (32, 32));

    let result = analyze_icon(&reference, &SourceResolver::default(), &analyzer());
    assert!(result.is_simple_icon);
    assert_eq!(result.main_color.as_deref(), Some("#c81414"));
    assert!(result.is_dark);
}

#[test]
fn test_svg_data_uris() {
    let base64 = format!("data:image/svg+xml;base64,{}", BASE64_STANDARD.encode(SQUARE_SVG));
    let escaped = format!("data:image/svg+xml,{}", urlencoding::encode(SQUARE_SVG));

    let sample = load_icon_sample(&base64, &SourceResolver::default(), &AnalyzerConfig::default())
        .unwrap();
    assert_eq!((sample.width(), sample.height(), sample.channels()), (32, 32, 4));

    for reference in [base64, escaped] {
        let result = analyze_icon(&reference, &SourceResolver::default(), &analyzer());
        assert_eq!(result, AnalysisResult::simple("#141414".into(), true));
    }
}

#[test]
fn test_line_wrapped_base64_payload() {
    let png = encode(
        DynamicImage::ImageRgba8(circle_icon(64, [20, 20, 20])),
        ImageFormat::Png,
    );
    let encoded = BASE64_STANDARD.encode(png);
    let lines: Vec<&str> = encoded
        .as_bytes()
        .chunks(76)
        .map(|line| std::str::from_utf8(line).unwrap())
        .collect();
    assert!(lines.len() > 1);

    let single = format!("data:image/png;base64,{}", encoded);
    let wrapped = format!("data:image/png;base64,{}", lines.join("\n"));

    let expected = analyze_icon(&single, &SourceResolver::default(), &analyzer());
    assert!(expected.is_simple_icon);
    assert_eq!(analyze_icon(&wrapped, &SourceResolver::default(), &analyzer()), expected);
}

#[test]
fn test_repeated_analysis_is_identical() {
    let reference = png_data_uri(multicolor_icon(40));
    let resolver = SourceResolver::default();
    let analyzer = analyzer();

    let first = analyze_icon(&reference, &resolver, &analyzer);
    let second = analyze_icon(&reference, &resolver, &analyzer);
    assert_eq!(first, second);
}

// ============================================================================
// Reference handling
// ============================================================================

#[test]
fn test_file_path_and_file_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("my icon.png");
    write_png(&path, circle_icon(64, [0, 120, 215]));

    let resolver = SourceResolver::default();
    let by_path = analyze_icon(path.to_str().unwrap(), &resolver, &analyzer());
    assert!(by_path.is_simple_icon);
    assert_eq!(by_path.main_color.as_deref(), Some("#0078d7"));

    #[cfg(unix)]
    {
        let url = format!("file://{}", path.to_str().unwrap().replace(' ', "%20"));
        assert_eq!(analyze_icon(&url, &resolver, &analyzer()), by_path);
    }
}

#[test]
fn test_svg_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("glyph.svg");
    std::fs::write(&path, SQUARE_SVG).unwrap();

    let result = analyze_icon(path.to_str().unwrap(), &SourceResolver::default(), &analyzer());
    assert_eq!(result, AnalysisResult::simple("#141414".into(), true));
}

#[test]
fn test_relative_path_uses_app_root() {
    let root = tempfile::tempdir().unwrap();
    write_png(&root.path().join("icons/app.png"), circle_icon(32, [10, 10, 10]));

    let resolver = SourceResolver::new(root.path());
    let result = analyze_icon("icons/app.png", &resolver, &analyzer());
    assert!(result.is_simple_icon);
}

#[test]
fn test_bundled_asset_in_both_modes() {
    let root = tempfile::tempdir().unwrap();
    write_png(
        &root.path().join("src/renderer/assets/default.png"),
        circle_icon(32, [240, 240, 240]),
    );

    let dev = SourceResolver::new(root.path()).with_mode(BuildMode::Development);
    let result = analyze_icon("./assets/default.png", &dev, &analyzer());
    assert_eq!(result.main_color.as_deref(), Some("#f0f0f0"));

    // Production only looks at the bundled output, which does not exist
    let prod = SourceResolver::new(root.path()).with_mode(BuildMode::Production);
    assert_eq!(
        analyze_icon("./assets/default.png", &prod, &analyzer()),
        AnalysisResult::not_simple()
    );
}

#[test]
fn test_remote_reference_never_analyzed() {
    let resolver = SourceResolver::default();
    for reference in ["https://cdn.example.com/icon.png", "http://example.com/icon.png"] {
        assert_eq!(analyze_icon(reference, &resolver, &analyzer()), AnalysisResult::not_simple());
        assert!(load_icon_sample(reference, &resolver, &AnalyzerConfig::default()).is_err());
    }
}

#[test]
fn test_broken_inputs_fall_back() {
    let resolver = SourceResolver::default();
    let cases = [
        "",
        "nonexistent_file.png",
        "data:image/png;base64,@@@",
        "data:image/png;base64,AAAA",
    ];
    for reference in cases {
        assert_eq!(
            analyze_icon(reference, &resolver, &analyzer()),
            AnalysisResult::not_simple(),
            "reference {:?}",
            reference
        );
    }
}

#[test]
fn test_custom_sample_size() {
    let config = AnalyzerConfig {
        sample_width: 16,
        sample_height: 16,
        ..AnalyzerConfig::default()
    };
    let analyzer = IconColorAnalyzer::with_config(config)
        .unwrap()
        .with_observer(NoopObserver);
    let reference = png_data_uri(circle_icon(64, [0, 0, 0]));

    let sample = load_icon_sample(&reference, &SourceResolver::default(), analyzer.config()).unwrap();
    assert_eq!((sample.width(), sample.height()), (16, 16));
    assert!(analyze_icon(&reference, &SourceResolver::default(), &analyzer).is_simple_icon);
}

#[test]
fn test_shared_analyzer_across_threads() {
    let analyzer = analyzer();
    let resolver = SourceResolver::default();
    let flat = png_data_uri(circle_icon(64, [30, 30, 30]));
    let busy = png_data_uri(multicolor_icon(64));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let reference = if i % 2 == 0 { &flat } else { &busy };
                let (analyzer, resolver) = (&analyzer, &resolver);
                scope.spawn(move || (i, analyze_icon(reference, resolver, analyzer)))
            })
            .collect();

        for handle in handles {
            let (i, result) = handle.join().unwrap();
            assert_eq!(result.is_simple_icon, i % 2 == 0);
        }
    });
}
