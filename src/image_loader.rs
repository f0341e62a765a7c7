//! Icon decoding and downsampling
//!
//! Raster formats are decoded by the `image` crate; SVG icons are
//! rasterized with `resvg` onto a transparent square. The loaded icon is
//! reduced to a fixed-size RGBA sample with an aspect-preserving "contain"
//! fit and fully transparent padding, which bounds the analyzer's work
//! regardless of the source resolution.
//!
//! ## Design
//!
//! Resampling runs on premultiplied alpha with a triangle filter. Without
//! premultiplication the transparent (black) padding bleeds into edge
//! pixels; filters with negative lobes overshoot at hard edges. Either one
//! invents colors the icon never had.

use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, Rgba32FImage, RgbaImage};
use resvg::{tiny_skia, usvg};
use tracing::trace;

use crate::buffer::SampleBuffer;
use crate::config::AnalyzerConfig;
use crate::constants::sampling::SVG_RENDER_SIZE;
use crate::error::{AnalysisError, Result};
use crate::source::ImageSource;

/// MIME type of SVG data URIs
pub const SVG_MIME: &str = "image/svg+xml";

/// Decode an [`ImageSource`] into an image
///
/// SVG sources (by MIME type, `.svg`/`.svgz` extension, or content when no
/// MIME type is given) are rasterized. Data URIs use the format implied by
/// their MIME type when the `image` crate knows it; everything else is
/// identified from its content.
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoadError` if the file cannot be read or
/// the bytes cannot be decoded
pub fn load_source(source: &ImageSource) -> Result<DynamicImage> {
    match source {
        ImageSource::DataUri { mime, bytes } => {
            let is_svg = match mime.as_deref() {
                Some(mime) => mime == SVG_MIME,
                None => looks_like_svg(bytes),
            };
            if is_svg {
                return rasterize_svg(bytes, SVG_RENDER_SIZE).map(DynamicImage::ImageRgba8);
            }
            let format = mime.as_deref().and_then(ImageFormat::from_mime_type);
            decode_bytes(bytes, format)
        }
        ImageSource::File(path) if has_svg_extension(path) => {
            let bytes = std::fs::read(path).map_err(|e| {
                AnalysisError::image_load(format!("Failed to read {}", path.display()), e)
            })?;
            rasterize_svg(&bytes, SVG_RENDER_SIZE).map(DynamicImage::ImageRgba8)
        }
        ImageSource::File(path) => {
            let reader = ImageReader::open(path).map_err(|e| {
                AnalysisError::image_load(format!("Failed to open {}", path.display()), e)
            })?;
            let reader = reader.with_guessed_format().map_err(|e| {
                AnalysisError::image_load(format!("Failed to read {}", path.display()), e)
            })?;
            reader.decode().map_err(|e| {
                AnalysisError::image_load(format!("Failed to decode {}", path.display()), e)
            })
        }
    }
}

/// Render SVG (or gzipped SVGZ) bytes into a `size x size` RGBA image
///
/// The drawing is scaled to fit and centered; the rest of the square stays
/// fully transparent.
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoadError` if the document cannot be parsed
pub fn rasterize_svg(bytes: &[u8], size: u32) -> Result<RgbaImage> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default()).map_err(|e| {
        AnalysisError::ImageLoadError {
            message: format!("Failed to parse SVG: {}", e),
            source: None,
        }
    })?;

    let mut pixmap = tiny_skia::Pixmap::new(size, size).ok_or_else(|| AnalysisError::InvalidBuffer {
        reason: format!("cannot allocate a {}x{} pixmap", size, size),
    })?;

    let view = tree.size();
    let scale = (size as f32 / view.width()).min(size as f32 / view.height());
    let tx = (size as f32 - view.width() * scale) / 2.0;
    let ty = (size as f32 - view.height() * scale) / 2.0;
    let transform = tiny_skia::Transform::from_row(scale, 0.0, 0.0, scale, tx, ty);

    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied pixels
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    trace!(width = view.width(), height = view.height(), size, "rasterized svg");
    RgbaImage::from_raw(size, size, data).ok_or_else(|| AnalysisError::InvalidBuffer {
        reason: "rasterized svg has unexpected length".into(),
    })
}

fn has_svg_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg") || ext.eq_ignore_ascii_case("svgz"))
}

/// Cheap content check for untyped data
fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    let start = head.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(head.len());
    let head = &head[start..];
    head.starts_with(b"<svg")
        || (head.starts_with(b"<?xml") && head.windows(4).any(|w| w == b"<svg"))
}

/// Decode in-memory image bytes, guessing the format when none is given
pub fn decode_bytes(bytes: &[u8], format: Option<ImageFormat>) -> Result<DynamicImage> {
    let decoded = match format {
        Some(format) => image::load_from_memory_with_format(bytes, format),
        None => ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| AnalysisError::image_load("Failed to sniff image format", e))?
            .decode(),
    };
    decoded.map_err(|e| AnalysisError::image_load("Failed to decode image data", e))
}

/// Reduce a decoded icon to the buffer the analyzer consumes
///
/// Images without an alpha channel come back as an empty 3-channel
/// buffer: the analyzer rejects them on the channel count alone, so no
/// pixels are copied. Everything else is expanded to RGBA and fitted into
/// the configured sample size.
pub fn prepare_sample(image: &DynamicImage, config: &AnalyzerConfig) -> SampleBuffer {
    if !image.color().has_alpha() {
        trace!(color = ?image.color(), "no alpha channel, skipping downsample");
        return SampleBuffer::empty(3);
    }

    let rgba = image.to_rgba8();
    SampleBuffer::from(downsample_contain(&rgba, config.sample_width, config.sample_height))
}

/// Fit `image` inside `width x height`, centered on a transparent canvas
pub fn downsample_contain(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (src_w, src_h) = image.dimensions();
    if (src_w, src_h) == (width, height) {
        return image.clone();
    }

    let mut canvas = RgbaImage::new(width, height);
    if src_w == 0 || src_h == 0 || width == 0 || height == 0 {
        return canvas;
    }

    let (fit_w, fit_h) = contain_dimensions(src_w, src_h, width, height);
    let resized = resize_premultiplied(image, fit_w, fit_h);

    let x = ((width - fit_w) / 2) as i64;
    let y = ((height - fit_h) / 2) as i64;
    imageops::replace(&mut canvas, &resized, x, y);

    trace!(src_w, src_h, fit_w, fit_h, "downsampled icon");
    canvas
}

/// Largest size with the source aspect ratio that fits the target
fn contain_dimensions(src_w: u32, src_h: u32, width: u32, height: u32) -> (u32, u32) {
    let scale = (width as f64 / src_w as f64).min(height as f64 / src_h as f64);
    let fit_w = ((src_w as f64 * scale).round() as u32).clamp(1, width);
    let fit_h = ((src_h as f64 * scale).round() as u32).clamp(1, height);
    (fit_w, fit_h)
}

fn resize_premultiplied(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let mut linear: Rgba32FImage = DynamicImage::ImageRgba8(image.clone()).to_rgba32f();
    for pixel in linear.pixels_mut() {
        let alpha = pixel[3];
        pixel[0] *= alpha;
        pixel[1] *= alpha;
        pixel[2] *= alpha;
    }

    let resized = imageops::resize(&linear, width, height, FilterType::Triangle);

    RgbaImage::from_fn(width, height, |x, y| {
        let p = resized.get_pixel(x, y);
        let alpha = p[3].clamp(0.0, 1.0);
        if alpha <= f32::EPSILON {
            return Rgba([0, 0, 0, 0]);
        }
        let channel = |v: f32| ((v / alpha).clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([channel(p[0]), channel(p[1]), channel(p[2]), (alpha * 255.0).round() as u8])
    })
}
