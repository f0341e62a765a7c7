//! # iconscan
//!
//! Decides whether an icon is a "simple flat-color icon" that should adapt
//! to light or dark surroundings, and if so reports its dominant color and
//! whether that color is dark.
//!
//! The library:
//! - Resolves icon references (`data:` URIs, `file:` URLs, bundled asset
//!   paths, plain paths) and rejects remote ones
//! - Decodes and fits the icon into a 32x32 transparent sample
//! - Finds the dominant exact color among opaque pixels
//! - Classifies the icon from its color similarity and transparency ratios
//!
//! ## Example
//!
//! ```rust,no_run
//! use iconscan::{analyze_icon, IconColorAnalyzer, SourceResolver};
//!
//! let resolver = SourceResolver::new("/opt/launcher");
//! let analyzer = IconColorAnalyzer::new();
//!
//! let result = analyze_icon("./assets/terminal.png", &resolver, &analyzer);
//! if result.needs_adaptation {
//!     println!("{:?} is dark: {}", result.main_color, result.is_dark);
//! }
//! ```
//!
//! Callers that already hold decoded pixels can skip the loader and call
//! [`IconColorAnalyzer::analyze`] on a [`PixelBuffer`] directly.

use palette::Srgb;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn};

pub mod buffer;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod image_loader;
pub mod observer;
pub mod source;

pub use buffer::{PixelBuffer, SampleBuffer};
pub use color::{ColorConverter, ColorKey, IconColorAnalyzer, IconStatistics};
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, InsufficientSignal, Result};
pub use observer::{AnalysisObserver, NoopObserver, TracingObserver};
pub use source::{BuildMode, ImageSource, SourceResolver};

/// Verdict for one icon, as handed back across the request boundary
///
/// Deserialization rejects records that no analysis could produce, such
/// as a simple icon without a color or `needsAdaptation` disagreeing with
/// `isSimpleIcon`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AnalysisRecord")]
pub struct AnalysisResult {
    /// Flat single-color icon over a transparent background
    pub is_simple_icon: bool,
    /// Dominant color as `#rrggbb`, only present for simple icons
    pub main_color: Option<String>,
    /// Dominant color luminance is below the darkness threshold
    pub is_dark: bool,
    /// Consumer should adapt the surrounding background; mirrors `is_simple_icon`
    pub needs_adaptation: bool,
}

impl AnalysisResult {
    /// The safe default: no adaptation
    pub fn not_simple() -> Self {
        Self {
            is_simple_icon: false,
            main_color: None,
            is_dark: false,
            needs_adaptation: false,
        }
    }

    /// A flat icon with the given `#rrggbb` color
    pub fn simple(main_color: String, is_dark: bool) -> Self {
        Self {
            is_simple_icon: true,
            main_color: Some(main_color),
            is_dark,
            needs_adaptation: true,
        }
    }

    /// Parse [`Self::main_color`] back into an sRGB value
    pub fn main_color_srgb(&self) -> Option<Srgb<u8>> {
        let hex = self.main_color.as_deref()?;
        ColorConverter::new().hex_to_srgb(hex).ok()
    }
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self::not_simple()
    }
}

/// Unchecked wire form of [`AnalysisResult`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AnalysisRecord {
    is_simple_icon: bool,
    main_color: Option<String>,
    is_dark: bool,
    needs_adaptation: bool,
}

impl Default for AnalysisRecord {
    fn default() -> Self {
        let AnalysisResult {
            is_simple_icon,
            main_color,
            is_dark,
            needs_adaptation,
        } = AnalysisResult::not_simple();
        Self {
            is_simple_icon,
            main_color,
            is_dark,
            needs_adaptation,
        }
    }
}

impl TryFrom<AnalysisRecord> for AnalysisResult {
    type Error = AnalysisError;

    fn try_from(record: AnalysisRecord) -> Result<Self> {
        let invalid = |parameter: &str, value: String| AnalysisError::InvalidParameter {
            parameter: parameter.to_string(),
            value,
        };

        if record.needs_adaptation != record.is_simple_icon {
            return Err(invalid(
                "needsAdaptation",
                format!("{} with isSimpleIcon {}", record.needs_adaptation, record.is_simple_icon),
            ));
        }

        match (record.is_simple_icon, record.main_color) {
            (true, Some(hex)) => {
                let color = ColorConverter::new().hex_to_srgb(&hex)?;
                Ok(Self::simple(
                    ColorConverter::new().to_hex(ColorKey::from(color)),
                    record.is_dark,
                ))
            }
            (true, None) => Err(invalid("mainColor", "null for a simple icon".into())),
            (false, Some(hex)) => Err(invalid("mainColor", format!("{} for a non-simple icon", hex))),
            (false, None) if record.is_dark => {
                Err(invalid("isDark", "true for a non-simple icon".into()))
            }
            (false, None) => Ok(Self::not_simple()),
        }
    }
}

/// Resolve, decode and downsample an icon reference
///
/// # Errors
///
/// Returns `AnalysisError` if the reference is remote or malformed, or the
/// image cannot be read or decoded
pub fn load_icon_sample(
    reference: &str,
    resolver: &SourceResolver,
    config: &AnalyzerConfig,
) -> Result<SampleBuffer> {
    let source = resolver.resolve(reference)?;
    if let ImageSource::File(path) = &source {
        debug!(path = %path.display(), "resolved icon path");
    }
    let image = image_loader::load_source(&source)?;
    Ok(image_loader::prepare_sample(&image, config))
}

/// Analyze an icon reference end to end
///
/// Never fails: unsupported references and load errors are logged and
/// reported as [`AnalysisResult::not_simple`], which leaves the icon
/// unadapted.
pub fn analyze_icon(
    reference: &str,
    resolver: &SourceResolver,
    analyzer: &IconColorAnalyzer,
) -> AnalysisResult {
    let span = info_span!("analyze_icon", icon = source::display_name(reference));
    let _guard = span.enter();

    match load_icon_sample(reference, resolver, analyzer.config()) {
        Ok(sample) => analyzer.analyze(&sample.as_pixel_buffer()),
        Err(AnalysisError::UnsupportedSource { .. }) => {
            debug!("remote icon skipped");
            AnalysisResult::not_simple()
        }
        Err(error) => {
            warn!(%error, "icon analysis failed");
            AnalysisResult::not_simple()
        }
    }
}
