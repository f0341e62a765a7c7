//! Flat-color icon classification
//!
//! Two passes over a small RGBA sample:
//! 1. Build an exact-color histogram of opaque pixels and pick its mode
//! 2. Count opaque pixels close to the mode and derive the similarity and
//!    transparency ratios
//!
//! An icon is "simple" when nearly all of its opaque pixels share the
//! dominant color and part of the sample is transparent background.

use std::fmt;
use std::sync::Arc;

use crate::buffer::PixelBuffer;
use crate::color::{ColorConverter, ColorHistogram, ColorKey};
use crate::config::AnalyzerConfig;
use crate::error::{InsufficientSignal, Result};
use crate::observer::{AnalysisObserver, TracingObserver};
use crate::AnalysisResult;

/// Measurements taken from one pixel buffer
#[derive(Debug, Clone, PartialEq)]
pub struct IconStatistics {
    /// Pixels in the buffer
    pub total_pixels: usize,
    /// Pixels with alpha above the threshold
    pub opaque_pixels: usize,
    /// Opaque pixels within the distance threshold of the dominant color
    pub similar_pixels: usize,
    /// Distinct exact colors among opaque pixels
    pub distinct_colors: usize,
    /// Most frequent exact color among opaque pixels
    pub dominant: ColorKey,
    /// Non-opaque share of all pixels
    pub transparency_ratio: f64,
    /// Similar share of opaque pixels
    pub similarity_ratio: f64,
    /// Normalized luma of the dominant color
    pub luminance: f64,
    pub is_dark: bool,
}

impl IconStatistics {
    /// Both gates must pass: uniform foreground and some transparent background
    pub fn is_pure_color(&self, config: &AnalyzerConfig) -> bool {
        self.similarity_ratio > config.similarity_threshold
            && self.transparency_ratio > config.transparency_threshold
    }
}

/// Classifier for flat single-color icons
///
/// Holds no per-call state; one analyzer can serve concurrent callers.
#[derive(Clone)]
pub struct IconColorAnalyzer {
    config: AnalyzerConfig,
    converter: ColorConverter,
    observer: Arc<dyn AnalysisObserver>,
}

impl Default for IconColorAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IconColorAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconColorAnalyzer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl IconColorAnalyzer {
    /// Create an analyzer with default thresholds that logs through `tracing`
    pub fn new() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            converter: ColorConverter::new(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Create an analyzer with custom thresholds
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidParameter` if the config fails validation
    pub fn with_config(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Replace the diagnostics observer
    pub fn with_observer(mut self, observer: impl AnalysisObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Classify a pixel buffer
    ///
    /// Never fails: a buffer without alpha or without opaque pixels yields
    /// [`AnalysisResult::not_simple`].
    pub fn analyze(&self, buffer: &PixelBuffer<'_>) -> AnalysisResult {
        let stats = match self.inspect(buffer) {
            Ok(stats) => stats,
            Err(reason) => {
                self.observer.on_insufficient_signal(&reason);
                return AnalysisResult::not_simple();
            }
        };

        let is_simple_icon = stats.is_pure_color(&self.config);
        self.observer.on_statistics(&stats, is_simple_icon);

        if !is_simple_icon {
            return AnalysisResult::not_simple();
        }

        AnalysisResult::simple(self.converter.to_hex(stats.dominant), stats.is_dark)
    }

    /// Run both passes and return the raw measurements
    pub fn inspect(
        &self,
        buffer: &PixelBuffer<'_>,
    ) -> std::result::Result<IconStatistics, InsufficientSignal> {
        if !buffer.has_alpha() {
            return Err(InsufficientSignal::MissingAlpha {
                channels: buffer.channels(),
            });
        }

        let histogram = self.build_histogram(buffer);
        let Some((dominant, _)) = histogram.mode() else {
            return Err(InsufficientSignal::NoOpaquePixels);
        };

        let opaque_pixels = histogram.total();
        let total_pixels = buffer.pixel_count();
        let similar_pixels = self.count_similar(buffer, dominant);

        let luminance = self.converter.luminance(dominant);

        Ok(IconStatistics {
            total_pixels,
            opaque_pixels,
            similar_pixels,
            distinct_colors: histogram.distinct(),
            dominant,
            transparency_ratio: (total_pixels - opaque_pixels) as f64 / total_pixels as f64,
            similarity_ratio: similar_pixels as f64 / opaque_pixels as f64,
            luminance,
            is_dark: self
                .converter
                .is_dark(dominant, self.config.dark_luminance_threshold),
        })
    }

    fn is_opaque(&self, pixel: &[u8; 4]) -> bool {
        pixel[3] > self.config.alpha_threshold
    }

    /// Pass 1: exact-color histogram of opaque pixels in scan order
    fn build_histogram(&self, buffer: &PixelBuffer<'_>) -> ColorHistogram {
        buffer
            .rgba_pixels()
            .filter(|p| self.is_opaque(p))
            .map(ColorKey::from_rgba)
            .collect()
    }

    /// Pass 2: opaque pixels strictly closer than the threshold to `dominant`
    fn count_similar(&self, buffer: &PixelBuffer<'_>, dominant: ColorKey) -> usize {
        buffer
            .rgba_pixels()
            .filter(|p| self.is_opaque(p))
            .filter(|p| {
                self.converter.distance(ColorKey::from_rgba(*p), dominant)
                    < self.config.color_distance_threshold
            })
            .count()
    }
}
