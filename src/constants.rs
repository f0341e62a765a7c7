//! Policy constants for flat-color icon classification
//!
//! These values encode a specific visual tuning for icon backgrounds.
//! They are exposed through [`crate::config::AnalyzerConfig`] so callers can
//! experiment, but the defaults should stay as they are.

/// Classification thresholds
pub mod thresholds {
    /// A pixel is opaque when its alpha is strictly greater than this value.
    /// Majority opacity rather than 255 so anti-aliased edges still count.
    pub const ALPHA_OPAQUE_THRESHOLD: u8 = 128;

    /// Euclidean RGB distance below which a pixel matches the dominant color
    pub const COLOR_DISTANCE_THRESHOLD: f64 = 30.0;

    /// Share of opaque pixels that must match the dominant color
    pub const SIMILARITY_RATIO_THRESHOLD: f64 = 0.85;

    /// Share of sampled pixels that must be transparent
    pub const TRANSPARENCY_RATIO_THRESHOLD: f64 = 0.1;

    /// Normalized luma below which a color counts as dark
    pub const DARK_LUMINANCE_THRESHOLD: f64 = 0.5;
}

/// Downsampling target
pub mod sampling {
    /// Sample width in pixels
    pub const SAMPLE_WIDTH: u32 = 32;

    /// Sample height in pixels
    pub const SAMPLE_HEIGHT: u32 = 32;

    /// Edge of the square SVG icons are rasterized onto before sampling
    pub const SVG_RENDER_SIZE: u32 = 128;
}

/// Rec. 601 luma weights, applied to gamma-encoded channels
pub mod luma {
    pub const RED: f64 = 0.299;
    pub const GREEN: f64 = 0.587;
    pub const BLUE: f64 = 0.114;
}
