//! Color primitives for icon classification
//!
//! Provides:
//! - Exact RGB histogram keys
//! - Rec. 601 luma on gamma-encoded channels
//! - Euclidean RGB distance
//! - Hex color representation

use palette::Srgb;
use crate::constants::luma;
use crate::{AnalysisError, Result};

/// Exact RGB triple; alpha is never part of the key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorKey {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorKey {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Key for the color channels of an RGBA pixel
    pub const fn from_rgba(pixel: [u8; 4]) -> Self {
        Self::new(pixel[0], pixel[1], pixel[2])
    }
}

impl From<Srgb<u8>> for ColorKey {
    fn from(color: Srgb<u8>) -> Self {
        Self::new(color.red, color.green, color.blue)
    }
}

impl From<ColorKey> for Srgb<u8> {
    fn from(key: ColorKey) -> Self {
        Srgb::new(key.r, key.g, key.b)
    }
}

/// Stateless color math used by the analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl ColorConverter {
    pub fn new() -> Self {
        Self
    }

    /// Normalized perceptual luma in [0, 1]
    ///
    /// Not gamma-corrected: the result only feeds a binary light/dark split.
    pub fn luminance(&self, color: ColorKey) -> f64 {
        (luma::RED * color.r as f64 + luma::GREEN * color.g as f64 + luma::BLUE * color.b as f64)
            / 255.0
    }

    /// Whether `color` falls below the darkness threshold
    pub fn is_dark(&self, color: ColorKey, threshold: f64) -> bool {
        self.luminance(color) < threshold
    }

    /// Euclidean distance in RGB space
    pub fn distance(&self, a: ColorKey, b: ColorKey) -> f64 {
        let dr = a.r as i32 - b.r as i32;
        let dg = a.g as i32 - b.g as i32;
        let db = a.b as i32 - b.b as i32;
        ((dr * dr + dg * dg + db * db) as f64).sqrt()
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self, color: ColorKey) -> String {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    }

    /// Parse hexadecimal color string to sRGB
    ///
    /// # Arguments
    ///
    /// * `hex` - Hex color string (e.g., "#ff0000" or "FF0000")
    ///
    /// # Errors
    ///
    /// Returns error if hex string is invalid
    pub fn hex_to_srgb(&self, hex: &str) -> Result<Srgb<u8>> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(AnalysisError::ColorConversionError {
                message: format!("Invalid hex color '{}': expected 6 hex digits", hex),
            });
        }

        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&digits[range], 16).map_err(|e| {
                AnalysisError::ColorConversionError {
                    message: format!("Invalid {} value in '{}': {}", name, hex, e),
                }
            })
        };

        Ok(Srgb::new(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }
}
