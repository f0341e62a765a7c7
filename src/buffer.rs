//! Pixel buffers handed to the analyzer
//!
//! [`PixelBuffer`] is a borrowed, row-major view over decoded pixels.
//! [`SampleBuffer`] owns the bytes produced by the image loader.

use image::RgbaImage;

use crate::error::{AnalysisError, Result};

/// Immutable row-major view over `width * height` pixels
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    channels: u8,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap raw pixel bytes
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidBuffer` if `channels` is not 1-4 or
    /// the byte length does not match `width * height * channels`.
    pub fn new(data: &'a [u8], width: u32, height: u32, channels: u8) -> Result<Self> {
        if !(1..=4).contains(&channels) {
            return Err(AnalysisError::InvalidBuffer {
                reason: format!("unsupported channel count {}", channels),
            });
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels as usize))
            .ok_or_else(|| AnalysisError::InvalidBuffer {
                reason: format!("{}x{}x{} overflows", width, height, channels),
            })?;

        if data.len() != expected {
            return Err(AnalysisError::InvalidBuffer {
                reason: format!(
                    "expected {} bytes for {}x{}x{}, got {}",
                    expected,
                    width,
                    height,
                    channels,
                    data.len()
                ),
            });
        }

        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Wrap an RGBA8 byte slice
    pub fn rgba(data: &'a [u8], width: u32, height: u32) -> Result<Self> {
        Self::new(data, width, height, 4)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Only RGBA buffers carry the transparency the classifier relies on.
    /// Gray+alpha must be expanded to RGBA first.
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// RGBA pixels in scan order. Empty unless [`Self::has_alpha`].
    pub fn rgba_pixels(&self) -> impl Iterator<Item = [u8; 4]> + 'a {
        let data: &'a [u8] = if self.has_alpha() { self.data } else { &[] };
        data.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

impl<'a> From<&'a RgbaImage> for PixelBuffer<'a> {
    fn from(image: &'a RgbaImage) -> Self {
        Self {
            data: image.as_raw(),
            width: image.width(),
            height: image.height(),
            channels: 4,
        }
    }
}

/// Owned pixel data produced by [`crate::image_loader::prepare_sample`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl SampleBuffer {
    /// Take ownership of raw pixel bytes, validating their geometry
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Result<Self> {
        PixelBuffer::new(&data, width, height, channels)?;
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// A 0x0 buffer that only carries its channel layout
    pub fn empty(channels: u8) -> Self {
        Self {
            data: Vec::new(),
            width: 0,
            height: 0,
            channels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Borrow as a [`PixelBuffer`]
    pub fn as_pixel_buffer(&self) -> PixelBuffer<'_> {
        PixelBuffer {
            data: &self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

impl From<RgbaImage> for SampleBuffer {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.into_raw(),
            width,
            height,
            channels: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_buffer_geometry() {
        let data = vec![0u8; 2 * 3 * 4];
        let buffer = PixelBuffer::rgba(&data, 2, 3).unwrap();
        assert_eq!(buffer.pixel_count(), 6);
        assert!(buffer.has_alpha());
        assert_eq!(buffer.rgba_pixels().count(), 6);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let data = vec![0u8; 15];
        let err = PixelBuffer::rgba(&data, 2, 2).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidBuffer { .. }));
    }

    #[test]
    fn test_bad_channel_count_rejected() {
        assert!(PixelBuffer::new(&[], 0, 0, 0).is_err());
        assert!(PixelBuffer::new(&[], 0, 0, 5).is_err());
    }

    #[test]
    fn test_rgb_buffer_has_no_alpha() {
        let data = vec![255u8; 4 * 3];
        let buffer = PixelBuffer::new(&data, 2, 2, 3).unwrap();
        assert!(!buffer.has_alpha());
        assert_eq!(buffer.rgba_pixels().count(), 0);
    }

    #[test]
    fn test_zero_sized_buffer() {
        let buffer = PixelBuffer::rgba(&[], 0, 0).unwrap();
        assert_eq!(buffer.pixel_count(), 0);
        assert_eq!(buffer.rgba_pixels().count(), 0);
    }

    #[test]
    fn test_pixels_in_scan_order() {
        let image = RgbaImage::from_fn(2, 2, |x, y| image::Rgba([x as u8, y as u8, 0, 255]));
        let buffer = PixelBuffer::from(&image);
        let pixels: Vec<[u8; 4]> = buffer.rgba_pixels().collect();
        assert_eq!(
            pixels,
            vec![[0, 0, 0, 255], [1, 0, 0, 255], [0, 1, 0, 255], [1, 1, 0, 255]]
        );
    }

    #[test]
    fn test_sample_buffer_view() {
        let sample = SampleBuffer::from(RgbaImage::new(4, 4));
        let view = sample.as_pixel_buffer();
        assert_eq!(view.width(), 4);
        assert_eq!(view.as_bytes().len(), 64);
        assert!(SampleBuffer::new(vec![0; 10], 2, 2, 3).is_err());
    }

    #[test]
    fn test_empty_sample_keeps_channels() {
        let sample = SampleBuffer::empty(3);
        let view = sample.as_pixel_buffer();
        assert_eq!(view.channels(), 3);
        assert!(!view.has_alpha());
        assert_eq!(view.pixel_count(), 0);
    }
}
