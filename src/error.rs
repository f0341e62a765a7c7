//! Error types for the iconscan library

use thiserror::Error;

/// Result type alias for iconscan operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors raised while resolving, loading or preparing an icon
///
/// None of these ever escape [`crate::analyze_icon`]; they are logged and
/// collapsed into [`crate::AnalysisResult::not_simple`].
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Image bytes could not be read or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Remote references are never fetched
    #[error("Unsupported image source: {reference}")]
    UnsupportedSource { reference: String },

    /// Malformed `data:` URI
    #[error("Invalid data URI: {reason}")]
    InvalidDataUri { reason: String },

    /// Pixel buffer does not match its declared geometry
    #[error("Invalid pixel buffer: {reason}")]
    InvalidBuffer { reason: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Color parsing or conversion error
    #[error("Color conversion error: {message}")]
    ColorConversionError { message: String },

    /// Configuration file could not be read, written or parsed
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AnalysisError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Check if retrying with a different reference could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::ImageLoadError { .. }
                | AnalysisError::InvalidDataUri { .. }
                | AnalysisError::UnsupportedSource { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::ImageLoadError { .. } => {
                "Could not load the icon. Please check the file format and try again.".to_string()
            }
            AnalysisError::UnsupportedSource { .. } => {
                "Remote icons are not supported. Please use a local file or an embedded image."
                    .to_string()
            }
            AnalysisError::InvalidDataUri { .. } => {
                "The embedded image data is malformed.".to_string()
            }
            AnalysisError::InvalidParameter { parameter, .. } => {
                format!("The analyzer setting '{}' is out of range.", parameter)
            }
            _ => "Icon analysis failed. The icon will be shown without adaptation.".to_string(),
        }
    }
}

/// Reasons an otherwise valid buffer carries no usable icon signal
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsufficientSignal {
    /// Only RGBA buffers can describe a foreground over a transparent background
    #[error("buffer has no alpha channel ({channels} channels)")]
    MissingAlpha { channels: u8 },

    /// Every pixel is at or below the opacity threshold
    #[error("buffer has no opaque pixels")]
    NoOpaquePixels,
}
