//! Image reference resolution
//!
//! Icons arrive as strings: inline `data:` URIs, `file:` URLs, bundled
//! asset paths, or plain filesystem paths. [`SourceResolver`] turns them
//! into an [`ImageSource`] the loader can read. Remote `http(s)` references
//! are rejected here, before anything is fetched or decoded.

use std::fmt;
use std::path::{Path, PathBuf};

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::error::{AnalysisError, Result};

/// Where the icon bytes come from
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Inline bytes from a `data:` URI
    DataUri { mime: Option<String>, bytes: Vec<u8> },
    /// File on disk
    File(PathBuf),
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::DataUri { mime, bytes } => f
                .debug_struct("DataUri")
                .field("mime", mime)
                .field("len", &bytes.len())
                .finish(),
            ImageSource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Asset layout the application is running from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Unbundled sources; built assets may or may not exist yet
    Development,
    /// Bundled output under `out/renderer`
    #[default]
    Production,
}

/// Maps icon references to concrete sources relative to an application root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResolver {
    app_root: PathBuf,
    mode: BuildMode,
}

impl Default for SourceResolver {
    fn default() -> Self {
        Self::new(".")
    }
}

impl SourceResolver {
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        Self {
            app_root: app_root.into(),
            mode: BuildMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Resolve a reference into an [`ImageSource`]
    ///
    /// # Errors
    ///
    /// - `UnsupportedSource` for `http://` and `https://` references
    /// - `InvalidDataUri` for malformed `data:` URIs
    /// - `ImageLoadError` for `file:` URLs with invalid percent-encoding
    pub fn resolve(&self, reference: &str) -> Result<ImageSource> {
        if reference.starts_with("data:") {
            return parse_data_uri(reference);
        }

        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Err(AnalysisError::UnsupportedSource {
                reference: reference.to_string(),
            });
        }

        let path = if reference.starts_with("file:") {
            file_url_to_path(reference)?
        } else {
            reference.to_string()
        };

        Ok(ImageSource::File(self.resolve_path(&path)))
    }

    /// Map asset-style paths onto the application layout
    fn resolve_path(&self, path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("/src/") {
            return self.app_root.join("src").join("renderer").join("src").join(rest);
        }

        if path.starts_with("./assets/") || path.starts_with("assets/") {
            let asset = path.strip_prefix("./").unwrap_or(path);
            let bundled = self.app_root.join("out").join("renderer").join(asset);
            return match self.mode {
                BuildMode::Production => bundled,
                BuildMode::Development if bundled.exists() => bundled,
                BuildMode::Development => self.app_root.join("src").join("renderer").join(asset),
            };
        }

        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.app_root.join(path)
        }
    }
}

/// Short name for log lines
pub fn display_name(reference: &str) -> &str {
    if reference.starts_with("data:") {
        return "data-uri";
    }
    match reference.rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() => name,
        _ => "unknown",
    }
}

/// Standard alphabet that tolerates missing padding and non-zero trailing
/// bits, as browsers do for `data:` URIs
const DATA_URI_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

fn parse_data_uri(reference: &str) -> Result<ImageSource> {
    let body = &reference["data:".len()..];
    let (header, payload) = body.split_once(',').ok_or_else(|| AnalysisError::InvalidDataUri {
        reason: "missing ',' separator".into(),
    })?;

    let mut params = header.split(';');
    let mime = params
        .next()
        .filter(|m| !m.is_empty())
        .map(|m| m.to_ascii_lowercase());

    if let Some(mime) = &mime {
        if !mime.starts_with("image/") {
            return Err(AnalysisError::InvalidDataUri {
                reason: format!("not an image: {}", mime),
            });
        }
    }

    let bytes = if params.any(|p| p.eq_ignore_ascii_case("base64")) {
        // Payloads may be percent-escaped and line-wrapped
        let mut text = urlencoding::decode_binary(payload.as_bytes()).into_owned();
        text.retain(|b| !b.is_ascii_whitespace());
        DATA_URI_BASE64
            .decode(&text)
            .map_err(|e| AnalysisError::InvalidDataUri {
                reason: format!("bad base64 payload: {}", e),
            })?
    } else {
        urlencoding::decode_binary(payload.as_bytes()).into_owned()
    };

    Ok(ImageSource::DataUri { mime, bytes })
}

fn file_url_to_path(reference: &str) -> Result<String> {
    let stripped = reference
        .strip_prefix("file://")
        .or_else(|| reference.strip_prefix("file:\\"))
        .or_else(|| reference.strip_prefix("file:"))
        .unwrap_or(reference);

    let decoded = urlencoding::decode(stripped)
        .map_err(|e| AnalysisError::image_load(format!("Invalid file URL: {}", reference), e))?;

    Ok(to_platform_path(&decoded))
}

/// `/C:/dir/icon.png` becomes `C:\dir\icon.png` on Windows
fn to_platform_path(path: &str) -> String {
    if !cfg!(windows) {
        return path.to_string();
    }
    let bytes = path.as_bytes();
    let path = if bytes.len() >= 3 && bytes[0] == b'/' && bytes[1].is_ascii_alphabetic() && bytes[2] == b':' {
        &path[1..]
    } else {
        path
    };
    path.replace('/', "\\")
}
