//! Shared types for the vessel showcase pipeline.

use serde::{Deserialize, Serialize};

use crate::variant::ModelVariant;

/// Re-export `RgbaImage` so downstream crates can reference decoded
/// and composed rasters without depending on `image` directly.
pub use image::RgbaImage;

/// An RGB color triple.
pub type Rgb = [u8; 3];

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an RGBA raster.
    #[must_use]
    pub fn of(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Metadata the browser (or the CLI) reports for a candidate file,
/// available before the bytes are decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    /// File name as shown to the user.
    pub name: String,
    /// Reported media type (e.g. `image/png`). May be empty when the
    /// browser could not determine it.
    pub media_type: String,
    /// Size of the file in bytes.
    pub size: u64,
}

/// One user-supplied file: metadata plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Name, media type, and size.
    pub meta: FileMeta,
    /// The raw file contents.
    pub bytes: Vec<u8>,
}

impl FileCandidate {
    /// Build a candidate whose size is taken from `bytes`.
    #[must_use]
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            meta: FileMeta {
                name: name.into(),
                media_type: media_type.into(),
                size: bytes.len() as u64,
            },
            bytes,
        }
    }
}

/// A file that passed intake and decoded successfully.
///
/// Immutable once created. Replaced wholesale when another upload is
/// published.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    meta: FileMeta,
    bytes: Vec<u8>,
    pixels: RgbaImage,
}

impl UploadedImage {
    /// Wrap decoded pixels together with the file they came from.
    #[must_use]
    pub const fn new(meta: FileMeta, bytes: Vec<u8>, pixels: RgbaImage) -> Self {
        Self {
            meta,
            bytes,
            pixels,
        }
    }

    /// File metadata (name, media type, size).
    #[must_use]
    pub const fn meta(&self) -> &FileMeta {
        &self.meta
    }

    /// The original encoded file bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The decoded RGBA pixels.
    #[must_use]
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Decoded image dimensions.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.pixels)
    }
}

/// The recolored raster produced for one [`ModelVariant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationResult {
    variant: ModelVariant,
    pixels: RgbaImage,
}

impl SegmentationResult {
    /// Pair a raster with the variant that produced it.
    #[must_use]
    pub const fn new(variant: ModelVariant, pixels: RgbaImage) -> Self {
        Self { variant, pixels }
    }

    /// The variant this result belongs to.
    #[must_use]
    pub const fn variant(&self) -> ModelVariant {
        self.variant
    }

    /// The recolored pixels.
    #[must_use]
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Result dimensions.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.pixels)
    }
}

/// Where the variant A result comes from.
///
/// The remote source is a pluggable stand-in for a real model server:
/// variant B is always generated locally, and any remote failure falls
/// back to the local generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentationSource {
    /// Local luminance-threshold recolor.
    #[default]
    Local,
    /// `POST` the original file as multipart form data to `endpoint`.
    Remote {
        /// Absolute URL of the segmentation endpoint.
        endpoint: String,
    },
}

/// Configuration for intake and the initial view.
///
/// Missing fields fall back to their defaults when deserialized, so a
/// partial JSON object such as `{"default_opacity": 80}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Largest accepted file, in bytes. Files strictly larger are
    /// rejected.
    pub max_file_bytes: u64,

    /// Overlay opacity (percent) used initially and after the file is
    /// removed.
    pub default_opacity: u8,

    /// Where variant A results come from.
    pub segmentation_source: SegmentationSource,
}

impl PipelineConfig {
    /// Default upload limit: 5 MiB.
    pub const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

    /// Default overlay opacity in percent.
    pub const DEFAULT_OPACITY: u8 = 50;
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: Self::DEFAULT_MAX_FILE_BYTES,
            default_opacity: Self::DEFAULT_OPACITY,
            segmentation_source: SegmentationSource::default(),
        }
    }
}

/// Errors reported to the user.
///
/// Every variant leaves the previously published state untouched.
/// `Clone` so the session can keep the last error around as a notice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// The file's media type is not an image type.
    #[error("unsupported file type {media_type:?}: please upload an image file")]
    InvalidFileType {
        /// The media type that was reported (possibly empty).
        media_type: String,
    },

    /// The file exceeds the configured size limit.
    #[error("file is {size} bytes, which exceeds the {limit} byte limit")]
    FileTooLarge {
        /// Size of the rejected file in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// The bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    DecodeFailure(String),

    /// The remote segmentation endpoint failed or returned garbage.
    #[error("remote segmentation failed: {0}")]
    RemoteApiFailure(String),
}

impl From<image::ImageError> for PipelineError {
    fn from(err: image::ImageError) -> Self {
        Self::DecodeFailure(err.to_string())
    }
}
