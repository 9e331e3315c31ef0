//! File intake: validation, decoding, and file-size formatting.
//!
//! Validation looks only at [`FileMeta`] so callers can reject a file
//! before touching its bytes. Decoding turns an accepted
//! [`FileCandidate`] into an [`UploadedImage`].

use crate::types::{FileCandidate, FileMeta, PipelineConfig, PipelineError, UploadedImage};

/// File extensions recognised by [`media_type_for_name`], with the media
/// type each one maps to.
const EXTENSION_MEDIA_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
];

/// Look up the media type for a file name by its extension.
///
/// Used by callers that have no reported type, such as the CLI reading
/// from disk. [`validate`] itself never guesses.
#[must_use]
pub fn media_type_for_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    EXTENSION_MEDIA_TYPES
        .iter()
        .find(|(e, _)| e.eq_ignore_ascii_case(ext))
        .map(|(_, media_type)| *media_type)
}

/// Whether `media_type` names an image type (`image/<subtype>`).
#[must_use]
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .trim()
        .split_once('/')
        .is_some_and(|(top, sub)| top.eq_ignore_ascii_case("image") && !sub.is_empty())
}

/// Check a candidate file against the intake rules.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidFileType`] if the reported media type
/// is not an image type, including when it is empty. Returns
/// [`PipelineError::FileTooLarge`] if the file is larger than
/// `config.max_file_bytes`.
pub fn validate(meta: &FileMeta, config: &PipelineConfig) -> Result<(), PipelineError> {
    if !is_image_media_type(&meta.media_type) {
        return Err(PipelineError::InvalidFileType {
            media_type: meta.media_type.trim().to_string(),
        });
    }
    if meta.size > config.max_file_bytes {
        return Err(PipelineError::FileTooLarge {
            size: meta.size,
            limit: config.max_file_bytes,
        });
    }
    Ok(())
}

/// Decode an accepted candidate into an [`UploadedImage`].
///
/// Supports whatever the `image` crate was built with (PNG, JPEG, BMP,
/// WebP, GIF). The pixels are converted to 8-bit RGBA.
///
/// # Errors
///
/// Returns [`PipelineError::DecodeFailure`] if the bytes are empty, the
/// format is unrecognized, or the data is corrupt.
pub fn decode(candidate: FileCandidate) -> Result<UploadedImage, PipelineError> {
    if candidate.bytes.is_empty() {
        return Err(PipelineError::DecodeFailure("file is empty".to_string()));
    }

    let pixels = image::load_from_memory(&candidate.bytes)?.to_rgba8();
    tracing::debug!(
        name = %candidate.meta.name,
        width = pixels.width(),
        height = pixels.height(),
        "decoded upload"
    );
    Ok(UploadedImage::new(candidate.meta, candidate.bytes, pixels))
}

/// Validate and decode in one step.
///
/// # Errors
///
/// Any error from [`validate`] or [`decode`].
pub fn accept(
    candidate: FileCandidate,
    config: &PipelineConfig,
) -> Result<UploadedImage, PipelineError> {
    validate(&candidate.meta, config)?;
    decode(candidate)
}

/// Format a byte count for display: bytes below 1024, KB below 1 MiB,
/// MB otherwise, with two decimals for the scaled units.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.2} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    }
}
