//! Raster image encoding and Blob URL creation.
//!
//! Converts composed `RgbaImage` frames to browser-displayable Blob URLs
//! by encoding to PNG and creating object URLs via the Web API.

use image::ImageEncoder;
use vessel_pipeline::types::RgbaImage;
use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur during raster-to-Blob-URL conversion.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(String),

    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for RasterError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

impl From<image::ImageError> for RasterError {
    fn from(err: image::ImageError) -> Self {
        Self::PngEncode(err.to_string())
    }
}

/// Encode an RGBA frame to PNG bytes.
///
/// # Errors
///
/// Returns [`RasterError::PngEncode`] if encoding fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RasterError> {
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(png_bytes)
}

/// Wrap raw bytes in a Blob of the given media type.
///
/// # Errors
///
/// Returns [`RasterError::JsError`] if Blob creation fails.
pub fn bytes_to_blob(bytes: &[u8], media_type: &str) -> Result<web_sys::Blob, RasterError> {
    let uint8_array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&uint8_array);

    let opts = BlobPropertyBag::new();
    opts.set_type(media_type);
    Ok(web_sys::Blob::new_with_u8_array_sequence_and_options(
        &parts, &opts,
    )?)
}

/// Encode an `RgbaImage` as a PNG Blob URL for use as an `<img src>`.
///
/// The returned URL must be revoked via [`revoke_blob_url`] when no
/// longer needed to avoid memory leaks.
///
/// # Errors
///
/// Returns [`RasterError::PngEncode`] if PNG encoding fails.
/// Returns [`RasterError::JsError`] if Blob or URL creation fails.
pub fn rgba_image_to_blob_url(image: &RgbaImage) -> Result<String, RasterError> {
    let png_bytes = encode_png(image)?;
    let blob = bytes_to_blob(&png_bytes, "image/png")?;
    Ok(web_sys::Url::create_object_url_with_blob(&blob)?)
}

/// Revoke a Blob URL previously created by [`rgba_image_to_blob_url`].
///
/// Best-effort: failures are silently ignored since the URL may have
/// already been revoked or garbage collected.
pub fn revoke_blob_url(url: &str) {
    let _ = web_sys::Url::revoke_object_url(url);
}
