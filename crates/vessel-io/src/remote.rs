//! Remote segmentation over `fetch`.
//!
//! Posts the original upload as multipart form data and parses the JSON
//! reply with [`vessel_pipeline::remote::parse_response`]. Callers fall
//! back to local generation on any error.

use vessel_pipeline::remote::{IMAGE_FIELD, parse_response};
use vessel_pipeline::{ModelVariant, PipelineError, SegmentationResult, UploadedImage};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::raster::bytes_to_blob;

/// Errors from the remote segmentation round trip.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// A browser API call returned an error or a required object was missing.
    #[error("browser API error: {0}")]
    JsError(String),

    /// The server answered with a non-success status.
    #[error("server returned HTTP {0}")]
    Status(u16),

    /// The body arrived but could not be turned into a result.
    #[error(transparent)]
    Rejected(PipelineError),
}

impl From<JsValue> for RemoteError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

impl From<crate::raster::RasterError> for RemoteError {
    fn from(err: crate::raster::RasterError) -> Self {
        Self::JsError(err.to_string())
    }
}

impl From<RemoteError> for PipelineError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Rejected(inner) => inner,
            other => Self::RemoteApiFailure(other.to_string()),
        }
    }
}

/// Ask `endpoint` to segment `image` for `variant`.
///
/// # Errors
///
/// Returns [`RemoteError::JsError`] if the request cannot be built or
/// sent, [`RemoteError::Status`] on a non-2xx reply, and
/// [`RemoteError::Rejected`] if the body does not parse into an image of
/// the upload's dimensions.
#[allow(clippy::future_not_send)] // WASM is single-threaded; fetch types are !Send
pub async fn request_segmentation(
    endpoint: &str,
    image: &UploadedImage,
    variant: ModelVariant,
) -> Result<SegmentationResult, RemoteError> {
    let meta = image.meta();
    let blob = bytes_to_blob(image.bytes(), &meta.media_type)?;
    let form = web_sys::FormData::new()?;
    form.append_with_blob_and_filename(IMAGE_FIELD, &blob, &meta.name)?;

    let init = web_sys::RequestInit::new();
    init.set_method("POST");
    init.set_mode(web_sys::RequestMode::Cors);
    init.set_body(&form);
    let request = web_sys::Request::new_with_str_and_init(endpoint, &init)?;

    let window = web_sys::window().ok_or_else(|| RemoteError::JsError("no global window".into()))?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(RemoteError::Status(response.status()));
    }

    let body = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| RemoteError::JsError("response body is not text".into()))?;

    parse_response(&body, variant, image.dimensions()).map_err(RemoteError::Rejected)
}
