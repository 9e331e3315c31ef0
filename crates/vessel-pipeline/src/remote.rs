//! Parsing for the remote segmentation endpoint's response.
//!
//! The endpoint receives the original file as multipart form data under
//! [`IMAGE_FIELD`] and answers with `{"segmentedImage": "..."}`, where the
//! value is either a `data:` URI or bare base64. Transport lives in the
//! browser crate; this module only turns a response body into a
//! [`SegmentationResult`].

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, PipelineError, SegmentationResult};
use crate::variant::ModelVariant;

/// Multipart form field carrying the uploaded file.
pub const IMAGE_FIELD: &str = "image";

/// The endpoint's JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResponse {
    /// Encoded image, as a data URI or bare base64. Absent when the
    /// server had nothing to return.
    #[serde(rename = "segmentedImage", default)]
    pub segmented_image: Option<String>,
}

/// Strip a `data:<type>;base64,` prefix if present.
#[must_use]
pub fn strip_data_uri(value: &str) -> &str {
    let value = value.trim();
    if value.starts_with("data:") {
        value.split_once(',').map_or(value, |(_, payload)| payload)
    } else {
        value
    }
}

/// Parse a response body into the result for `variant`.
///
/// The decoded image must have the same dimensions as the upload it was
/// requested for.
///
/// # Errors
///
/// Returns [`PipelineError::RemoteApiFailure`] if the body is not the
/// expected JSON, the image field is missing, the payload is not valid
/// base64, the image does not decode, or its dimensions differ from
/// `expected`.
pub fn parse_response(
    body: &str,
    variant: ModelVariant,
    expected: Dimensions,
) -> Result<SegmentationResult, PipelineError> {
    let response: RemoteResponse = serde_json::from_str(body)
        .map_err(|e| PipelineError::RemoteApiFailure(format!("invalid response JSON: {e}")))?;

    let encoded = response.segmented_image.ok_or_else(|| {
        PipelineError::RemoteApiFailure("response has no segmentedImage".to_string())
    })?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(strip_data_uri(&encoded))
        .map_err(|e| PipelineError::RemoteApiFailure(format!("invalid base64: {e}")))?;

    let pixels = image::load_from_memory(&bytes)
        .map_err(|e| PipelineError::RemoteApiFailure(format!("undecodable image: {e}")))?
        .to_rgba8();

    let actual = Dimensions::of(&pixels);
    if actual != expected {
        return Err(PipelineError::RemoteApiFailure(format!(
            "result is {}x{}, expected {}x{}",
            actual.width, actual.height, expected.width, expected.height
        )));
    }

    tracing::debug!(%variant, width = actual.width, height = actual.height, "parsed remote result");
    Ok(SegmentationResult::new(variant, pixels))
}
