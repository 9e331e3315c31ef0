//! vessel-pipeline: Pure image pipeline for the vessel showcase (sans-IO).
//!
//! Takes one uploaded image through:
//! intake -> pseudo-segmentation (variant A, then B) -> view composition.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. All browser/filesystem
//! interaction lives in `vessel-io` and the binaries.

pub mod compose;
pub mod intake;
pub mod presentation;
pub mod remote;
pub mod segment;
pub mod session;
pub mod showcase;
pub mod types;
pub mod variant;
pub mod view;

pub use compose::{Composition, Frame, Slot};
pub use segment::VariantResults;
pub use session::{Action, Generation, Outcome, Session, Status};
pub use types::{
    Dimensions, FileCandidate, FileMeta, PipelineConfig, PipelineError, SegmentationResult,
    SegmentationSource, UploadedImage,
};
pub use variant::ModelVariant;
pub use view::{ContentMode, Layout, Opacity, ViewState};

/// Everything produced for one file: the decoded upload, both variants'
/// results, and the composed view.
#[derive(Debug, Clone)]
pub struct Preview {
    /// The decoded upload.
    pub image: UploadedImage,
    /// One result per variant.
    pub results: VariantResults,
    /// Slots for the requested view.
    pub composition: Composition,
}

/// Run the whole pipeline synchronously on one file.
///
/// # Pipeline steps
///
/// 1. Validate the file's metadata against `config`
/// 2. Decode to RGBA
/// 3. Generate variant A, then variant B
/// 4. Compose `view`
///
/// Segmentation always runs locally here; the remote source is a
/// browser-only strategy.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidFileType`] or
/// [`PipelineError::FileTooLarge`] if intake rejects the file.
/// Returns [`PipelineError::DecodeFailure`] if the bytes do not decode.
pub fn run(
    candidate: FileCandidate,
    config: &PipelineConfig,
    view: &ViewState,
) -> Result<Preview, PipelineError> {
    let image = intake::accept(candidate, config)?;

    let mut results = VariantResults::new();
    while let Some(variant) = results.first_missing() {
        results.insert(segment::generate(&image, variant));
    }

    let composition = compose::compose(view, &image, &results);
    Ok(Preview {
        image,
        results,
        composition,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn encode_png(img: &image::RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn run_produces_both_results_and_a_ready_composition() {
        let img = image::RgbaImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        let view = ViewState {
            content: ContentMode::Segmented,
            layout: Layout::Compare,
            ..ViewState::default()
        };
        let preview = run(
            FileCandidate::new("half.png", "image/png", encode_png(&img)),
            &PipelineConfig::default(),
            &view,
        )
        .unwrap();

        assert!(preview.results.is_complete());
        assert!(preview.composition.is_ready());
        assert_eq!(preview.composition.slots.len(), 2);
        let b = preview.composition.slots[1].frame.image().unwrap();
        assert_eq!(b.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(b.get_pixel(7, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn run_rejects_non_image() {
        let result = run(
            FileCandidate::new("notes.txt", "text/plain", b"hello".to_vec()),
            &PipelineConfig::default(),
            &ViewState::default(),
        );
        assert!(matches!(result, Err(PipelineError::InvalidFileType { .. })));
    }
}
