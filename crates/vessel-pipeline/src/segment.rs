//! Pseudo-segmentation: a per-pixel luminance threshold recolor.
//!
//! This is not a segmentation algorithm. Each pixel is classified on its
//! own luminance, with no spatial context: pixels darker than the
//! variant's threshold are painted the variant's mark color, everything
//! else becomes white. Output is always fully opaque.

use image::Rgba;

use crate::types::{RgbaImage, SegmentationResult, UploadedImage};
use crate::variant::ModelVariant;

/// Opaque white, used for every pixel at or above the threshold.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Luminance of an RGB triple: `0.2989 R + 0.5870 G + 0.1140 B`.
///
/// Evaluated left to right in `f64` so that values landing exactly on a
/// threshold classify the same way as the browser page did.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.2989 * f64::from(r) + 0.5870 * f64::from(g) + 0.1140 * f64::from(b)
}

/// Classify a single pixel for `variant`. Alpha is ignored.
#[must_use]
pub fn classify(pixel: Rgba<u8>, variant: ModelVariant) -> Rgba<u8> {
    let [r, g, b, _] = pixel.0;
    if luminance(r, g, b) < f64::from(variant.threshold()) {
        let [mr, mg, mb] = variant.mark_color();
        Rgba([mr, mg, mb, 255])
    } else {
        BACKGROUND
    }
}

/// Recolor a raster for `variant`. The output has the input's dimensions.
#[must_use = "returns the recolored raster"]
pub fn recolor(pixels: &RgbaImage, variant: ModelVariant) -> RgbaImage {
    let mut out = RgbaImage::new(pixels.width(), pixels.height());
    for (src, dst) in pixels.pixels().zip(out.pixels_mut()) {
        *dst = classify(*src, variant);
    }
    out
}

/// Generate the [`SegmentationResult`] for one variant of an upload.
#[must_use = "returns the segmentation result"]
pub fn generate(image: &UploadedImage, variant: ModelVariant) -> SegmentationResult {
    let pixels = recolor(image.pixels(), variant);
    let result = SegmentationResult::new(variant, pixels);
    tracing::debug!(
        %variant,
        width = result.pixels().width(),
        height = result.pixels().height(),
        marked = marked_fraction(&result),
        "generated pseudo-segmentation"
    );
    result
}

/// Fraction of pixels painted with the variant's mark color, in `[0, 1]`.
///
/// Returns `0.0` for an empty raster.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn marked_fraction(result: &SegmentationResult) -> f64 {
    let pixels = result.pixels();
    let total = u64::from(pixels.width()) * u64::from(pixels.height());
    if total == 0 {
        return 0.0;
    }
    let [mr, mg, mb] = result.variant().mark_color();
    let mark = Rgba([mr, mg, mb, 255]);
    let marked = pixels.pixels().filter(|p| **p == mark).count();
    marked as f64 / total as f64
}

/// Per-variant cache of segmentation results for the current upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantResults {
    slots: [Option<SegmentationResult>; 2],
}

impl VariantResults {
    /// An empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [None, None],
        }
    }

    /// The stored result for `variant`, if generation has completed.
    #[must_use]
    pub fn get(&self, variant: ModelVariant) -> Option<&SegmentationResult> {
        self.slots[variant.index()].as_ref()
    }

    /// Store a result, replacing any previous one for the same variant.
    pub fn insert(&mut self, result: SegmentationResult) {
        let index = result.variant().index();
        self.slots[index] = Some(result);
    }

    /// Number of variants with a stored result.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// `true` when no result is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` once every variant has a result.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The first variant (in [`ModelVariant::ALL`] order) still missing a
    /// result.
    #[must_use]
    pub fn first_missing(&self) -> Option<ModelVariant> {
        ModelVariant::ALL
            .into_iter()
            .find(|v| self.get(*v).is_none())
    }
}
