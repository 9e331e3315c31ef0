//! View composition: turn the upload, the cached results, and the
//! current [`ViewState`] into the rasters to display.
//!
//! Composition is pure. It borrows its inputs, never mutates them, and
//! returns freshly allocated rasters, so calling it twice with the same
//! inputs yields the same output.

use image::Rgba;

use crate::segment::VariantResults;
use crate::types::{RgbaImage, UploadedImage};
use crate::variant::ModelVariant;
use crate::view::{ContentMode, Layout, Opacity, ViewState};

/// What one preview slot shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A raster ready to encode and display.
    Ready(RgbaImage),
    /// The slot needs a segmentation result that has not been generated
    /// for the current upload yet.
    Pending,
}

impl Frame {
    /// The raster, if ready.
    #[must_use]
    pub const fn image(&self) -> Option<&RgbaImage> {
        match self {
            Self::Ready(image) => Some(image),
            Self::Pending => None,
        }
    }
}

/// One preview slot: the variant it is captioned with and its frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Variant this slot belongs to.
    pub variant: ModelVariant,
    /// What to draw.
    pub frame: Frame,
}

/// Output of [`compose`]: one slot in single layout, two in compare
/// layout (variant A first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    /// Layout the slots were composed for.
    pub layout: Layout,
    /// Content mode the slots were composed for.
    pub content: ContentMode,
    /// Slots in display order.
    pub slots: Vec<Slot>,
}

impl Composition {
    /// `true` when every slot is ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.slots.iter().all(|s| matches!(s.frame, Frame::Ready(_)))
    }
}

/// Compose the rasters to display for `view`.
///
/// - [`ContentMode::Original`]: every slot is the uploaded image.
/// - [`ContentMode::Segmented`]: every slot is its variant's result.
/// - [`ContentMode::Overlay`]: every slot is its variant's result drawn
///   over the uploaded image at `view.opacity`, see [`blend_over`].
///
/// A slot whose result is missing, or whose result does not match the
/// upload's dimensions, is [`Frame::Pending`].
#[must_use = "returns the composed slots"]
pub fn compose(view: &ViewState, image: &UploadedImage, results: &VariantResults) -> Composition {
    let slots = view
        .slot_variants()
        .into_iter()
        .map(|variant| Slot {
            variant,
            frame: compose_frame(view.content, view.opacity, image, results, variant),
        })
        .collect();

    Composition {
        layout: view.layout,
        content: view.content,
        slots,
    }
}

fn compose_frame(
    content: ContentMode,
    opacity: Opacity,
    image: &UploadedImage,
    results: &VariantResults,
    variant: ModelVariant,
) -> Frame {
    if content == ContentMode::Original {
        return Frame::Ready(image.pixels().clone());
    }

    let Some(result) = results.get(variant) else {
        return Frame::Pending;
    };
    if result.dimensions() != image.dimensions() {
        tracing::warn!(
            %variant,
            "segmentation result does not match the upload's dimensions; not rendering it"
        );
        return Frame::Pending;
    }

    match content {
        ContentMode::Segmented => Frame::Ready(result.pixels().clone()),
        _ => Frame::Ready(blend_over(image.pixels(), result.pixels(), opacity)),
    }
}

/// Draw `layer` over `base` with a constant global alpha (source-over).
///
/// Every layer pixel is scaled by `opacity`, including the white
/// background of a segmentation result, so low opacities fade the whole
/// layer. For an opaque base and opaque layer each channel becomes
/// `base * (1 - a) + layer * a` with `a = opacity / 100`.
///
/// At 0% the base is returned unchanged. A `layer` whose dimensions
/// differ from `base` is not drawn and the base is returned unchanged.
#[must_use = "returns the blended raster"]
pub fn blend_over(base: &RgbaImage, layer: &RgbaImage, opacity: Opacity) -> RgbaImage {
    if base.dimensions() != layer.dimensions() {
        tracing::warn!(
            base = ?base.dimensions(),
            layer = ?layer.dimensions(),
            "layer size differs from base; skipping blend"
        );
        return base.clone();
    }
    if opacity == Opacity::MIN {
        return base.clone();
    }

    let alpha = opacity.alpha();
    let mut out = base.clone();
    for (dst, src) in out.pixels_mut().zip(layer.pixels()) {
        *dst = source_over(*src, *dst, alpha);
    }
    out
}

/// Straight-alpha source-over of one pixel with an extra global alpha.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn source_over(src: Rgba<u8>, dst: Rgba<u8>, global_alpha: f32) -> Rgba<u8> {
    let src_a = global_alpha * f32::from(src[3]) / 255.0;
    let dst_a = f32::from(dst[3]) / 255.0;
    let out_a = dst_a.mul_add(1.0 - src_a, src_a);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| -> u8 {
        let premultiplied = f32::from(s).mul_add(src_a, f32::from(d) * dst_a * (1.0 - src_a));
        (premultiplied / out_a).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::segment::generate;
    use crate::types::FileMeta;

    fn upload(pixels: RgbaImage) -> UploadedImage {
        UploadedImage::new(
            FileMeta {
                name: "test.png".to_string(),
                media_type: "image/png".to_string(),
                size: 0,
            },
            Vec::new(),
            pixels,
        )
    }

    /// Dark left half, light right half, so both colors appear in the
    /// segmentation results.
    fn split_image() -> UploadedImage {
        upload(RgbaImage::from_fn(8, 4, |x, _| {
            if x < 4 {
                Rgba([20, 40, 60, 255])
            } else {
                Rgba([200, 210, 220, 255])
            }
        }))
    }

    fn all_results(image: &UploadedImage) -> VariantResults {
        let mut results = VariantResults::new();
        for variant in ModelVariant::ALL {
            results.insert(generate(image, variant));
        }
        results
    }

    fn view(content: ContentMode, layout: Layout, selected: ModelVariant, opacity: u8) -> ViewState {
        ViewState {
            content,
            layout,
            selected,
            opacity: Opacity::new(opacity),
        }
    }

    fn ready(slot: &Slot) -> &RgbaImage {
        slot.frame.image().unwrap()
    }

    #[test]
    fn original_ignores_variant_and_opacity() {
        let image = split_image();
        let results = all_results(&image);
        for selected in ModelVariant::ALL {
            for opacity in [0, 37, 100] {
                let c = compose(
                    &view(ContentMode::Original, Layout::Single, selected, opacity),
                    &image,
                    &results,
                );
                assert_eq!(c.slots.len(), 1);
                assert_eq!(ready(&c.slots[0]), image.pixels());
            }
        }
    }

    #[test]
    fn original_compare_has_two_identical_slots() {
        let image = split_image();
        let c = compose(
            &view(ContentMode::Original, Layout::Compare, ModelVariant::CbamNet, 50),
            &image,
            &VariantResults::new(),
        );
        assert_eq!(c.slots.len(), 2);
        assert_eq!(c.slots[0].variant, ModelVariant::BaseUnet);
        assert_eq!(c.slots[1].variant, ModelVariant::CbamNet);
        assert_eq!(ready(&c.slots[0]), image.pixels());
        assert_eq!(ready(&c.slots[1]), image.pixels());
    }

    #[test]
    fn segmented_single_shows_selected_result() {
        let image = split_image();
        let results = all_results(&image);
        let c = compose(
            &view(ContentMode::Segmented, Layout::Single, ModelVariant::CbamNet, 50),
            &image,
            &results,
        );
        assert_eq!(c.slots.len(), 1);
        assert_eq!(
            ready(&c.slots[0]),
            results.get(ModelVariant::CbamNet).unwrap().pixels()
        );
    }

    #[test]
    fn segmented_compare_shows_both_results() {
        let image = split_image();
        let results = all_results(&image);
        let c = compose(
            &view(ContentMode::Segmented, Layout::Compare, ModelVariant::BaseUnet, 50),
            &image,
            &results,
        );
        for slot in &c.slots {
            assert_eq!(ready(slot), results.get(slot.variant).unwrap().pixels());
        }
    }

    #[test]
    fn overlay_at_zero_is_original() {
        let image = split_image();
        let results = all_results(&image);
        let c = compose(
            &view(ContentMode::Overlay, Layout::Compare, ModelVariant::BaseUnet, 0),
            &image,
            &results,
        );
        for slot in &c.slots {
            assert_eq!(ready(slot), image.pixels());
        }
    }

    #[test]
    fn overlay_at_hundred_is_result() {
        let image = split_image();
        let results = all_results(&image);
        let c = compose(
            &view(ContentMode::Overlay, Layout::Compare, ModelVariant::BaseUnet, 100),
            &image,
            &results,
        );
        for slot in &c.slots {
            assert_eq!(ready(slot), results.get(slot.variant).unwrap().pixels());
        }
    }

    #[test]
    fn overlay_half_blends_background_too() {
        // Black original under an all-white result: the white background
        // is blended like any other layer pixel.
        let image = upload(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255])));
        let layer = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        let blended = blend_over(image.pixels(), &layer, Opacity::new(50));
        for p in blended.pixels() {
            assert_eq!(p.0, [128, 128, 128, 255]);
        }
    }

    #[test]
    fn overlay_linear_mix_for_opaque_inputs() {
        let base = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 0, 255]));
        let layer = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255]));
        let blended = blend_over(&base, &layer, Opacity::new(25));
        // 200*0.75 = 150, 100*0.75 = 75, 255*0.25 = 63.75
        assert_eq!(blended.get_pixel(0, 0).0, [150, 75, 64, 255]);
    }

    #[test]
    fn overlay_over_transparent_base_takes_layer_color() {
        let base = RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 0]));
        let layer = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
        let blended = blend_over(&base, &layer, Opacity::new(40));
        assert_eq!(blended.get_pixel(0, 0).0, [255, 0, 0, 102]);
    }

    #[test]
    fn blend_with_differently_sized_layer_returns_base() {
        let base = RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 255]));
        for layer in [
            RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255])),
            RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255])),
        ] {
            for opacity in [1, 50, 100] {
                assert_eq!(blend_over(&base, &layer, Opacity::new(opacity)), base);
            }
        }
    }

    #[test]
    fn missing_result_is_pending() {
        let image = split_image();
        let mut results = VariantResults::new();
        results.insert(generate(&image, ModelVariant::BaseUnet));
        let c = compose(
            &view(ContentMode::Segmented, Layout::Compare, ModelVariant::BaseUnet, 50),
            &image,
            &results,
        );
        assert!(matches!(c.slots[0].frame, Frame::Ready(_)));
        assert_eq!(c.slots[1].frame, Frame::Pending);
        assert!(!c.is_ready());
    }

    #[test]
    fn mismatched_result_is_pending() {
        let image = split_image();
        let other = upload(RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255])));
        let mut results = VariantResults::new();
        results.insert(generate(&other, ModelVariant::BaseUnet));
        let c = compose(
            &view(ContentMode::Overlay, Layout::Single, ModelVariant::BaseUnet, 50),
            &image,
            &results,
        );
        assert_eq!(c.slots[0].frame, Frame::Pending);
    }

    #[test]
    fn compose_is_idempotent_and_pure() {
        let image = split_image();
        let results = all_results(&image);
        let image_before = image.clone();
        let results_before = results.clone();
        let v = view(ContentMode::Overlay, Layout::Compare, ModelVariant::BaseUnet, 63);
        let first = compose(&v, &image, &results);
        let second = compose(&v, &image, &results);
        assert_eq!(first, second);
        assert_eq!(image, image_before);
        assert_eq!(results, results_before);
    }
}
