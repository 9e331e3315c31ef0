//! User-selected view state: what to show, in which layout, and how
//! strongly to blend the overlay.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::variant::ModelVariant;

/// Which content the preview slots display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentMode {
    /// The uploaded image, unmodified.
    #[default]
    Original,
    /// The variant's recolored raster.
    Segmented,
    /// The recolored raster blended over the original.
    Overlay,
}

impl ContentMode {
    /// All modes in button order.
    pub const ALL: [Self; 3] = [Self::Original, Self::Segmented, Self::Overlay];

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Segmented => "Segmented",
            Self::Overlay => "Overlay",
        }
    }
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One model at a time, or both side by side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// A single slot showing the selected variant.
    #[default]
    Single,
    /// Two slots, variant A then variant B.
    Compare,
}

/// Overlay opacity as an integer percentage in `0..=100`.
///
/// Construction clamps, so an `Opacity` is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Opacity(u8);

impl Opacity {
    /// Fully transparent layer: overlay shows the original.
    pub const MIN: Self = Self(0);
    /// Fully opaque layer: overlay shows the segmentation result.
    pub const MAX: Self = Self(100);

    /// Create an opacity, clamping values above 100.
    #[must_use]
    pub const fn new(percent: u8) -> Self {
        if percent > 100 {
            Self(100)
        } else {
            Self(percent)
        }
    }

    /// The percentage, `0..=100`.
    #[must_use]
    pub const fn percent(self) -> u8 {
        self.0
    }

    /// The opacity as an alpha factor in `[0, 1]`.
    #[must_use]
    pub fn alpha(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::new(crate::types::PipelineConfig::DEFAULT_OPACITY)
    }
}

impl From<u8> for Opacity {
    fn from(percent: u8) -> Self {
        Self::new(percent)
    }
}

impl From<Opacity> for u8 {
    fn from(opacity: Opacity) -> Self {
        opacity.0
    }
}

impl fmt::Display for Opacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Everything the user can select about the preview.
///
/// `selected` only matters in [`Layout::Single`]; `opacity` only matters
/// in [`ContentMode::Overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// What each slot shows.
    pub content: ContentMode,
    /// One slot or two.
    pub layout: Layout,
    /// Variant shown in the single slot.
    pub selected: ModelVariant,
    /// Overlay opacity.
    pub opacity: Opacity,
}

impl ViewState {
    /// Initial view with the given overlay opacity.
    #[must_use]
    pub const fn with_opacity(opacity: Opacity) -> Self {
        Self {
            content: ContentMode::Original,
            layout: Layout::Single,
            selected: ModelVariant::BaseUnet,
            opacity,
        }
    }

    /// The variant shown in each slot, in slot order.
    #[must_use]
    pub fn slot_variants(&self) -> Vec<ModelVariant> {
        match self.layout {
            Layout::Single => vec![self.selected],
            Layout::Compare => ModelVariant::ALL.to_vec(),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::with_opacity(Opacity::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn opacity_clamps() {
        assert_eq!(Opacity::new(150).percent(), 100);
        assert_eq!(Opacity::from(255).percent(), 100);
        assert_eq!(Opacity::new(0).percent(), 0);
        assert_eq!(Opacity::new(42).percent(), 42);
    }

    #[test]
    fn opacity_alpha() {
        assert!(Opacity::MIN.alpha().abs() < f32::EPSILON);
        assert!((Opacity::MAX.alpha() - 1.0).abs() < f32::EPSILON);
        assert!((Opacity::new(50).alpha() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn opacity_display() {
        assert_eq!(Opacity::new(35).to_string(), "35%");
    }

    #[test]
    fn opacity_deserialize_clamps() {
        let o: Opacity = serde_json::from_str("250").unwrap();
        assert_eq!(o, Opacity::MAX);
    }

    #[test]
    fn default_view() {
        let view = ViewState::default();
        assert_eq!(view.content, ContentMode::Original);
        assert_eq!(view.layout, Layout::Single);
        assert_eq!(view.selected, ModelVariant::BaseUnet);
        assert_eq!(view.opacity.percent(), 50);
    }

    #[test]
    fn slot_variants_per_layout() {
        let mut view = ViewState {
            selected: ModelVariant::CbamNet,
            ..ViewState::default()
        };
        assert_eq!(view.slot_variants(), vec![ModelVariant::CbamNet]);
        view.layout = Layout::Compare;
        assert_eq!(
            view.slot_variants(),
            vec![ModelVariant::BaseUnet, ModelVariant::CbamNet]
        );
    }
}
