//! The two pretend model variants and their fixed threshold/color table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Rgb;

/// One of the two fixed configurations standing in for a trained model.
///
/// Neither variant runs a real network; each is a luminance threshold
/// paired with the color used to paint "vessel" pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelVariant {
    /// Variant A: threshold 100, painted red.
    BaseUnet,
    /// Variant B: threshold 90, painted blue.
    CbamNet,
}

impl ModelVariant {
    /// All variants in generation and comparison order (A, then B).
    pub const ALL: [Self; 2] = [Self::BaseUnet, Self::CbamNet];

    /// Luminance below which a pixel is painted with [`mark_color`](Self::mark_color).
    #[must_use]
    pub const fn threshold(self) -> u8 {
        match self {
            Self::BaseUnet => 100,
            Self::CbamNet => 90,
        }
    }

    /// Color used for pixels below the threshold.
    #[must_use]
    pub const fn mark_color(self) -> Rgb {
        match self {
            Self::BaseUnet => [255, 0, 0],
            Self::CbamNet => [0, 0, 255],
        }
    }

    /// Display name shown on buttons and slot captions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BaseUnet => "BaseU-Net",
            Self::CbamNet => "CBAM-Net",
        }
    }

    /// Position in [`ALL`](Self::ALL).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::BaseUnet => 0,
            Self::CbamNet => 1,
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
