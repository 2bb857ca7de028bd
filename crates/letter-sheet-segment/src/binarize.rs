//! Grayscale to ink mask conversion.

use crate::morph;
use crate::threshold::otsu_threshold;
use letter_sheet_core::{BinaryMask, PlaneView};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Binarization settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarizeParams {
    /// Fixed global threshold. `None` selects one with Otsu's method.
    pub threshold: Option<u8>,
    /// Side of the square structuring element used for cleanup.
    pub kernel_size: usize,
    /// Closing iterations (bridge gaps inside strokes).
    pub close_iterations: usize,
    /// Opening iterations (drop isolated speckle).
    pub open_iterations: usize,
}

impl Default for BinarizeParams {
    fn default() -> Self {
        Self {
            threshold: None,
            kernel_size: 3,
            close_iterations: 2,
            open_iterations: 1,
        }
    }
}

/// Binarized sheet plus the decisions taken to produce it.
#[derive(Clone, Debug)]
pub struct Binarized {
    pub mask: BinaryMask,
    pub threshold: u8,
    /// True when the bright class was the majority and got inverted, i.e. the
    /// sheet is dark ink on light paper.
    pub inverted: bool,
}

/// Threshold `src` and orient the result so that ink is the minority class.
///
/// Samples above `threshold` form the bright class. If the bright class
/// outnumbers the dark one it is treated as background and the mask is
/// inverted. No morphology is applied.
pub fn threshold_mask(src: &PlaneView<'_>, threshold: u8) -> (BinaryMask, bool) {
    let mut mask = BinaryMask::from_fn(src, |v| v > threshold);
    let bright = mask.count_ink();
    let dark = src.data.len() - bright;
    let inverted = bright > dark;
    if inverted {
        mask.invert();
    }
    (mask, inverted)
}

/// Full binarization: global threshold, polarity normalization, closing, opening.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src, params), fields(width = src.width, height = src.height))
)]
pub fn binarize(src: &PlaneView<'_>, params: &BinarizeParams) -> Binarized {
    let threshold = params.threshold.unwrap_or_else(|| otsu_threshold(src));
    let (mask, inverted) = threshold_mask(src, threshold);
    let mask = morph::close(&mask, params.kernel_size, params.close_iterations);
    let mask = morph::open(&mask, params.kernel_size, params.open_iterations);
    log::debug!(
        "binarized {}x{}: threshold={threshold} inverted={inverted} ink={}",
        src.width,
        src.height,
        mask.count_ink()
    );
    Binarized {
        mask,
        threshold,
        inverted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use letter_sheet_core::{PixelPlane, Rect};

    fn sheet(bg: u8, ink: u8) -> PixelPlane {
        let mut plane = PixelPlane::filled(40, 30, bg);
        plane.fill_rect(Rect::new(10, 8, 12, 10), ink);
        plane
    }

    #[test]
    fn dark_ink_on_light_paper_becomes_ink() {
        let plane = sheet(250, 10);
        let out = binarize(&plane.view(), &BinarizeParams::default());
        assert!(out.inverted);
        assert_eq!(out.mask.count_ink(), 120);
        assert!(out.mask.is_ink(10, 8));
        assert!(!out.mask.is_ink(0, 0));
    }

    #[test]
    fn light_ink_on_dark_paper_keeps_polarity() {
        let plane = sheet(5, 230);
        let out = binarize(&plane.view(), &BinarizeParams::default());
        assert!(!out.inverted);
        assert_eq!(out.mask.count_ink(), 120);
        assert!(out.mask.is_ink(21, 17));
    }

    #[test]
    fn blank_sheet_has_no_ink() {
        let plane = PixelPlane::filled(20, 20, 255);
        let out = binarize(&plane.view(), &BinarizeParams::default());
        assert_eq!(out.mask.count_ink(), 0);
    }

    #[test]
    fn fixed_threshold_overrides_otsu() {
        let plane = sheet(200, 100);
        let params = BinarizeParams {
            threshold: Some(250),
            ..BinarizeParams::default()
        };
        let out = binarize(&plane.view(), &params);
        assert_eq!(out.threshold, 250);
        // Nothing is brighter than 250, so the bright class is empty.
        assert_eq!(out.mask.count_ink(), 0);
        assert!(!out.inverted);
    }
}
