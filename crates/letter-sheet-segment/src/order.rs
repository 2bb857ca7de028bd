//! Reading order, slot binding and crop export.

use crate::reconcile::SlotBox;
use letter_sheet_core::{Alphabet, PixelPlane, PlaneView, Rect};
use std::cmp::Reverse;

/// Blank placeholder sample written into synthetic crops.
pub const PLACEHOLDER_FILL: u8 = 255;

/// Sort key for top-to-bottom, right-to-left reading order.
#[inline]
pub fn reading_order_key(rect: &Rect) -> (u32, Reverse<u32>) {
    (rect.y, Reverse(rect.x))
}

/// Stable in-place sort into reading order. Sorting twice is a no-op.
pub fn sort_reading_order(boxes: &mut [Rect]) {
    boxes.sort_by_key(reading_order_key);
}

/// Detected slots in reading order followed by every missing slot.
pub fn order_slots(slots: Vec<SlotBox>) -> Vec<SlotBox> {
    let (mut detected, missing): (Vec<SlotBox>, Vec<SlotBox>) =
        slots.into_iter().partition(|s| !s.is_synthetic());
    detected.sort_by_key(|s| s.rect().map(|r| reading_order_key(&r)));
    detected.extend(missing);
    detected
}

/// One exported letter: its slot binding and raster crop.
#[derive(Clone, Debug)]
pub struct LetterRegion {
    pub slot: usize,
    pub letter_id: String,
    pub code_point: Option<char>,
    /// Source rectangle; `None` for synthetic regions.
    pub rect: Option<Rect>,
    pub synthetic: bool,
    pub crop: PixelPlane,
}

impl LetterRegion {
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Conventional file name, e.g. `03_dalet.png`.
    pub fn file_name(&self, ext: &str) -> String {
        format!("{:02}_{}.{}", self.slot, self.letter_id, ext)
    }
}

/// Bind ordered slots positionally to `alphabet` and crop each one.
///
/// Slots beyond the alphabet length are ignored; callers are expected to
/// pass exactly `alphabet.len()` slots.
pub fn export_regions(
    image: &PlaneView<'_>,
    ordered: &[SlotBox],
    alphabet: &Alphabet,
) -> Vec<LetterRegion> {
    ordered
        .iter()
        .zip(alphabet.iter())
        .enumerate()
        .map(|(slot, (sb, letter))| {
            let (rect, crop) = match sb {
                SlotBox::Detected(r) => (Some(*r), image.crop(*r)),
                SlotBox::Missing(m) => (
                    None,
                    PixelPlane::filled(
                        m.placeholder_w as usize,
                        m.placeholder_h as usize,
                        PLACEHOLDER_FILL,
                    ),
                ),
            };
            LetterRegion {
                slot,
                letter_id: letter.id.clone(),
                code_point: letter.code_point,
                rect,
                synthetic: sb.is_synthetic(),
                crop,
            }
        })
        .collect()
}
