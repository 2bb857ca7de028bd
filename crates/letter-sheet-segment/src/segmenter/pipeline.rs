use super::{LoadError, SegmentError, SegmentIssue, SegmentParams, SheetSegmentation, StageStats};
use crate::adjust::BoxAdjuster;
use crate::binarize::binarize;
use crate::components::detect_boxes;
use crate::order::{export_regions, order_slots, sort_reading_order};
use crate::reconcile::{reconcile, Reconciliation, SlotBox};
use letter_sheet_core::{Alphabet, PlaneView, Rect};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Splits a scanned alphabet sheet into one region per letter.
pub struct SheetSegmenter {
    alphabet: Alphabet,
    params: SegmentParams,
}

fn check_bounds(
    stage: &'static str,
    rects: impl IntoIterator<Item = Rect>,
    width: u32,
    height: u32,
) -> Result<(), SegmentError> {
    for rect in rects {
        if !rect.fits_in(width, height) {
            debug_assert!(false, "{stage} produced out-of-bounds box {rect:?}");
            return Err(SegmentError::BoundsViolation {
                stage,
                rect,
                width,
                height,
            });
        }
    }
    Ok(())
}

impl SheetSegmenter {
    pub fn new(alphabet: Alphabet, params: SegmentParams) -> Self {
        Self { alphabet, params }
    }

    #[inline]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    #[inline]
    pub fn params(&self) -> &SegmentParams {
        &self.params
    }

    /// Number of regions every run produces.
    #[inline]
    pub fn target(&self) -> usize {
        self.alphabet.len()
    }

    /// Segment a raw row-major grayscale buffer.
    pub fn segment_raw(
        &self,
        width: usize,
        height: usize,
        data: &[u8],
    ) -> Result<SheetSegmentation, SegmentError> {
        let view = PlaneView::from_raw(width, height, data).map_err(LoadError::from)?;
        self.segment(&view)
    }

    /// Segment a grayscale sheet.
    ///
    /// Always yields exactly [`target`](Self::target) regions unless merging
    /// fails to converge, in which case the surplus boxes are returned in
    /// `unassigned` and a [`SegmentIssue::MergeNonConvergence`] is attached.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn segment(&self, image: &PlaneView<'_>) -> Result<SheetSegmentation, SegmentError> {
        let image = PlaneView::from_raw(image.width, image.height, image.data)
            .map_err(LoadError::from)?;
        let (w, h) = (image.width as u32, image.height as u32);
        let target = self.target();
        let p = &self.params;

        let bin = binarize(&image, &p.binarize);
        let mut stats = StageStats {
            threshold: bin.threshold,
            inverted: bin.inverted,
            ink_pixels: bin.mask.count_ink(),
            ..StageStats::default()
        };

        let (raw, component_stats) = detect_boxes(&bin.mask, &p.components);
        stats.components = component_stats;
        check_bounds("component detection", raw.iter().copied(), w, h)?;

        let adjuster = BoxAdjuster::new(&bin.mask, &p.padding, &p.frame);
        let mut adjusted = Vec::with_capacity(raw.len());
        for rect in &raw {
            let growth = adjuster.adjust(rect);
            if growth.framed {
                stats.framed += 1;
            }
            adjusted.push(growth.rect);
        }
        stats.adjusted = adjusted.len();
        check_bounds("box adjustment", adjusted.iter().copied(), w, h)?;
        log::debug!(
            "adjusted {} boxes, {} framed within budget",
            stats.adjusted,
            stats.framed
        );

        let mut issues = Vec::new();
        if raw.is_empty() {
            log::warn!("no letter components detected; output is fully synthetic");
            issues.push(SegmentIssue::DegenerateInput { synthetic: target });
        }

        let reconciled = reconcile(adjusted, target, &p.merge, &p.placeholder);
        stats.merges = reconciled.merges();

        let (slots, unassigned) = match reconciled {
            Reconciliation::Reconciled {
                slots,
                placeholders,
                ..
            } => {
                stats.placeholders = placeholders;
                (order_slots(slots), Vec::new())
            }
            Reconciliation::NonConvergent { mut remaining, .. } => {
                issues.push(SegmentIssue::MergeNonConvergence {
                    remaining: remaining.len(),
                    target,
                });
                sort_reading_order(&mut remaining);
                let unassigned = remaining.split_off(target.min(remaining.len()));
                let slots = remaining.into_iter().map(SlotBox::Detected).collect();
                (slots, unassigned)
            }
        };
        check_bounds(
            "reconciliation",
            slots
                .iter()
                .filter_map(SlotBox::rect)
                .chain(unassigned.iter().copied()),
            w,
            h,
        )?;

        let regions = export_regions(&image, &slots, &self.alphabet);
        log::info!(
            "segmented {}x{} sheet: {} regions ({} synthetic), {} unassigned",
            image.width,
            image.height,
            regions.len(),
            stats.placeholders,
            unassigned.len()
        );

        Ok(SheetSegmentation {
            width: image.width,
            height: image.height,
            regions,
            unassigned,
            issues,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SegmentStatus;
    use letter_sheet_core::PixelPlane;

    fn abc() -> Alphabet {
        Alphabet::from_ids(["a", "b", "c"]).unwrap()
    }

    #[test]
    fn blank_sheet_is_degenerate_but_complete_in_size() {
        let plane = PixelPlane::filled(80, 40, 255);
        let seg = SheetSegmenter::new(abc(), SegmentParams::default())
            .segment(&plane.view())
            .unwrap();
        assert_eq!(seg.regions.len(), 3);
        assert_eq!(seg.synthetic_count(), 3);
        assert_eq!(seg.status(), SegmentStatus::Degenerate);
        assert_eq!(
            (seg.regions[0].crop.width, seg.regions[0].crop.height),
            (48, 48)
        );
    }

    #[test]
    fn stalled_merge_reports_unassigned_boxes() {
        let mut plane = PixelPlane::filled(300, 60, 255);
        for i in 0..5 {
            plane.fill_rect(Rect::new(20 + i * 55, 20, 20, 20), 0);
        }
        let seg = SheetSegmenter::new(abc(), SegmentParams::default())
            .segment(&plane.view())
            .unwrap();
        assert_eq!(seg.regions.len(), 3);
        assert_eq!(seg.unassigned.len(), 2);
        assert_eq!(seg.status(), SegmentStatus::NonConvergent { excess: 2 });
        // Right-most box is read first.
        assert_eq!(seg.regions[0].rect.map(|r| r.x), Some(240 - 5));
    }

    #[test]
    fn mismatched_buffer_is_a_load_error() {
        let seg = SheetSegmenter::new(abc(), SegmentParams::default());
        let err = seg.segment_raw(10, 10, &[0u8; 99]).unwrap_err();
        assert!(matches!(err, SegmentError::Load(_)));
    }

    #[test]
    fn in_bounds_boxes_pass() {
        assert!(check_bounds("test", [Rect::new(0, 0, 12, 12)], 12, 12).is_ok());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "out-of-bounds"))]
    fn out_of_bounds_boxes_are_rejected() {
        let err = check_bounds("test", [Rect::new(5, 5, 10, 10)], 12, 12);
        assert!(matches!(err, Err(SegmentError::BoundsViolation { .. })));
    }
}
