//! Force the box count to the alphabet size.
//!
//! Too many boxes: multi-stroke letters split into several components are
//! merged back pair by pair. Too few: placeholder slots are appended.

use letter_sheet_core::Rect;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Merge predicate tolerances.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeParams {
    /// Two boxes merge only if their horizontal gap is strictly below this
    /// (overlapping column ranges give a negative gap).
    pub gap_tolerance_px: i64,
    /// Two boxes merge only if `|h1 - h2| < height_tolerance_rel * max(h1, h2)`.
    pub height_tolerance_rel: f32,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            gap_tolerance_px: 10,
            height_tolerance_rel: 0.75,
        }
    }
}

/// Placeholder sizing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderParams {
    /// Placeholder crop size `[w, h]` when no box was detected at all.
    pub fallback_size: [u32; 2],
}

impl Default for PlaceholderParams {
    fn default() -> Self {
        Self {
            fallback_size: [48, 48],
        }
    }
}

/// Stand-in for a letter with no detected content. It has no position on the
/// sheet; the size only dimensions the blank placeholder crop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingRegion {
    pub placeholder_w: u32,
    pub placeholder_h: u32,
}

/// A reconciled slot: a detected box or a missing region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotBox {
    Detected(Rect),
    Missing(MissingRegion),
}

impl SlotBox {
    pub fn rect(&self) -> Option<Rect> {
        match self {
            SlotBox::Detected(r) => Some(*r),
            SlotBox::Missing(_) => None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, SlotBox::Missing(_))
    }
}

/// Outcome of reconciliation against a target count.
#[derive(Clone, Debug, PartialEq)]
pub enum Reconciliation {
    /// Exactly `target` slots.
    Reconciled {
        slots: Vec<SlotBox>,
        merges: usize,
        placeholders: usize,
    },
    /// Merging stopped making progress while still above target. All
    /// remaining boxes are kept.
    NonConvergent { remaining: Vec<Rect>, merges: usize },
}

impl Reconciliation {
    pub fn merges(&self) -> usize {
        match self {
            Reconciliation::Reconciled { merges, .. } | Reconciliation::NonConvergent { merges, .. } => {
                *merges
            }
        }
    }
}

/// Whether two boxes are parts of one letter.
pub fn should_merge(a: &Rect, b: &Rect, params: &MergeParams) -> bool {
    if !a.overlaps_vertically(b) || a.horizontal_gap(b) >= params.gap_tolerance_px {
        return false;
    }
    let dh = a.h.abs_diff(b.h) as f32;
    dh < params.height_tolerance_rel * a.h.max(b.h) as f32
}

/// One greedy pass: each unused box absorbs every later box it should merge
/// with. Stops absorbing as soon as the count reaches `target`.
fn merge_pass(boxes: &[Rect], target: usize, params: &MergeParams) -> (Vec<Rect>, usize) {
    let mut used = vec![false; boxes.len()];
    let mut count = boxes.len();
    let mut merges = 0;
    let mut out = Vec::with_capacity(boxes.len());

    for i in 0..boxes.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut acc = boxes[i];
        for j in i + 1..boxes.len() {
            if count <= target {
                break;
            }
            if used[j] || !should_merge(&acc, &boxes[j], params) {
                continue;
            }
            acc = acc.union(&boxes[j]);
            used[j] = true;
            count -= 1;
            merges += 1;
        }
        out.push(acc);
    }
    (out, merges)
}

/// Merge boxes until at most `target` remain or a pass merges nothing.
///
/// Returns the surviving boxes and the number of pairwise merges. The loop
/// terminates because every productive pass strictly lowers the count.
pub fn merge_boxes(boxes: Vec<Rect>, target: usize, params: &MergeParams) -> (Vec<Rect>, usize) {
    let mut boxes = boxes;
    let mut total = 0;
    while boxes.len() > target {
        let (next, merges) = merge_pass(&boxes, target, params);
        if merges == 0 {
            break;
        }
        total += merges;
        boxes = next;
    }
    (boxes, total)
}

/// Size for placeholder crops: the mean detected size, else the fallback.
pub fn placeholder_size(boxes: &[Rect], params: &PlaceholderParams) -> MissingRegion {
    if boxes.is_empty() {
        let [w, h] = params.fallback_size;
        return MissingRegion {
            placeholder_w: w.max(1),
            placeholder_h: h.max(1),
        };
    }
    let n = boxes.len() as u64;
    let w = boxes.iter().map(|b| b.w as u64).sum::<u64>() / n;
    let h = boxes.iter().map(|b| b.h as u64).sum::<u64>() / n;
    MissingRegion {
        placeholder_w: (w as u32).max(1),
        placeholder_h: (h as u32).max(1),
    }
}

/// Merge or pad `boxes` to exactly `target` slots.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(boxes, merge, placeholder), fields(boxes = boxes.len()))
)]
pub fn reconcile(
    boxes: Vec<Rect>,
    target: usize,
    merge: &MergeParams,
    placeholder: &PlaceholderParams,
) -> Reconciliation {
    let (boxes, merges) = merge_boxes(boxes, target, merge);
    if boxes.len() > target {
        log::warn!(
            "merge stalled at {} boxes (target {target}) after {merges} merges",
            boxes.len()
        );
        return Reconciliation::NonConvergent {
            remaining: boxes,
            merges,
        };
    }

    let missing = target - boxes.len();
    let size = placeholder_size(&boxes, placeholder);
    let mut slots: Vec<SlotBox> = boxes.into_iter().map(SlotBox::Detected).collect();
    slots.extend(std::iter::repeat_n(SlotBox::Missing(size), missing));
    log::debug!("reconciled: merges={merges} placeholders={missing}");

    Reconciliation::Reconciled {
        slots,
        merges,
        placeholders: missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_parts_merge_into_their_union() {
        let a = Rect::new(100, 50, 20, 40);
        let b = Rect::new(125, 55, 8, 30);
        let params = MergeParams::default();
        assert!(should_merge(&a, &b, &params));

        let (out, merges) = merge_boxes(vec![a, b], 1, &params);
        assert_eq!(out, vec![a.union(&b)]);
        assert_eq!(merges, 1);
    }

    #[test]
    fn separated_boxes_are_left_alone() {
        let params = MergeParams::default();
        let a = Rect::new(0, 0, 20, 20);
        let far = Rect::new(60, 0, 20, 20);
        let below = Rect::new(0, 40, 20, 20);
        let (out, merges) = merge_boxes(vec![a, far, below], 1, &params);
        assert_eq!(out, vec![a, far, below]);
        assert_eq!(merges, 0);
    }

    #[test]
    fn very_different_heights_do_not_merge() {
        let params = MergeParams::default();
        let tall = Rect::new(0, 0, 10, 100);
        let dot = Rect::new(12, 40, 10, 10);
        assert!(!should_merge(&tall, &dot, &params));
    }

    #[test]
    fn merging_stops_at_target() {
        let params = MergeParams::default();
        // Four boxes in a tight row; every neighbour pair is mergeable.
        let boxes: Vec<Rect> = (0..4).map(|i| Rect::new(i * 25, 0, 20, 20)).collect();
        let (out, merges) = merge_boxes(boxes, 3, &params);
        assert_eq!(out.len(), 3);
        assert_eq!(merges, 1);
        assert_eq!(out[0], Rect::new(0, 0, 45, 20));
    }

    #[test]
    fn stalled_merge_is_non_convergent() {
        let boxes: Vec<Rect> = (0..5).map(|i| Rect::new(i * 100, 0, 20, 20)).collect();
        let r = reconcile(
            boxes.clone(),
            3,
            &MergeParams::default(),
            &PlaceholderParams::default(),
        );
        assert_eq!(
            r,
            Reconciliation::NonConvergent {
                remaining: boxes,
                merges: 0
            }
        );
    }

    #[test]
    fn padding_appends_mean_sized_missing_regions() {
        let boxes = vec![Rect::new(0, 0, 10, 20), Rect::new(50, 0, 21, 31)];
        let r = reconcile(
            boxes,
            5,
            &MergeParams::default(),
            &PlaceholderParams::default(),
        );
        let Reconciliation::Reconciled {
            slots,
            placeholders,
            ..
        } = r
        else {
            panic!("expected reconciled");
        };
        assert_eq!(slots.len(), 5);
        assert_eq!(placeholders, 3);
        assert_eq!(slots.iter().filter(|s| s.is_synthetic()).count(), 3);
        assert_eq!(
            slots[4],
            SlotBox::Missing(MissingRegion {
                placeholder_w: 15,
                placeholder_h: 25
            })
        );
    }

    #[test]
    fn empty_input_uses_fallback_size() {
        let r = reconcile(
            Vec::new(),
            2,
            &MergeParams::default(),
            &PlaceholderParams::default(),
        );
        let Reconciliation::Reconciled { slots, .. } = r else {
            panic!("expected reconciled");
        };
        assert!(slots.iter().all(|s| *s
            == SlotBox::Missing(MissingRegion {
                placeholder_w: 48,
                placeholder_h: 48
            })));
    }
}
