use super::SegmentIssue;
use crate::components::ComponentStats;
use crate::order::LetterRegion;
use letter_sheet_core::Rect;
use serde::{Deserialize, Serialize};

/// Counters recorded after each pipeline stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStats {
    pub threshold: u8,
    /// Polarity was flipped so that ink became the minority class.
    pub inverted: bool,
    pub ink_pixels: usize,
    pub components: ComponentStats,
    pub adjusted: usize,
    /// Adjusted boxes that reached a background frame within the growth budget.
    pub framed: usize,
    pub merges: usize,
    pub placeholders: usize,
}

/// Overall outcome, derived from regions and issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentStatus {
    /// Every slot holds a detected region.
    Complete,
    /// Some slots were filled with synthetic regions.
    Padded { synthetic: usize },
    /// Nothing was detected; every slot is synthetic.
    Degenerate,
    /// More boxes than slots survived merging.
    NonConvergent { excess: usize },
}

/// Output of a segmentation run.
#[derive(Clone, Debug)]
pub struct SheetSegmentation {
    pub width: usize,
    pub height: usize,
    /// Exactly one region per alphabet slot, in slot order.
    pub regions: Vec<LetterRegion>,
    /// Boxes left over after a non-convergent merge, in reading order.
    pub unassigned: Vec<Rect>,
    pub issues: Vec<SegmentIssue>,
    pub stats: StageStats,
}

impl SheetSegmentation {
    pub fn synthetic_count(&self) -> usize {
        self.regions.iter().filter(|r| r.is_synthetic()).count()
    }

    pub fn detected(&self) -> impl Iterator<Item = &LetterRegion> {
        self.regions.iter().filter(|r| !r.is_synthetic())
    }

    pub fn status(&self) -> SegmentStatus {
        for issue in &self.issues {
            match issue {
                SegmentIssue::MergeNonConvergence { remaining, target } => {
                    return SegmentStatus::NonConvergent {
                        excess: remaining.saturating_sub(*target),
                    }
                }
                SegmentIssue::DegenerateInput { .. } => return SegmentStatus::Degenerate,
            }
        }
        match self.synthetic_count() {
            0 => SegmentStatus::Complete,
            synthetic => SegmentStatus::Padded { synthetic },
        }
    }
}
