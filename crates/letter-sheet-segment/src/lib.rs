//! Letter-region segmentation for handwritten alphabet sheets.
//!
//! A sheet holds one handwritten glyph per alphabet letter. The
//! [`SheetSegmenter`] turns its grayscale scan into exactly one
//! [`LetterRegion`] per letter:
//!
//! 1. [`binarize`]: global Otsu threshold, polarity normalization and
//!    morphological cleanup,
//! 2. [`detect_boxes`]: bounding boxes of external ink components above a
//!    noise floor,
//! 3. [`BoxAdjuster`]: shape-dependent padding and growth into a background
//!    frame,
//! 4. [`reconcile`]: merging split strokes or appending placeholder slots
//!    until the count matches the alphabet,
//! 5. reading order (top to bottom, right to left) and positional binding to
//!    the alphabet.
//!
//! ## Quickstart
//!
//! ```
//! use letter_sheet_core::{Alphabet, PixelPlane, Rect};
//! use letter_sheet_segment::{SegmentParams, SegmentStatus, SheetSegmenter};
//!
//! let alphabet = Alphabet::from_ids(["alef", "bet"]).unwrap();
//! let mut sheet = PixelPlane::filled(120, 60, 255);
//! sheet.fill_rect(Rect::new(20, 20, 20, 20), 0);
//! sheet.fill_rect(Rect::new(80, 20, 20, 20), 0);
//!
//! let segmenter = SheetSegmenter::new(alphabet, SegmentParams::default());
//! let seg = segmenter.segment(&sheet.view()).unwrap();
//! assert_eq!(seg.status(), SegmentStatus::Complete);
//! // Right-to-left: slot 0 holds the right-most glyph.
//! assert_eq!(seg.regions[0].letter_id, "alef");
//! assert_eq!(seg.regions[0].rect.unwrap().x, 75);
//! ```

mod adjust;
mod binarize;
mod components;
mod io;
mod morph;
mod order;
mod reconcile;
mod segmenter;
mod threshold;

pub use adjust::{
    grow_until_framed, is_framed, BoxAdjuster, FrameGrowth, FrameParams, PaddingTable, ShapeClass,
    ShapeProfile,
};
pub use binarize::{binarize, threshold_mask, BinarizeParams, Binarized};
pub use components::{
    detect_boxes, label_components, Component, ComponentParams, ComponentStats, Connectivity,
};
pub use io::{IoError, RegionRecord, SegmentReport};
pub use morph::{close, dilate, erode, open};
pub use order::{
    export_regions, order_slots, reading_order_key, sort_reading_order, LetterRegion,
    PLACEHOLDER_FILL,
};
pub use reconcile::{
    merge_boxes, placeholder_size, reconcile, should_merge, MergeParams, MissingRegion,
    PlaceholderParams, Reconciliation, SlotBox,
};
pub use segmenter::{
    LoadError, SegmentError, SegmentIssue, SegmentParams, SegmentStatus, SheetSegmentation,
    SheetSegmenter, StageStats,
};
pub use threshold::{histogram, otsu_threshold, otsu_threshold_from_histogram};
