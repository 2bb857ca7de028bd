//! Sheet segmentation pipeline.
//!
//! This module wires together binarization, external component detection,
//! per-box adjustment, reconciliation against the alphabet size and
//! reading-order export.

mod error;
mod params;
mod pipeline;
mod result;

pub use error::{LoadError, SegmentError, SegmentIssue};
pub use params::SegmentParams;
pub use pipeline::SheetSegmenter;
pub use result::{SegmentStatus, SheetSegmentation, StageStats};
