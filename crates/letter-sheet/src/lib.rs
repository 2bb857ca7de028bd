//! High-level facade crate for the `letter-sheet-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core types and the segmentation engine,
//! - JSON configuration and batch reports,
//! - (feature `image`) decoding sheets with the `image` crate, writing one
//!   raster per letter plus a `manifest.json`, and parallel batch runs.
//!
//! ## Quickstart
//!
//! ```no_run
//! use letter_sheet::{sheet, Alphabet, ExportOptions, SegmentParams, SheetSegmenter};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let segmenter = SheetSegmenter::new(Alphabet::hebrew(), SegmentParams::default());
//! let report = sheet::split_sheet(
//!     &segmenter,
//!     Path::new("sheet.png"),
//!     Path::new("letters"),
//!     &ExportOptions::default(),
//! )?;
//! println!("status: {:?}", report.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `letter_sheet::core`: planes, masks, rectangles, alphabets, logging.
//! - `letter_sheet::segment`: the segmentation pipeline and its stages.
//! - `letter_sheet::sheet` (feature `image`): image decode/encode helpers.
//! - `letter_sheet::glyph` (feature `image`): crop modes and normalization.
//! - `letter_sheet::batch` (feature `image`): multi-image runs.

mod error;
mod io;

pub use letter_sheet_core as core;
pub use letter_sheet_segment as segment;

pub use error::SheetError;
pub use io::{
    AlphabetSource, BatchReport, CropMode, ExportOptions, ImageReport, ImageStatus,
    NormalizeParams, SheetConfig,
};
pub use letter_sheet_core::{Alphabet, Letter, PixelPlane, PlaneView, Rect};
pub use letter_sheet_segment::{
    LetterRegion, LoadError, SegmentError, SegmentIssue, SegmentParams, SegmentReport,
    SegmentStatus, SheetSegmentation, SheetSegmenter,
};

#[cfg(feature = "image")]
pub mod batch;
#[cfg(feature = "image")]
pub mod glyph;
#[cfg(feature = "image")]
pub mod sheet;
