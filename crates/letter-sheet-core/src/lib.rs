//! Core types and utilities for letter-sheet segmentation.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any image codec: callers hand in decoded grayscale samples and
//! get back planes, masks and integer rectangles.

mod alphabet;
mod image;
mod logger;
mod rect;

pub use alphabet::{Alphabet, AlphabetError, Letter};
pub use image::{BinaryMask, PixelPlane, PlaneError, PlaneView, BACKGROUND, INK};
pub use rect::Rect;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_verbosity};
