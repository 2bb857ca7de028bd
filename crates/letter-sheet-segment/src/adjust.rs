//! Per-box geometric adjustment: shape-dependent padding followed by
//! growth until the box sits inside a background frame.

use letter_sheet_core::{BinaryMask, Rect};
use serde::{Deserialize, Serialize};

/// Shape classification tag used to pick a padding profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeClass {
    /// Tall, thin glyphs (vertical strokes).
    Narrow,
    /// Roughly square glyphs.
    Regular,
    /// Glyphs much wider than tall.
    Wide,
}

/// Padding for one shape class, as fractions of the box's own size per side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeProfile {
    pub class: ShapeClass,
    /// The profile applies when `w / h` is strictly below this value.
    /// `None` matches any aspect ratio.
    pub max_aspect: Option<f32>,
    pub pad_x: f32,
    pub pad_y: f32,
}

/// Ordered list of shape profiles; the first matching profile wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaddingTable {
    pub profiles: Vec<ShapeProfile>,
}

impl Default for PaddingTable {
    fn default() -> Self {
        Self {
            profiles: vec![
                ShapeProfile {
                    class: ShapeClass::Narrow,
                    max_aspect: Some(0.5),
                    pad_x: 0.6,
                    pad_y: 0.25,
                },
                ShapeProfile {
                    class: ShapeClass::Regular,
                    max_aspect: None,
                    pad_x: 0.25,
                    pad_y: 0.25,
                },
            ],
        }
    }
}

const NO_PADDING: ShapeProfile = ShapeProfile {
    class: ShapeClass::Regular,
    max_aspect: None,
    pad_x: 0.0,
    pad_y: 0.0,
};

impl PaddingTable {
    /// Profile for a box; falls back to zero padding when nothing matches.
    pub fn classify(&self, rect: &Rect) -> &ShapeProfile {
        let aspect = rect.w as f32 / rect.h.max(1) as f32;
        self.profiles
            .iter()
            .find(|p| p.max_aspect.is_none_or(|max| aspect < max))
            .unwrap_or(&NO_PADDING)
    }

    /// Pad `rect` per its shape class and clip to the image.
    ///
    /// Each side moves out by `floor(dim * ratio)` pixels. The result always
    /// contains the input when the input lies inside the image.
    pub fn pad(&self, rect: &Rect, width: u32, height: u32) -> Rect {
        let profile = self.classify(rect);
        let px = (rect.w as f32 * profile.pad_x.max(0.0)).floor() as u32;
        let py = (rect.h as f32 * profile.pad_y.max(0.0)).floor() as u32;
        Rect::from_corners(
            rect.x.saturating_sub(px),
            rect.y.saturating_sub(py),
            rect.right().saturating_add(px).min(width),
            rect.bottom().saturating_add(py).min(height),
        )
    }
}

/// Background-frame growth settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameParams {
    /// Distance of the probed frame outside the box.
    pub margin: u32,
    /// Maximum number of one-pixel growth steps.
    pub max_growth: u32,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            margin: 2,
            max_growth: 10,
        }
    }
}

/// Result of [`grow_until_framed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameGrowth {
    pub rect: Rect,
    /// Growth steps applied.
    pub steps: u32,
    /// Frame checks evaluated (at most `max_growth + 1`).
    pub checks: u32,
    /// The frame condition held for the returned box.
    pub framed: bool,
}

/// True when the frame `margin` pixels outside `rect` (clipped to the mask)
/// is background along its top row, bottom row, left and right columns.
pub fn is_framed(mask: &BinaryMask, rect: &Rect, margin: u32) -> bool {
    let (w, h) = (mask.width() as u32, mask.height() as u32);
    let top = rect.y.saturating_sub(margin).min(h) as usize;
    let left = rect.x.saturating_sub(margin).min(w) as usize;
    let bottom = rect.bottom().saturating_add(margin).min(h) as usize;
    let right = rect.right().saturating_add(margin).min(w) as usize;
    if bottom <= top || right <= left {
        return false;
    }
    mask.row_is_background(top, left, right)
        && mask.row_is_background(bottom - 1, left, right)
        && mask.col_is_background(left, top, bottom)
        && mask.col_is_background(right - 1, top, bottom)
}

/// Grow `rect` one pixel per side until [`is_framed`] holds or the growth
/// budget is spent. Never shrinks the box; stops early once the box covers
/// the whole mask.
pub fn grow_until_framed(mask: &BinaryMask, rect: Rect, params: &FrameParams) -> FrameGrowth {
    let (w, h) = (mask.width() as u32, mask.height() as u32);
    let mut cur = rect;
    let mut checks = 0;
    let mut steps = 0;
    loop {
        checks += 1;
        if is_framed(mask, &cur, params.margin) {
            return FrameGrowth {
                rect: cur,
                steps,
                checks,
                framed: true,
            };
        }
        if steps == params.max_growth {
            break;
        }
        let grown = Rect::from_corners(
            cur.x.saturating_sub(1),
            cur.y.saturating_sub(1),
            cur.right().saturating_add(1).min(w),
            cur.bottom().saturating_add(1).min(h),
        );
        if grown == cur {
            break;
        }
        cur = grown;
        steps += 1;
    }
    FrameGrowth {
        rect: cur,
        steps,
        checks,
        framed: false,
    }
}

/// Combined padding and frame growth over one mask.
pub struct BoxAdjuster<'a> {
    mask: &'a BinaryMask,
    padding: &'a PaddingTable,
    frame: &'a FrameParams,
}

impl<'a> BoxAdjuster<'a> {
    pub fn new(mask: &'a BinaryMask, padding: &'a PaddingTable, frame: &'a FrameParams) -> Self {
        Self {
            mask,
            padding,
            frame,
        }
    }

    /// Pad `rect`, then grow it into a background frame.
    pub fn adjust(&self, rect: &Rect) -> FrameGrowth {
        let padded = self
            .padding
            .pad(rect, self.mask.width() as u32, self.mask.height() as u32);
        grow_until_framed(self.mask, padded, self.frame)
    }
}
