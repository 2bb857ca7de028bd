use serde::{Deserialize, Serialize};

/// Axis-aligned integer rectangle with an upper-left origin.
///
/// `x`/`y` are the top-left pixel; the rectangle covers the half-open ranges
/// `[x, x + w)` and `[y, y + h)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    #[inline]
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from half-open corner coordinates `[x0, x1) x [y0, y1)`.
    ///
    /// Inverted corners produce an empty rectangle at `(x0, y0)`.
    #[inline]
    pub fn from_corners(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self {
            x: x0,
            y: y0,
            w: x1.saturating_sub(x0),
            h: y1.saturating_sub(y0),
        }
    }

    /// One past the last column.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// One past the last row.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    #[inline]
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_corners(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Non-empty and inside an image of the given size.
    pub fn fits_in(&self, width: u32, height: u32) -> bool {
        !self.is_empty() && self.right() <= width && self.bottom() <= height
    }

    /// Intersection with `[0, width) x [0, height)`.
    pub fn clip_to(&self, width: u32, height: u32) -> Rect {
        let x0 = self.x.min(width);
        let y0 = self.y.min(height);
        Rect::from_corners(
            x0,
            y0,
            self.right().min(width),
            self.bottom().min(height),
        )
    }

    /// Geometric center in pixel coordinates.
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.w as f32 * 0.5,
            self.y as f32 + self.h as f32 * 0.5,
        )
    }

    /// The row ranges of both rectangles share at least one row.
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.y.max(other.y) < self.bottom().min(other.bottom())
    }

    /// Horizontal distance between the rectangles, negative when their
    /// column ranges overlap.
    pub fn horizontal_gap(&self, other: &Rect) -> i64 {
        let left_end = self.right().min(other.right()) as i64;
        let right_start = self.x.max(other.x) as i64;
        right_start - left_end
    }
}
