use crate::Rect;

/// Mask value for ink (foreground) pixels.
pub const INK: u8 = 255;
/// Mask value for background pixels.
pub const BACKGROUND: u8 = 0;

/// Errors produced when building planes from raw buffers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaneError {
    #[error("empty pixel plane (width={width}, height={height})")]
    Empty { width: usize, height: usize },

    #[error("invalid pixel buffer length (expected {expected} bytes, got {got})")]
    BufferLength { expected: usize, got: usize },

    #[error("pixel plane dimensions overflow (width={width}, height={height})")]
    Overflow { width: usize, height: usize },
}

fn checked_len(width: usize, height: usize) -> Result<usize, PlaneError> {
    if width == 0 || height == 0 {
        return Err(PlaneError::Empty { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(PlaneError::Overflow { width, height })
}

/// Borrowed, row-major 8-bit grayscale samples.
#[derive(Clone, Copy, Debug)]
pub struct PlaneView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl<'a> PlaneView<'a> {
    /// Wrap a raw buffer, validating that it is non-empty and `width * height` long.
    pub fn from_raw(width: usize, height: usize, data: &'a [u8]) -> Result<Self, PlaneError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(PlaneError::BufferLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// True when the view holds no samples or its dimensions disagree with the buffer.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.len() != self.width * self.height
    }

    /// Full-image rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as u32, self.height as u32)
    }

    /// Copy the pixels under `rect` (clipped to the view) into a new plane.
    pub fn crop(&self, rect: Rect) -> PixelPlane {
        let rect = rect.clip_to(self.width as u32, self.height as u32);
        let (x0, y0) = (rect.x as usize, rect.y as usize);
        let (w, h) = (rect.w as usize, rect.h as usize);
        let mut data = Vec::with_capacity(w * h);
        for y in y0..y0 + h {
            data.extend_from_slice(&self.row(y)[x0..x0 + w]);
        }
        PixelPlane {
            width: w,
            height: h,
            data,
        }
    }

    pub fn to_plane(&self) -> PixelPlane {
        PixelPlane {
            width: self.width,
            height: self.height,
            data: self.data.to_vec(),
        }
    }
}

/// Owned, row-major 8-bit grayscale plane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelPlane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl PixelPlane {
    /// Plane of `width * height` samples all set to `fill`.
    pub fn filled(width: usize, height: usize, fill: u8) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width * height],
        }
    }

    /// Take ownership of a raw buffer after validating its length.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, PlaneError> {
        PlaneView::from_raw(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> PlaneView<'_> {
        PlaneView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.width + x] = v;
    }

    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }

    /// Paint `rect` (clipped to the plane) with a constant value.
    pub fn fill_rect(&mut self, rect: Rect, v: u8) {
        let rect = rect.clip_to(self.width as u32, self.height as u32);
        for y in rect.y as usize..rect.bottom() as usize {
            let start = y * self.width;
            self.data[start + rect.x as usize..start + rect.right() as usize].fill(v);
        }
    }

    pub fn crop(&self, rect: Rect) -> PixelPlane {
        self.view().crop(rect)
    }
}

/// Binary ink/background mask. Ink is [`INK`], background is [`BACKGROUND`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    plane: PixelPlane,
}

impl BinaryMask {
    /// All-background mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            plane: PixelPlane::filled(width, height, BACKGROUND),
        }
    }

    /// Build a mask by classifying every sample of `src`.
    pub fn from_fn(src: &PlaneView<'_>, mut is_ink: impl FnMut(u8) -> bool) -> Self {
        let data = src
            .data
            .iter()
            .map(|&v| if is_ink(v) { INK } else { BACKGROUND })
            .collect();
        Self {
            plane: PixelPlane {
                width: src.width,
                height: src.height,
                data,
            },
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.plane.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.plane.height
    }

    #[inline]
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        self.plane.get(x, y) == INK
    }

    #[inline]
    pub fn set_ink(&mut self, x: usize, y: usize, ink: bool) {
        self.plane.set(x, y, if ink { INK } else { BACKGROUND });
    }

    pub fn count_ink(&self) -> usize {
        self.plane.data.iter().filter(|&&v| v == INK).count()
    }

    /// Swap ink and background.
    pub fn invert(&mut self) {
        for v in &mut self.plane.data {
            *v = INK - *v;
        }
    }

    /// Row `y` holds no ink in the half-open column range `[x0, x1)`.
    pub fn row_is_background(&self, y: usize, x0: usize, x1: usize) -> bool {
        let start = y * self.plane.width;
        self.plane.data[start + x0..start + x1]
            .iter()
            .all(|&v| v == BACKGROUND)
    }

    /// Column `x` holds no ink in the half-open row range `[y0, y1)`.
    pub fn col_is_background(&self, x: usize, y0: usize, y1: usize) -> bool {
        (y0..y1).all(|y| !self.is_ink(x, y))
    }

    pub fn as_plane(&self) -> &PixelPlane {
        &self.plane
    }

    pub fn view(&self) -> PlaneView<'_> {
        self.plane.view()
    }

    pub fn into_plane(self) -> PixelPlane {
        self.plane
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.plane.data
    }

    /// Raw mask samples (row-major, values in {0, 255}).
    pub fn data(&self) -> &[u8] {
        &self.plane.data
    }

    /// Overwrite the mask with a new sample buffer of the same size.
    ///
    /// Any non-zero sample is stored as ink.
    pub fn replace_data(&mut self, data: Vec<u8>) {
        debug_assert_eq!(data.len(), self.plane.data.len());
        self.plane.data = data;
        for v in self.data_mut() {
            if *v != BACKGROUND {
                *v = INK;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_empty_and_short_buffers() {
        assert_eq!(
            PixelPlane::from_raw(0, 4, Vec::new()),
            Err(PlaneError::Empty {
                width: 0,
                height: 4
            })
        );
        assert_eq!(
            PixelPlane::from_raw(3, 2, vec![0; 5]),
            Err(PlaneError::BufferLength {
                expected: 6,
                got: 5
            })
        );
        assert!(PixelPlane::from_raw(3, 2, vec![0; 6]).is_ok());
    }

    #[test]
    fn crop_copies_rows_and_clips() {
        let mut plane = PixelPlane::filled(6, 4, 200);
        plane.fill_rect(Rect::new(2, 1, 2, 2), 10);

        let crop = plane.crop(Rect::new(2, 1, 2, 2));
        assert_eq!(crop.width, 2);
        assert_eq!(crop.height, 2);
        assert!(crop.data.iter().all(|&v| v == 10));

        let clipped = plane.crop(Rect::new(4, 2, 10, 10));
        assert_eq!((clipped.width, clipped.height), (2, 2));
    }

    #[test]
    fn mask_rows_and_columns_report_background() {
        let mut mask = BinaryMask::new(5, 5);
        mask.set_ink(2, 2, true);
        assert_eq!(mask.count_ink(), 1);
        assert!(mask.row_is_background(0, 0, 5));
        assert!(!mask.row_is_background(2, 0, 5));
        assert!(mask.row_is_background(2, 3, 5));
        assert!(!mask.col_is_background(2, 0, 5));
        assert!(mask.col_is_background(2, 3, 5));

        mask.invert();
        assert_eq!(mask.count_ink(), 24);
    }
}
