//! Binary morphology with square structuring elements.
//!
//! A `k x k` square is separable, so every pass runs as a horizontal then a
//! vertical 1-D min/max filter. Samples outside the mask never contribute.

use letter_sheet_core::BinaryMask;

#[derive(Clone, Copy)]
enum Op {
    Dilate,
    Erode,
}

impl Op {
    #[inline]
    fn combine(self, a: u8, b: u8) -> u8 {
        match self {
            Op::Dilate => a.max(b),
            Op::Erode => a.min(b),
        }
    }
}

fn filter_1d(
    src: &[u8],
    dst: &mut [u8],
    (width, height): (usize, usize),
    radius: usize,
    op: Op,
    horizontal: bool,
) {
    for y in 0..height {
        for x in 0..width {
            let (lo, hi, center) = if horizontal {
                (x.saturating_sub(radius), (x + radius).min(width - 1), x)
            } else {
                (y.saturating_sub(radius), (y + radius).min(height - 1), y)
            };
            let mut acc = src[y * width + x];
            for k in lo..=hi {
                if k == center {
                    continue;
                }
                let idx = if horizontal { y * width + k } else { k * width + x };
                acc = op.combine(acc, src[idx]);
            }
            dst[y * width + x] = acc;
        }
    }
}

fn apply(mask: &BinaryMask, size: usize, iterations: usize, op: Op) -> BinaryMask {
    let (w, h) = (mask.width(), mask.height());
    let radius = size / 2;
    if radius == 0 || iterations == 0 || w == 0 || h == 0 {
        return mask.clone();
    }

    let mut cur = mask.data().to_vec();
    let mut tmp = vec![0u8; cur.len()];
    for _ in 0..iterations {
        filter_1d(&cur, &mut tmp, (w, h), radius, op, true);
        filter_1d(&tmp, &mut cur, (w, h), radius, op, false);
    }

    let mut out = mask.clone();
    out.replace_data(cur);
    out
}

/// Grow ink by a `size x size` square, `iterations` times.
pub fn dilate(mask: &BinaryMask, size: usize, iterations: usize) -> BinaryMask {
    apply(mask, size, iterations, Op::Dilate)
}

/// Shrink ink by a `size x size` square, `iterations` times.
pub fn erode(mask: &BinaryMask, size: usize, iterations: usize) -> BinaryMask {
    apply(mask, size, iterations, Op::Erode)
}

/// Closing: `iterations` dilations followed by as many erosions. Bridges stroke gaps.
pub fn close(mask: &BinaryMask, size: usize, iterations: usize) -> BinaryMask {
    erode(&dilate(mask, size, iterations), size, iterations)
}

/// Opening: `iterations` erosions followed by as many dilations. Removes speckle.
pub fn open(mask: &BinaryMask, size: usize, iterations: usize) -> BinaryMask {
    dilate(&erode(mask, size, iterations), size, iterations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with(width: usize, height: usize, ink: &[(usize, usize)]) -> BinaryMask {
        let mut m = BinaryMask::new(width, height);
        for &(x, y) in ink {
            m.set_ink(x, y, true);
        }
        m
    }

    #[test]
    fn dilate_grows_single_pixel_to_square() {
        let m = mask_with(7, 7, &[(3, 3)]);
        let d = dilate(&m, 3, 1);
        assert_eq!(d.count_ink(), 9);
        assert!(d.is_ink(2, 2) && d.is_ink(4, 4));
        assert!(!d.is_ink(1, 3));
    }

    #[test]
    fn open_removes_isolated_speckle() {
        let mut m = mask_with(12, 12, &[(1, 1)]);
        for y in 4..10 {
            for x in 4..10 {
                m.set_ink(x, y, true);
            }
        }
        let o = open(&m, 3, 1);
        assert!(!o.is_ink(1, 1));
        assert_eq!(o.count_ink(), 36);
    }

    #[test]
    fn close_bridges_one_pixel_gap() {
        let mut m = BinaryMask::new(12, 5);
        for x in 1..11 {
            if x != 6 {
                m.set_ink(x, 2, true);
            }
        }
        let c = close(&m, 3, 1);
        assert!(c.is_ink(6, 2));
    }

    #[test]
    fn erosion_ignores_out_of_bounds_samples() {
        let mut m = BinaryMask::new(4, 4);
        m.invert();
        let e = erode(&m, 3, 1);
        assert_eq!(e.count_ink(), 16);
    }
}
