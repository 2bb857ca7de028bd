//! Global threshold selection.

use letter_sheet_core::PlaneView;

/// 256-bin intensity histogram of a plane.
pub fn histogram(src: &PlaneView<'_>) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for &v in src.data {
        hist[v as usize] += 1;
    }
    hist
}

/// Otsu threshold of a whole plane.
///
/// Samples `<= t` form the dark class, samples `> t` the bright class.
pub fn otsu_threshold(src: &PlaneView<'_>) -> u8 {
    otsu_threshold_from_histogram(&histogram(src))
}

/// Otsu threshold maximizing the between-class variance of a histogram.
///
/// Degenerate histograms are handled explicitly: an empty histogram yields
/// 127, a single-valued one yields that value, and a two-valued one yields
/// the midpoint of the two values.
pub fn otsu_threshold_from_histogram(hist: &[u64; 256]) -> u8 {
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return 127;
    }

    let min_v = hist.iter().position(|&h| h > 0).unwrap_or(0);
    let max_v = hist.iter().rposition(|&h| h > 0).unwrap_or(255);
    if min_v == max_v {
        return min_v as u8;
    }
    let nonzero_bins = hist.iter().filter(|&&h| h > 0).count();
    if nonzero_bins <= 2 {
        return ((min_v + max_v) / 2) as u8;
    }

    // Between-class variance for a split after bin t, scaled by total^2:
    // (T * sum_dark - S * w_dark)^2 / (w_dark * w_bright).
    let (n, s) = (total as f64, weighted_sum(hist));
    let mut w_dark = 0u64;
    let mut sum_dark = 0f64;
    let mut best = (min_v as u8, f64::NEG_INFINITY);
    for t in min_v..max_v {
        w_dark += hist[t];
        sum_dark += t as f64 * hist[t] as f64;
        let (wd, wb) = (w_dark as f64, (total - w_dark) as f64);
        let spread = n * sum_dark - s * wd;
        let score = spread * spread / (wd * wb);
        if score > best.1 {
            best = (t as u8, score);
        }
    }
    best.0
}

fn weighted_sum(hist: &[u64; 256]) -> f64 {
    hist.iter()
        .enumerate()
        .map(|(v, &h)| v as f64 * h as f64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_of(data: &[u8]) -> PlaneView<'_> {
        PlaneView {
            width: data.len(),
            height: 1,
            data,
        }
    }

    #[test]
    fn degenerate_histograms() {
        assert_eq!(otsu_threshold(&view_of(&[42; 10])), 42);
        assert_eq!(otsu_threshold(&view_of(&[0, 255, 255, 0, 255])), 127);
        assert_eq!(otsu_threshold_from_histogram(&[0; 256]), 127);
    }

    #[test]
    fn separates_two_noisy_modes() {
        let mut data = Vec::new();
        for i in 0..200u32 {
            data.push(20 + (i % 15) as u8);
            data.push(200 + (i % 30) as u8);
        }
        let t = otsu_threshold(&view_of(&data));
        assert!((34..200).contains(&t), "threshold {t} not between modes");
    }

    #[test]
    fn threshold_splits_unbalanced_three_level_histogram() {
        let mut hist = [0u64; 256];
        hist[10] = 5;
        hist[12] = 5;
        hist[240] = 90;
        // Every split between the dark pair and the bright mode scores the
        // same; the lowest one wins.
        assert_eq!(otsu_threshold_from_histogram(&hist), 12);
    }
}
