//! Crop rendering: binary re-thresholding and square-canvas normalization.

use crate::io::{CropMode, ExportOptions, NormalizeParams};
use crate::sheet::plane_to_image;
use crate::SheetError;
use ::image::{imageops, GrayImage, Luma};
use letter_sheet_core::{PixelPlane, PlaneView};
use letter_sheet_segment::{otsu_threshold, threshold_mask, LetterRegion};

const WHITE: u8 = 255;
const BLACK: u8 = 0;

/// Threshold `src` (Otsu when `threshold` is `None`) and render the ink
/// black on a white background, whatever the input polarity.
pub fn binarize_plane(src: &PlaneView<'_>, threshold: Option<u8>) -> PixelPlane {
    if src.is_empty() {
        return PixelPlane::filled(src.width, src.height, WHITE);
    }
    let t = threshold.unwrap_or_else(|| otsu_threshold(src));
    let (mask, _) = threshold_mask(src, t);
    let data = mask
        .data()
        .iter()
        .map(|&v| if v == letter_sheet_core::INK { BLACK } else { WHITE })
        .collect();
    PixelPlane {
        width: src.width,
        height: src.height,
        data,
    }
}

/// Scale `glyph` to fit inside the canvas margins and paste it centered on a
/// white square, shifted down by `vertical_offset`.
pub fn normalize_glyph(glyph: &GrayImage, params: &NormalizeParams) -> GrayImage {
    let size = params.target_size.max(1);
    let mut canvas = GrayImage::from_pixel(size, size, Luma([WHITE]));
    let (w, h) = glyph.dimensions();
    if w == 0 || h == 0 {
        return canvas;
    }

    let inner = size.saturating_sub(params.margin.saturating_mul(2)).max(1);
    let scale = (inner as f32 / w as f32).min(inner as f32 / h as f32);
    let nw = ((w as f32 * scale).round() as u32).clamp(1, inner);
    let nh = ((h as f32 * scale).round() as u32).clamp(1, inner);
    let scaled = imageops::resize(glyph, nw, nh, imageops::FilterType::Triangle);

    let x = (size - nw) / 2;
    let y = (((size - nh) / 2) as i64 + params.vertical_offset as i64).clamp(0, (size - nh) as i64);
    imageops::replace(&mut canvas, &scaled, x as i64, y);
    canvas
}

/// Render one region as it will be written to disk.
pub fn render_region(region: &LetterRegion, opts: &ExportOptions) -> Result<GrayImage, SheetError> {
    if region.is_synthetic() {
        return match &opts.normalize {
            Some(p) => Ok(GrayImage::from_pixel(
                p.target_size.max(1),
                p.target_size.max(1),
                Luma([WHITE]),
            )),
            None => plane_to_image(&region.crop),
        };
    }

    let image = match opts.crop_mode {
        CropMode::Gray => plane_to_image(&region.crop)?,
        CropMode::Binary => plane_to_image(&binarize_plane(&region.crop.view(), None))?,
    };
    Ok(match &opts.normalize {
        Some(p) => normalize_glyph(&image, p),
        None => image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use letter_sheet_core::Rect;

    #[test]
    fn binary_crop_is_black_ink_on_white() {
        let mut plane = PixelPlane::filled(20, 20, 180);
        plane.fill_rect(Rect::new(5, 5, 4, 10), 60);
        let out = binarize_plane(&plane.view(), None);
        assert_eq!(out.get(6, 6), BLACK);
        assert_eq!(out.get(0, 0), WHITE);

        // Inverted polarity gives the same picture.
        let mut neg = PixelPlane::filled(20, 20, 60);
        neg.fill_rect(Rect::new(5, 5, 4, 10), 180);
        assert_eq!(binarize_plane(&neg.view(), None), out);
    }

    #[test]
    fn normalized_glyph_is_centered_inside_margins() {
        let glyph = GrayImage::from_pixel(10, 20, Luma([0]));
        let params = NormalizeParams {
            target_size: 100,
            margin: 10,
            vertical_offset: 0,
        };
        let out = normalize_glyph(&glyph, &params);
        assert_eq!(out.dimensions(), (100, 100));
        // Scaled to 40x80 at (30, 10).
        assert_eq!(out.get_pixel(50, 50)[0], BLACK);
        assert_eq!(out.get_pixel(29, 50)[0], WHITE);
        assert_eq!(out.get_pixel(30, 50)[0], BLACK);
        assert_eq!(out.get_pixel(50, 9)[0], WHITE);
        assert_eq!(out.get_pixel(50, 95)[0], WHITE);
    }

    #[test]
    fn vertical_offset_is_clamped_to_canvas() {
        let glyph = GrayImage::from_pixel(10, 20, Luma([0]));
        let params = NormalizeParams {
            target_size: 100,
            margin: 10,
            vertical_offset: 1000,
        };
        let out = normalize_glyph(&glyph, &params);
        assert_eq!(out.get_pixel(50, 19)[0], WHITE);
        assert_eq!(out.get_pixel(50, 99)[0], BLACK);
    }
}
