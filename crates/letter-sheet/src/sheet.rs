//! Image-level helpers: decoding, segmenting and writing letter regions.

use crate::glyph::{binarize_plane, render_region};
use crate::io::ExportOptions;
use crate::SheetError;
use ::image::{GrayImage, ImageReader};
use letter_sheet_core::{PixelPlane, PlaneView};
use letter_sheet_segment::{
    LoadError, SegmentError, SegmentReport, SheetSegmentation, SheetSegmenter,
};
use std::{fs, path::Path};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// File name of the per-sheet region manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Borrow an `image::GrayImage` as a plane view.
pub fn gray_view(img: &GrayImage) -> PlaneView<'_> {
    PlaneView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Decode any supported raster file into 8-bit grayscale.
///
/// Missing, unreadable or undecodable files fail with
/// [`LoadError::Unreadable`].
pub fn load_gray(path: impl AsRef<Path>) -> Result<GrayImage, SheetError> {
    let path = path.as_ref();
    let unreadable = |reason: &dyn std::fmt::Display| {
        SheetError::from(SegmentError::from(LoadError::unreadable(
            path.display().to_string(),
            reason,
        )))
    };
    let reader = ImageReader::open(path).map_err(|e| unreadable(&e))?;
    let img = reader.decode().map_err(|e| unreadable(&e))?;
    Ok(img.to_luma8())
}

/// Build an owned plane from a raw grayscale buffer.
pub fn plane_from_gray_u8(width: u32, height: u32, pixels: &[u8]) -> Result<PixelPlane, SheetError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(SheetError::InvalidDimensions { width, height });
    };
    Ok(PixelPlane::from_raw(w, h, pixels.to_vec())?)
}

/// Convert a plane back into an `image::GrayImage`.
pub fn plane_to_image(plane: &PixelPlane) -> Result<GrayImage, SheetError> {
    let (width, height) = (plane.width as u32, plane.height as u32);
    GrayImage::from_raw(width, height, plane.data.clone())
        .ok_or(SheetError::InvalidDimensions { width, height })
}

/// Segment a decoded sheet.
pub fn segment_image(
    segmenter: &SheetSegmenter,
    img: &GrayImage,
) -> Result<SheetSegmentation, SheetError> {
    Ok(segmenter.segment(&gray_view(img))?)
}

/// Write every region of `seg` into `out_dir` plus a [`MANIFEST_FILE`].
pub fn write_regions(
    seg: &SheetSegmentation,
    out_dir: &Path,
    opts: &ExportOptions,
) -> Result<SegmentReport, SheetError> {
    fs::create_dir_all(out_dir)?;
    for region in &seg.regions {
        let path = out_dir.join(region.file_name(&opts.ext));
        render_region(region, opts)?.save(&path)?;
    }
    let report = SegmentReport::new(seg, &opts.ext);
    report.write_json(out_dir.join(MANIFEST_FILE))?;
    log::debug!(
        "wrote {} regions to {}",
        seg.regions.len(),
        out_dir.display()
    );
    Ok(report)
}

/// Load, segment and export one sheet.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(segmenter, opts), fields(input = %input.display()))
)]
pub fn split_sheet(
    segmenter: &SheetSegmenter,
    input: &Path,
    out_dir: &Path,
    opts: &ExportOptions,
) -> Result<SegmentReport, SheetError> {
    let img = load_gray(input)?;
    let seg = segment_image(segmenter, &img)?;
    for issue in &seg.issues {
        log::warn!("{}: {issue}", input.display());
    }
    write_regions(&seg, out_dir, opts)
}

/// Black-ink-on-white rendering of a whole image.
pub fn binarize_image(img: &GrayImage, threshold: Option<u8>) -> Result<GrayImage, SheetError> {
    plane_to_image(&binarize_plane(&gray_view(img), threshold))
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Binarize `input` into `output`.
///
/// When `input` is a directory every `.png` directly inside it is converted
/// into a same-named file under the `output` directory. Returns the number of
/// images written.
pub fn binarize_path(input: &Path, output: &Path, threshold: Option<u8>) -> Result<usize, SheetError> {
    if !input.is_dir() {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        binarize_image(&load_gray(input)?, threshold)?.save(output)?;
        return Ok(1);
    }

    fs::create_dir_all(output)?;
    let mut files = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        if path.is_file() && is_png(&path) {
            files.push(path);
        }
    }
    files.sort();
    for path in &files {
        let Some(name) = path.file_name() else {
            continue;
        };
        binarize_image(&load_gray(path)?, threshold)?.save(output.join(name))?;
    }
    log::info!("binarized {} images into {}", files.len(), output.display());
    Ok(files.len())
}
