//! Multi-image runs. Each sheet is independent and gets its own output
//! sub-directory; failures are recorded per image.

use crate::io::{BatchReport, ExportOptions, ImageReport, SheetConfig};
use crate::sheet::split_sheet;
use crate::SheetError;
use letter_sheet_segment::SheetSegmenter;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Sub-directory name per input: the file stem, suffixed with a number when
/// several inputs share a stem. Names are unique across the whole batch, so
/// parallel runs never write into the same directory.
fn output_names(inputs: &[PathBuf]) -> Vec<String> {
    let stems: Vec<String> = inputs
        .iter()
        .enumerate()
        .map(|(i, p)| {
            p.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("sheet_{i}"))
        })
        .collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for stem in &stems {
        *counts.entry(stem.as_str()).or_default() += 1;
    }
    let is_unique = |stem: &str| counts.get(stem) == Some(&1);

    // Unique stems keep their own name; suffixed names must not shadow them.
    let mut taken: HashSet<String> = stems
        .iter()
        .filter(|s| is_unique(s.as_str()))
        .cloned()
        .collect();
    stems
        .iter()
        .enumerate()
        .map(|(i, stem)| {
            if is_unique(stem.as_str()) {
                return stem.clone();
            }
            let mut n = i;
            let mut name = format!("{stem}_{n}");
            while !taken.insert(name.clone()) {
                n += 1;
                name = format!("{stem}_{n}");
            }
            name
        })
        .collect()
}

fn process_one(
    segmenter: &SheetSegmenter,
    input: &Path,
    out_dir: &Path,
    opts: &ExportOptions,
) -> ImageReport {
    match split_sheet(segmenter, input, out_dir, opts) {
        Ok(report) => {
            log::info!("{}: {:?}", input.display(), report.status);
            ImageReport::succeeded(input, out_dir, report)
        }
        Err(err) => {
            log::warn!("{}: failed: {err}", input.display());
            ImageReport::failed(input, &err)
        }
    }
}

/// Split every input sheet into `out_dir/<stem>/`.
///
/// Runs in parallel when more than one input is given. The report lists the
/// inputs in their original order.
pub fn run_batch(
    segmenter: &SheetSegmenter,
    inputs: &[PathBuf],
    out_dir: &Path,
    opts: &ExportOptions,
) -> BatchReport {
    let jobs: Vec<(&PathBuf, PathBuf)> = inputs
        .iter()
        .zip(output_names(inputs))
        .map(|(input, name)| (input, out_dir.join(name)))
        .collect();

    let images: Vec<ImageReport> = if jobs.len() > 1 {
        jobs.par_iter()
            .map(|(input, dir)| process_one(segmenter, input, dir, opts))
            .collect()
    } else {
        jobs.iter()
            .map(|(input, dir)| process_one(segmenter, input, dir, opts))
            .collect()
    };

    let report = BatchReport { images };
    log::info!(
        "batch done: {} images, {} failed",
        report.images.len(),
        report.failures()
    );
    report
}

/// Run a whole [`SheetConfig`] and write its batch report.
pub fn run_config(cfg: &SheetConfig) -> Result<BatchReport, SheetError> {
    if cfg.inputs.is_empty() {
        return Err(SheetError::NoInputs);
    }
    let segmenter = cfg.build_segmenter()?;
    let out_dir = cfg.output_dir();
    fs::create_dir_all(&out_dir)?;

    let report = run_batch(&segmenter, &cfg.input_paths(), &out_dir, &cfg.export);

    let report_path = cfg.report_path();
    if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    report.write_json(&report_path)?;
    Ok(report)
}
