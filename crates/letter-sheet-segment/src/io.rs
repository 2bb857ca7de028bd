//! JSON report helpers for segmentation runs.

use crate::{SegmentIssue, SegmentStatus, SheetSegmentation, StageStats};
use letter_sheet_core::Rect;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One exported region as listed in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub slot: usize,
    pub letter_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_point: Option<char>,
    pub synthetic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    pub file_name: String,
}

/// Serializable summary of a [`SheetSegmentation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentReport {
    pub width: usize,
    pub height: usize,
    pub status: SegmentStatus,
    pub stats: StageStats,
    /// Human-readable issue messages.
    #[serde(default)]
    pub issues: Vec<String>,
    pub regions: Vec<RegionRecord>,
    #[serde(default)]
    pub unassigned: Vec<Rect>,
}

impl SegmentReport {
    /// Build a report; `ext` is the raster extension used for region file names.
    pub fn new(seg: &SheetSegmentation, ext: &str) -> Self {
        let regions = seg
            .regions
            .iter()
            .map(|r| RegionRecord {
                slot: r.slot,
                letter_id: r.letter_id.clone(),
                code_point: r.code_point,
                synthetic: r.is_synthetic(),
                rect: r.rect,
                file_name: r.file_name(ext),
            })
            .collect();
        Self {
            width: seg.width,
            height: seg.height,
            status: seg.status(),
            stats: seg.stats,
            issues: seg.issues.iter().map(SegmentIssue::to_string).collect(),
            regions,
            unassigned: seg.unassigned.clone(),
        }
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
