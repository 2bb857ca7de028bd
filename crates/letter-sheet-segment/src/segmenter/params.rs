use crate::adjust::{FrameParams, PaddingTable};
use crate::binarize::BinarizeParams;
use crate::components::ComponentParams;
use crate::reconcile::{MergeParams, PlaceholderParams};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Configuration for [`SheetSegmenter`](super::SheetSegmenter).
///
/// Every section falls back to its default, so a partial JSON document such
/// as `{"merge": {"gap_tolerance_px": 14}}` is a valid override.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentParams {
    pub binarize: BinarizeParams,
    pub components: ComponentParams,
    pub padding: PaddingTable,
    pub frame: FrameParams,
    pub merge: MergeParams,
    pub placeholder: PlaceholderParams,
}

impl SegmentParams {
    /// Load parameters from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, crate::IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write parameters to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), crate::IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
