use letter_sheet_core::{PlaneError, Rect};
use serde::Serialize;

/// The input could not be turned into a pixel plane.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error(transparent)]
    Plane(#[from] PlaneError),
    /// The source could not be opened or decoded.
    #[error("cannot read {source_name}: {reason}")]
    Unreadable { source_name: String, reason: String },
}

impl LoadError {
    pub fn unreadable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        LoadError::Unreadable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Fatal, per-image segmentation failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentError {
    #[error("failed to load sheet: {0}")]
    Load(#[from] LoadError),
    #[error("{stage} produced {rect:?} outside the {width}x{height} image")]
    BoundsViolation {
        stage: &'static str,
        rect: Rect,
        width: u32,
        height: u32,
    },
}

impl From<PlaneError> for SegmentError {
    fn from(err: PlaneError) -> Self {
        SegmentError::Load(LoadError::Plane(err))
    }
}

/// Non-fatal conditions attached to a finished segmentation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentIssue {
    #[error("no letter components detected; all {synthetic} slots are synthetic")]
    DegenerateInput { synthetic: usize },
    #[error("merging stalled at {remaining} boxes for {target} slots")]
    MergeNonConvergence { remaining: usize, target: usize },
}
