use letter_sheet_core::{AlphabetError, PlaneError};
use letter_sheet_segment::{IoError, SegmentError};

/// Errors produced by the sheet-level helpers.
#[derive(thiserror::Error, Debug)]
pub enum SheetError {
    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] ::image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Plane(#[from] PlaneError),

    #[error(transparent)]
    Alphabet(#[from] AlphabetError),

    #[error(transparent)]
    Segment(#[from] SegmentError),

    #[error("image dimensions do not fit in memory (width={width}, height={height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("no input images given")]
    NoInputs,
}

impl From<IoError> for SheetError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Io(e) => SheetError::Io(e),
            IoError::Json(e) => SheetError::Json(e),
        }
    }
}
