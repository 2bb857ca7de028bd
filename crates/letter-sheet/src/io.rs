//! JSON configuration and batch report types.

use crate::SheetError;
use letter_sheet_core::{Alphabet, Letter};
use letter_sheet_segment::{SegmentParams, SegmentReport, SegmentStatus, SheetSegmenter};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// How region crops are rendered before being written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CropMode {
    /// Grayscale samples copied from the sheet.
    #[default]
    Gray,
    /// Each crop re-thresholded on its own: black ink on white.
    Binary,
}

/// Placement of a glyph on a square canvas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeParams {
    /// Canvas side in pixels.
    pub target_size: u32,
    /// Minimum blank border around the scaled glyph.
    pub margin: u32,
    /// Downward shift of the glyph, clamped so it stays on the canvas.
    pub vertical_offset: i32,
}

impl Default for NormalizeParams {
    fn default() -> Self {
        Self {
            target_size: 600,
            margin: 50,
            vertical_offset: 0,
        }
    }
}

fn default_ext() -> String {
    "png".to_string()
}

/// Rendering options for written regions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    #[serde(default)]
    pub crop_mode: CropMode,
    #[serde(default)]
    pub normalize: Option<NormalizeParams>,
    /// Raster extension; also selects the encoder.
    #[serde(default = "default_ext")]
    pub ext: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            crop_mode: CropMode::Gray,
            normalize: None,
            ext: default_ext(),
        }
    }
}

/// Alphabet reference inside a config: a builtin name or an inline list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlphabetSource {
    Builtin(String),
    Inline(Vec<Letter>),
}

impl Default for AlphabetSource {
    fn default() -> Self {
        AlphabetSource::Builtin("hebrew".to_string())
    }
}

impl AlphabetSource {
    /// Resolve to a validated alphabet.
    ///
    /// A builtin name that is not known is tried as a path to a JSON file.
    pub fn resolve(&self) -> Result<Alphabet, SheetError> {
        match self {
            AlphabetSource::Builtin(name) => match Alphabet::builtin(name) {
                Ok(alphabet) => Ok(alphabet),
                Err(err) if Path::new(name).is_file() => {
                    log::debug!("`{name}` is not a builtin alphabet ({err}); loading as file");
                    Ok(Alphabet::load_json(name)?)
                }
                Err(err) => Err(err.into()),
            },
            AlphabetSource::Inline(letters) => Ok(Alphabet::new(letters.clone())?),
        }
    }
}

fn default_output_dir() -> String {
    "letters".to_string()
}

/// Configuration for a `letter-sheet` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Sheet images to split.
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub alphabet: AlphabetSource,
    #[serde(default)]
    pub params: SegmentParams,
    #[serde(flatten)]
    pub export: ExportOptions,
    /// Where to write the batch report. Defaults to `<output_dir>/report.json`.
    #[serde(default)]
    pub report_path: Option<String>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output_dir: default_output_dir(),
            alphabet: AlphabetSource::default(),
            params: SegmentParams::default(),
            export: ExportOptions::default(),
            report_path: None,
        }
    }
}

impl SheetConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SheetError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn input_paths(&self) -> Vec<PathBuf> {
        self.inputs.iter().map(PathBuf::from).collect()
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }

    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.output_dir().join("report.json"))
    }

    /// Build a segmenter from the configured alphabet and parameters.
    pub fn build_segmenter(&self) -> Result<SheetSegmenter, SheetError> {
        Ok(SheetSegmenter::new(
            self.alphabet.resolve()?,
            self.params.clone(),
        ))
    }
}

/// Per-image outcome in a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    Ok,
    Padded,
    Degenerate,
    NonConvergent,
    Failed,
}

impl From<SegmentStatus> for ImageStatus {
    fn from(status: SegmentStatus) -> Self {
        match status {
            SegmentStatus::Complete => ImageStatus::Ok,
            SegmentStatus::Padded { .. } => ImageStatus::Padded,
            SegmentStatus::Degenerate => ImageStatus::Degenerate,
            SegmentStatus::NonConvergent { .. } => ImageStatus::NonConvergent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageReport {
    pub input: String,
    #[serde(default)]
    pub output_dir: Option<String>,
    pub status: ImageStatus,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmentation: Option<SegmentReport>,
}

impl ImageReport {
    pub fn succeeded(input: &Path, output_dir: &Path, report: SegmentReport) -> Self {
        Self {
            input: input.display().to_string(),
            output_dir: Some(output_dir.display().to_string()),
            status: report.status.into(),
            messages: report.issues.clone(),
            segmentation: Some(report),
        }
    }

    pub fn failed(input: &Path, err: &SheetError) -> Self {
        Self {
            input: input.display().to_string(),
            output_dir: None,
            status: ImageStatus::Failed,
            messages: vec![err.to_string()],
            segmentation: None,
        }
    }
}

/// Outcome of a multi-image run, one entry per input in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub images: Vec<ImageReport>,
}

impl BatchReport {
    pub fn count(&self, status: ImageStatus) -> usize {
        self.images.iter().filter(|r| r.status == status).count()
    }

    pub fn failures(&self) -> usize {
        self.count(ImageStatus::Failed)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SheetError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg: SheetConfig = serde_json::from_str(r#"{"inputs": ["a.png"]}"#).unwrap();
        assert_eq!(cfg.output_dir, "letters");
        assert_eq!(cfg.export, ExportOptions::default());
        assert_eq!(cfg.report_path(), PathBuf::from("letters/report.json"));
        assert_eq!(cfg.build_segmenter().unwrap().target(), 27);
    }

    #[test]
    fn inline_alphabet_and_export_options() {
        let cfg: SheetConfig = serde_json::from_str(
            r#"{
                "alphabet": [{"id": "a", "code_point": "a"}, {"id": "b"}],
                "crop_mode": "binary",
                "normalize": {"target_size": 300},
                "ext": "bmp"
            }"#,
        )
        .unwrap();
        let alphabet = cfg.alphabet.resolve().unwrap();
        assert_eq!(alphabet.len(), 2);
        assert_eq!(cfg.export.crop_mode, CropMode::Binary);
        assert_eq!(
            cfg.export.normalize,
            Some(NormalizeParams {
                target_size: 300,
                margin: 50,
                vertical_offset: 0
            })
        );
        assert_eq!(cfg.export.ext, "bmp");
    }

    #[test]
    fn unknown_alphabet_name_is_an_error() {
        let src = AlphabetSource::Builtin("klingon".into());
        assert!(matches!(src.resolve(), Err(SheetError::Alphabet(_))));
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        let mut cfg = SheetConfig::default();
        cfg.inputs.push("sheet.png".into());
        cfg.params.merge.gap_tolerance_px = 12;
        cfg.write_json(&path).unwrap();

        let back = SheetConfig::load_json(&path).unwrap();
        assert_eq!(back.inputs, cfg.inputs);
        assert_eq!(back.params, cfg.params);
        assert_eq!(back.alphabet, AlphabetSource::default());
    }
}
