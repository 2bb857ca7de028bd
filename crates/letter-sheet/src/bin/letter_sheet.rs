use clap::{Args, Parser, Subcommand};
use letter_sheet::{
    batch, sheet, AlphabetSource, CropMode, ExportOptions, NormalizeParams, SegmentParams,
    SheetConfig, SheetError,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "letter-sheet",
    version,
    about = "Split scanned handwritten alphabet sheets into one image per letter"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit structured JSON logs.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    json_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a single sheet.
    Split {
        input: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Split many sheets, in parallel, from a config file or a list of images.
    Batch {
        /// JSON config (see `letter-sheet config`); other flags are ignored.
        #[arg(long, conflicts_with = "inputs")]
        config: Option<PathBuf>,
        #[arg(required_unless_present = "config")]
        inputs: Vec<PathBuf>,
        #[command(flatten)]
        run: RunArgs,
        /// Batch report path (default: `<out>/report.json`).
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Threshold an image (or every .png in a directory) to black ink on white.
    Binarize {
        input: PathBuf,
        output: PathBuf,
        /// Fixed threshold instead of Otsu.
        #[arg(long)]
        threshold: Option<u8>,
    },
    /// Print the default configuration as JSON.
    Config,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Output directory.
    #[arg(short, long, default_value = "letters")]
    out: PathBuf,
    /// Builtin alphabet name or path to an alphabet JSON file.
    #[arg(long, default_value = "hebrew")]
    alphabet: String,
    /// Segmentation parameters JSON (partial overrides allowed).
    #[arg(long)]
    params: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = CropMode::Gray)]
    crop_mode: CropMode,
    /// Place each glyph on a square white canvas.
    #[arg(long)]
    normalize: bool,
    /// Canvas side used with `--normalize`.
    #[arg(long, default_value_t = 600)]
    target_size: u32,
    /// Output raster extension.
    #[arg(long, default_value = "png")]
    ext: String,
}

impl RunArgs {
    fn into_config(self, inputs: Vec<PathBuf>) -> Result<SheetConfig, SheetError> {
        let params = match &self.params {
            Some(path) => SegmentParams::load_json(path)?,
            None => SegmentParams::default(),
        };
        let normalize = self.normalize.then(|| NormalizeParams {
            target_size: self.target_size,
            ..NormalizeParams::default()
        });
        Ok(SheetConfig {
            inputs: inputs.iter().map(|p| p.display().to_string()).collect(),
            output_dir: self.out.display().to_string(),
            alphabet: AlphabetSource::Builtin(self.alphabet),
            params,
            export: ExportOptions {
                crop_mode: self.crop_mode,
                normalize,
                ext: self.ext,
            },
            report_path: None,
        })
    }
}

fn init_logging(cli: &Cli) {
    #[cfg(feature = "tracing")]
    {
        // The subscriber also installs the `log` bridge.
        letter_sheet::core::init_tracing(cli.json_log);
        log::set_max_level(letter_sheet::core::level_from_verbosity(cli.verbose));
    }
    #[cfg(not(feature = "tracing"))]
    {
        let level = letter_sheet::core::level_from_verbosity(cli.verbose);
        let _ = letter_sheet::core::init_with_level(level);
    }
}

fn run(cli: Cli) -> Result<ExitCode, SheetError> {
    match cli.command {
        Command::Split { input, run } => {
            let cfg = run.into_config(Vec::new())?;
            let segmenter = cfg.build_segmenter()?;
            let report = sheet::split_sheet(&segmenter, &input, &cfg.output_dir(), &cfg.export)?;
            println!("{}", serde_json::to_string_pretty(&report.status)?);
            for msg in &report.issues {
                eprintln!("warning: {msg}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Batch {
            config,
            inputs,
            run,
            report,
        } => {
            let mut cfg = match config {
                Some(path) => SheetConfig::load_json(path)?,
                None => run.into_config(inputs)?,
            };
            if let Some(path) = report {
                cfg.report_path = Some(path.display().to_string());
            }
            let report = batch::run_config(&cfg)?;
            println!(
                "{} images: {} ok, {} padded, {} degenerate, {} non-convergent, {} failed",
                report.images.len(),
                report.count(letter_sheet::ImageStatus::Ok),
                report.count(letter_sheet::ImageStatus::Padded),
                report.count(letter_sheet::ImageStatus::Degenerate),
                report.count(letter_sheet::ImageStatus::NonConvergent),
                report.failures(),
            );
            Ok(if report.failures() > 0 {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Binarize {
            input,
            output,
            threshold,
        } => {
            let n = sheet::binarize_path(&input, &output, threshold)?;
            println!("binarized {n} image(s)");
            Ok(ExitCode::SUCCESS)
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&SheetConfig::default())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
