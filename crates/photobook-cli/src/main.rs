use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use photobook_place::records::{DetectionRecord, LayoutRecord};
use photobook_place::{
    AssignmentStrategy, ErrorBudget, ExplicitAssignment, ImageAsset, PlacementOptions,
    ScalingPolicy, Severity, calibrate, resolve_placements, validate_page,
};

#[derive(Parser)]
#[command(name = "pbt", about = "Photobook placement tools CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a page's detection record
    Validate {
        /// Detection JSON file
        #[arg(short, long)]
        detection: PathBuf,

        /// Override the placeholder count limit
        #[arg(long)]
        max_placeholders: Option<usize>,

        /// Override the detector confidence floor
        #[arg(long)]
        min_confidence: Option<f64>,
    },

    /// Resolve image placements for a page into a layout record
    Layout {
        /// Detection JSON file
        #[arg(short, long)]
        detection: PathBuf,

        /// Directory containing user photos
        #[arg(short, long)]
        image_dir: PathBuf,

        /// Output layout JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Image scaling policy
        #[arg(long, default_value = "fill", value_enum)]
        scaling: ScalingArg,

        /// Target print resolution
        #[arg(long, default_value = "300")]
        print_dpi: u32,

        /// Explicit placeholder-to-image mapping JSON (array of
        /// {placeholder_id, image_id}); omit for automatic pairing
        #[arg(long)]
        mapping: Option<PathBuf>,
    },

    /// Apply a printer calibration profile to a layout record
    Calibrate {
        /// Layout JSON file
        #[arg(short, long)]
        layout: PathBuf,

        /// Output layout JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Directory holding calibration profiles
        #[arg(long, default_value = "calibration")]
        profile_dir: PathBuf,

        /// Printer the run targets
        #[arg(long)]
        printer: String,

        /// Paper type loaded in the printer
        #[arg(long)]
        paper: String,
    },

    /// Check placeholder margins against the alignment error budget
    Safety {
        /// Detection JSON file
        #[arg(short, long)]
        detection: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScalingArg {
    Fill,
    Fit,
    CenterCrop,
}

impl From<ScalingArg> for ScalingPolicy {
    fn from(arg: ScalingArg) -> Self {
        match arg {
            ScalingArg::Fill => Self::Fill,
            ScalingArg::Fit => Self::Fit,
            ScalingArg::CenterCrop => Self::CenterCrop,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            detection,
            max_placeholders,
            min_confidence,
        } => {
            let record = DetectionRecord::load(&detection).await?;
            let mut options = PlacementOptions::default();
            if let Some(max) = max_placeholders {
                options.max_placeholders_per_page = max;
            }
            if let Some(floor) = min_confidence {
                options.min_detection_confidence = floor;
            }
            options.validate()?;

            let report = validate_page(&record.page_size(), &record.placeholders, &options);
            for violation in &report.violations {
                let tag = match violation.severity {
                    Severity::Blocking => "error",
                    Severity::Warning => "warning",
                };
                println!("{tag}: {}", violation.message);
            }
            if !report.passed {
                bail!(
                    "page {} failed validation with {} blocking violation(s)",
                    record.page,
                    report.blocking_count()
                );
            }
            println!(
                "Page {} passed ({} placeholder(s), {} warning(s))",
                record.page,
                record.placeholders.len(),
                report.warning_count()
            );
        }

        Commands::Layout {
            detection,
            image_dir,
            output,
            scaling,
            print_dpi,
            mapping,
        } => {
            let record = DetectionRecord::load(&detection).await?;
            let options = PlacementOptions {
                print_dpi,
                scaling_policy: scaling.into(),
                ..Default::default()
            };
            options.validate()?;

            let report = validate_page(&record.page_size(), &record.placeholders, &options);
            for violation in &report.violations {
                println!("warning: {}", violation.message);
            }
            report.ensure_passed()?;

            let images = scan_image_dir(&image_dir).await?;
            if images.is_empty() {
                bail!("no images found in {}", image_dir.display());
            }

            let strategy = match mapping {
                Some(path) => AssignmentStrategy::Explicit(load_mapping(&path).await?),
                None => AssignmentStrategy::Auto,
            };

            let outcome = resolve_placements(&record.placeholders, &images, &strategy, &options)?;
            for warning in &outcome.warnings {
                println!("warning: {}", warning.message);
            }
            for id in &outcome.unmatched {
                println!("warning: placeholder {id} has no image");
            }

            let layout = LayoutRecord::new(
                record.page,
                &record.book_id,
                options.scaling_policy,
                &outcome.placements,
            );
            layout.save(&output).await?;
            println!(
                "Placed {} image(s) → {}",
                layout.positioned_images.len(),
                output.display()
            );
        }

        Commands::Calibrate {
            layout,
            output,
            profile_dir,
            printer,
            paper,
        } => {
            let mut record = LayoutRecord::load(&layout).await?;
            let profile = calibrate::load_profile(&profile_dir, &printer, &paper).await?;

            let outcome = calibrate::apply_calibration(&record.transforms(), profile.as_ref())?;
            match &outcome.state {
                calibrate::CalibrationState::Applied { .. } => {
                    println!("Applied calibration for {printer}/{paper}");
                }
                calibrate::CalibrationState::Absent => {
                    println!(
                        "No calibration profile for {printer}/{paper}; geometry written uncalibrated"
                    );
                }
            }

            let scaling_mode = record
                .positioned_images
                .first()
                .map(|p| p.scaling_mode)
                .unwrap_or_default();
            let mut calibrated =
                LayoutRecord::new(record.page, &record.book_id, scaling_mode, &outcome.placements);
            calibrated.calibration = outcome.state;
            record = calibrated;

            record.save(&output).await?;
            println!("Calibrated layout → {}", output.display());
        }

        Commands::Safety { detection } => {
            let record = DetectionRecord::load(&detection).await?;
            let budget = ErrorBudget::default();
            let page = record.page_size();

            println!("Error budget ({:.1} mm total):", budget.total_mm());
            for contribution in budget.contributions() {
                println!("  {:<26} {:.1} mm", contribution.name, contribution.magnitude_mm);
            }

            let mut unsafe_count = 0;
            for placeholder in &record.placeholders {
                let safe = budget.is_rect_safe(&placeholder.rect, &page);
                if !safe {
                    unsafe_count += 1;
                }
                println!(
                    "  {:<10} {}",
                    placeholder.id,
                    if safe { "ok" } else { "margin too tight" }
                );
            }
            if unsafe_count > 0 {
                bail!("{unsafe_count} placeholder(s) sit closer to the page edge than the error budget");
            }
        }
    }

    Ok(())
}

/// Collect image assets from a directory, ordered by path.
async fn scan_image_dir(dir: &Path) -> Result<Vec<ImageAsset>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("reading image directory {}", dir.display()))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png")
            });
        if is_image {
            paths.push(path);
        }
    }
    paths.sort();

    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let (width_px, height_px) = image::image_dimensions(&path)
            .with_context(|| format!("reading dimensions of {}", path.display()))?;
        images.push(ImageAsset::new(
            path.to_string_lossy().into_owned(),
            width_px,
            height_px,
        ));
    }
    Ok(images)
}

/// Load an explicit placeholder-to-image mapping.
async fn load_mapping(path: &Path) -> Result<Vec<ExplicitAssignment>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading mapping {}", path.display()))?;
    let mapping = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing mapping {}", path.display()))?;
    Ok(mapping)
}
