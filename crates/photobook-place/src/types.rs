use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaceError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Unknown placeholder: {0}")]
    UnknownPlaceholder(String),
    #[error("Unknown image: {0}")]
    UnknownImage(String),
    #[error("Placeholder assigned more than once: {0}")]
    DuplicateAssignment(String),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
    #[cfg(feature = "serde")]
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlaceError>;

/// Axis-aligned rectangle in millimeters, measured from the top-left
/// corner of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalRect {
    /// X position from the left page edge (mm)
    pub x: f64,
    /// Y position from the top page edge (mm)
    pub y: f64,
    /// Width (mm)
    pub width: f64,
    /// Height (mm)
    pub height: f64,
}

impl PhysicalRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate (mm)
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y coordinate (mm), top-left origin so bottom is y + height
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Axis-aligned rectangle in image pixel space (top-left origin).
///
/// Crop rectangles are integral; rounding from float pixel space happens
/// exactly once, when this type is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Standard paper sizes for the printed book pages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaperSize {
    A4,
    /// 7x10 inch photo paper
    Photo7x10,
    Custom { width_mm: f64, height_mm: f64 },
}

impl PaperSize {
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::Photo7x10 => (177.8, 254.0),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Unprintable border most printers impose on this stock
    pub fn printable_margin_mm(self) -> f64 {
        match self {
            PaperSize::A4 => 5.0,
            PaperSize::Photo7x10 => 3.0,
            PaperSize::Custom { .. } => 5.0,
        }
    }
}

/// Physical page dimensions; immutable per document, origin top-left
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Page {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }

    pub fn from_paper(paper: PaperSize) -> Self {
        let (width_mm, height_mm) = paper.dimensions_mm();
        Self {
            width_mm,
            height_mm,
        }
    }
}

/// How a placeholder region was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DetectionMethod {
    /// Document layout analysis
    Docling,
    /// Trained object detector
    Yolo,
    /// Hand-authored annotation
    Manual,
}

impl DetectionMethod {
    /// Manual entries always carry confidence 1.0 and are exempt from the
    /// detector confidence floor.
    pub fn is_manual(self) -> bool {
        matches!(self, DetectionMethod::Manual)
    }
}

/// A detected placeholder region on one page.
///
/// Immutable once validated; placement resolution consumes but never
/// mutates these.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceholderRegion {
    /// Unique identifier within the page
    pub id: String,
    #[cfg_attr(feature = "serde", serde(rename = "bbox_mm"))]
    pub rect: PhysicalRect,
    #[cfg_attr(feature = "serde", serde(rename = "detection_method"))]
    pub method: DetectionMethod,
    /// Detection confidence in [0, 1]
    pub confidence: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub notes: String,
}

/// A user photograph known only by identifier and pixel dimensions.
/// The image inventory owning the actual pixel data stays with the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub id: String,
    pub width_px: u32,
    pub height_px: u32,
}

impl ImageAsset {
    pub fn new(id: impl Into<String>, width_px: u32, height_px: u32) -> Self {
        Self {
            id: id.into(),
            width_px,
            height_px,
        }
    }
}

/// Image-to-region scaling policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScalingPolicy {
    /// Scale to cover the region completely, cropping the longer axis
    #[default]
    Fill,
    /// Scale to sit inside the region, leaving symmetric borders
    Fit,
    /// Crop to the region's aspect first, then scale to fill exactly.
    /// Same geometry as `Fill`; kept as a distinct policy name for callers.
    CenterCrop,
}

/// Crop/scale transform placing one image into one placeholder.
///
/// Produced once per (placeholder, image) pair and never mutated;
/// calibration returns fresh copies.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementTransform {
    pub placeholder_id: String,
    pub image_id: String,
    /// Destination rectangle on the page (mm, top-left origin)
    pub target_rect: PhysicalRect,
    /// Uniform scale from cropped source pixels to target pixels
    pub scale_factor: f64,
    /// Crop rectangle in source image pixel space
    pub crop_rect_px: PixelRect,
}

/// Per-printer/paper geometric correction, applied uniformly to every
/// placement of a render run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationProfile {
    pub printer_id: String,
    pub paper_type: String,
    pub scale_factor_x: f64,
    pub scale_factor_y: f64,
    pub offset_mm: OffsetMm,
}

/// Millimeter offset pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffsetMm {
    pub x: f64,
    pub y: f64,
}

/// How serious a validation finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Severity {
    /// The pipeline must halt before placement
    Blocking,
    /// Surfaced to the user; the pipeline may continue
    Warning,
}

/// Machine-readable violation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ViolationCode {
    EmptyPage,
    TooManyPlaceholders,
    DuplicateId,
    OutOfBounds,
    LowConfidence,
    Overlap,
    LowResolution,
}

/// One structured validation finding
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Violation {
    pub code: ViolationCode,
    pub severity: Severity,
    pub message: String,
}

impl Violation {
    pub fn blocking(code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Blocking,
            message: message.into(),
        }
    }

    pub fn warning(code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Everything the validator found on one page, in discovery order.
/// Validation never short-circuits; callers get the full list in one pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationReport {
    /// True iff no blocking violations were found
    pub passed: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn blocking_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Blocking)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Warning)
            .count()
    }

    /// Turn blocking violations into an error, for callers that want to
    /// halt the pipeline rather than inspect the report.
    pub fn ensure_passed(&self) -> Result<()> {
        if self.passed {
            return Ok(());
        }
        let summary = self
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Blocking)
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        Err(PlaceError::ValidationFailed(summary))
    }
}
