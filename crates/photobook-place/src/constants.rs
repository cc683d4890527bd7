//! Shared constants for placement and calibration
//!
//! This module centralizes magic numbers and constants used throughout
//! the placement pipeline.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f64 = 72.0 / 25.4; // ≈ 2.83465

// =============================================================================
// Resolution
// =============================================================================

/// Resolution book pages are scanned at
pub const DEFAULT_SCAN_DPI: u32 = 600;

/// Target print resolution
pub const DEFAULT_PRINT_DPI: u32 = 300;

// =============================================================================
// Detection Thresholds
// =============================================================================

/// Minimum confidence for detector-produced placeholders
pub const MIN_DETECTION_CONFIDENCE: f64 = 0.70;

/// Maximum expected placeholders per page
pub const MAX_PLACEHOLDERS_PER_PAGE: usize = 6;

/// Two regions whose intersection-over-union reaches this value overlap
/// too much to both be real placeholders
pub const MAX_OVERLAP_IOU: f64 = 0.10;

// =============================================================================
// Record Schemas
// =============================================================================

/// JSON schema version for detection and layout records
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Coordinate system tag carried by every record
pub const COORDINATE_SYSTEM: &str = "top_left_mm";

// =============================================================================
// Calibration
// =============================================================================

/// Calibration scale factors outside this band almost certainly mean a
/// mismeasured grid rather than a real printer error
pub const CALIBRATION_SCALE_SANE_MIN: f64 = 0.9;
pub const CALIBRATION_SCALE_SANE_MAX: f64 = 1.1;

// =============================================================================
// Error Budget (worst-case upper bounds, mm)
// =============================================================================

/// Geometric distortion introduced by the flatbed scan
pub const SCAN_DISTORTION_MM: f64 = 0.5;

/// Detector bounding-box positional error
pub const DETECTION_BBOX_ERROR_MM: f64 = 1.0;

/// Printer scaling residual left after calibration
pub const PRINTER_RESIDUAL_MM: f64 = 0.5;

/// Tolerance of cutting pages by hand
pub const CUTTING_TOLERANCE_MM: f64 = 0.5;
