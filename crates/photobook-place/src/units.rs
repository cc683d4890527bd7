//! Unit conversions between scan pixels, millimeters and device points
//!
//! Three coordinate contexts meet here:
//! - scan pixel space (top-left origin, scan DPI)
//! - physical millimeters (top-left origin)
//! - device points (bottom-left origin, 72 per inch)
//!
//! All arithmetic stays in `f64` with no intermediate rounding. Integral
//! pixel output is produced exactly once, at the consumption boundary,
//! through [`round_px`].

use crate::constants::{MM_PER_INCH, POINTS_PER_MM};
use crate::types::{PlaceError, Result};

fn check_dpi(dpi: f64) -> Result<()> {
    if !(dpi > 0.0) {
        return Err(PlaceError::InvalidParameter(format!(
            "DPI must be positive, got {dpi}"
        )));
    }
    Ok(())
}

/// Convert pixels to millimeters at the given resolution.
pub fn px_to_mm(px: f64, dpi: f64) -> Result<f64> {
    check_dpi(dpi)?;
    Ok((px / dpi) * MM_PER_INCH)
}

/// Convert millimeters to pixels at the given resolution.
pub fn mm_to_px(mm: f64, dpi: f64) -> Result<f64> {
    check_dpi(dpi)?;
    Ok((mm / MM_PER_INCH) * dpi)
}

/// Convert top-left millimeter coordinates to bottom-left device points.
///
/// Device space puts the origin at the bottom-left of the page, so the
/// Y axis flips against the page height.
pub fn mm_to_device_points(x_mm: f64, y_mm: f64, page_height_mm: f64) -> (f64, f64) {
    let x_pt = x_mm * POINTS_PER_MM;
    let y_pt = (page_height_mm - y_mm) * POINTS_PER_MM;
    (x_pt, y_pt)
}

/// Round a float pixel value to an integral pixel count.
///
/// Ties round to even, not toward zero; repeated truncation compounds
/// positional drift across the multi-stage pipeline, so this is the one
/// place float pixels become integers.
pub fn round_px(px: f64) -> i64 {
    px.round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_px_to_mm_at_scan_dpi() {
        // 600 pixels at 600 DPI = 1 inch = 25.4 mm
        assert_relative_eq!(px_to_mm(600.0, 600.0).unwrap(), 25.4);
    }

    #[test]
    fn test_mm_to_px_at_print_dpi() {
        // 25.4 mm = 1 inch = 300 pixels at 300 DPI
        assert_relative_eq!(mm_to_px(25.4, 300.0).unwrap(), 300.0);
    }

    #[test]
    fn test_roundtrip_preserves_value() {
        let px = 1234.5;
        let dpi = 600.0;
        let back = mm_to_px(px_to_mm(px, dpi).unwrap(), dpi).unwrap();
        assert_relative_eq!(back, px, max_relative = 1e-6);
    }

    #[test]
    fn test_zero_converts_to_zero() {
        assert_eq!(px_to_mm(0.0, 600.0).unwrap(), 0.0);
        assert_eq!(mm_to_px(0.0, 300.0).unwrap(), 0.0);
    }

    #[test]
    fn test_non_positive_dpi_rejected() {
        assert!(px_to_mm(100.0, 0.0).is_err());
        assert!(px_to_mm(100.0, -300.0).is_err());
        assert!(mm_to_px(100.0, 0.0).is_err());
        assert!(mm_to_px(100.0, f64::NAN).is_err());
    }

    #[test]
    fn test_device_points_flip_y() {
        // Top-left (10mm, 20mm) on a 297mm page
        let (x_pt, y_pt) = mm_to_device_points(10.0, 20.0, 297.0);
        assert_relative_eq!(x_pt, 10.0 * POINTS_PER_MM);
        assert_relative_eq!(y_pt, (297.0 - 20.0) * POINTS_PER_MM);
    }

    #[test]
    fn test_device_points_corners() {
        // Top-left page corner lands at the top of device space
        let (x_pt, y_pt) = mm_to_device_points(0.0, 0.0, 297.0);
        assert_eq!(x_pt, 0.0);
        assert_relative_eq!(y_pt, 297.0 * POINTS_PER_MM);

        // Bottom-left page corner is the device origin
        let (x_pt, y_pt) = mm_to_device_points(0.0, 297.0, 297.0);
        assert_eq!(x_pt, 0.0);
        assert_relative_eq!(y_pt, 0.0);
    }

    #[test]
    fn test_round_px_ties_to_even() {
        assert_eq!(round_px(0.5), 0);
        assert_eq!(round_px(1.5), 2);
        assert_eq!(round_px(2.5), 2);
        assert_eq!(round_px(2.4), 2);
        assert_eq!(round_px(2.6), 3);
    }
}
