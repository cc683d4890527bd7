//! Worst-case alignment error budget
//!
//! Sums the known per-stage error sources into one tolerance. The margin
//! check is a design-time constraint on the book layout (placeholder
//! margins must exceed the summed budget), not a per-run runtime check.

use crate::constants::*;
use crate::types::{Page, PhysicalRect};

/// One named error source with its upper-bound magnitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorContribution {
    pub name: &'static str,
    pub magnitude_mm: f64,
}

/// Ordered list of error contributions and their worst-case sum
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBudget {
    contributions: Vec<ErrorContribution>,
}

impl Default for ErrorBudget {
    fn default() -> Self {
        Self {
            contributions: vec![
                ErrorContribution {
                    name: "scan distortion",
                    magnitude_mm: SCAN_DISTORTION_MM,
                },
                ErrorContribution {
                    name: "detection bbox error",
                    magnitude_mm: DETECTION_BBOX_ERROR_MM,
                },
                ErrorContribution {
                    name: "printer scaling residual",
                    magnitude_mm: PRINTER_RESIDUAL_MM,
                },
                ErrorContribution {
                    name: "manual cutting tolerance",
                    magnitude_mm: CUTTING_TOLERANCE_MM,
                },
            ],
        }
    }
}

impl ErrorBudget {
    pub fn new(contributions: Vec<ErrorContribution>) -> Self {
        Self { contributions }
    }

    pub fn contributions(&self) -> &[ErrorContribution] {
        &self.contributions
    }

    /// Worst-case total: every source at its upper bound at once
    pub fn total_mm(&self) -> f64 {
        self.contributions.iter().map(|c| c.magnitude_mm).sum()
    }

    /// True iff every border of `rect` keeps at least the total budget of
    /// margin to the page edge, so accumulated error cannot push content
    /// off the placeholder's alignment.
    pub fn is_rect_safe(&self, rect: &PhysicalRect, page: &Page) -> bool {
        let total = self.total_mm();
        rect.x >= total
            && rect.y >= total
            && page.width_mm - rect.right() >= total
            && page.height_mm - rect.bottom() >= total
    }
}
