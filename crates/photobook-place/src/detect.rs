//! Detector seam
//!
//! Placeholder detection is pluggable: anything that can produce regions
//! from a rasterized page scan implements [`Detector`]. The model-backed
//! detectors (layout analysis, trained object detection) live outside this
//! crate; what ships here is the contract plus the manual-annotation
//! fallback used when a page defeats the models.

use crate::types::*;
use crate::units::px_to_mm;

/// Metadata of one rasterized page scan.
///
/// Rasterization itself happens upstream; detectors only see the
/// already-materialized dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageScan {
    /// Page number, 1-indexed
    pub page_num: u32,
    pub width_px: u32,
    pub height_px: u32,
    /// Resolution the page was scanned at
    pub scan_dpi: u32,
}

impl PageScan {
    /// Physical page dimensions implied by the scan
    pub fn page_size_mm(&self) -> Result<(f64, f64)> {
        let dpi = f64::from(self.scan_dpi);
        Ok((
            px_to_mm(f64::from(self.width_px), dpi)?,
            px_to_mm(f64::from(self.height_px), dpi)?,
        ))
    }

    pub fn page(&self) -> Result<Page> {
        let (width_mm, height_mm) = self.page_size_mm()?;
        Ok(Page::new(width_mm, height_mm))
    }
}

/// Anything that finds placeholder regions on a scanned page
pub trait Detector {
    fn detect(&self, scan: &PageScan) -> Result<Vec<PlaceholderRegion>>;
}

/// Hand-authored annotations standing in for a model.
///
/// Regions come back tagged manual with confidence 1.0 regardless of how
/// they were authored.
#[derive(Debug, Clone, Default)]
pub struct ManualDetector {
    regions: Vec<PlaceholderRegion>,
}

impl ManualDetector {
    pub fn new(regions: Vec<PlaceholderRegion>) -> Self {
        Self { regions }
    }
}

impl Detector for ManualDetector {
    fn detect(&self, scan: &PageScan) -> Result<Vec<PlaceholderRegion>> {
        log::debug!(
            "manual detector returning {} region(s) for page {}",
            self.regions.len(),
            scan.page_num
        );
        Ok(self
            .regions
            .iter()
            .map(|region| PlaceholderRegion {
                method: DetectionMethod::Manual,
                confidence: 1.0,
                ..region.clone()
            })
            .collect())
    }
}
