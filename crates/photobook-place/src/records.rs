//! Detection and layout record schemas
//!
//! The JSON interchange formats between pipeline stages: detectors write
//! detection records, placement resolution writes layout records, the
//! renderer reads them. One record per page in both directions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calibrate::CalibrationState;
use crate::constants::{COORDINATE_SYSTEM, SCHEMA_VERSION};
use crate::types::*;

/// Page dimensions as carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSizeMm {
    pub width: f64,
    pub height: f64,
}

/// Complete detection output for a single page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub schema_version: String,
    /// Page number, 1-indexed
    pub page: u32,
    pub book_id: String,
    pub scan_dpi: u32,
    pub page_size_mm: PageSizeMm,
    pub coordinate_system: String,
    pub placeholders: Vec<PlaceholderRegion>,
    pub validation_passed: bool,
    /// ISO 8601 timestamp, stamped by the detector run
    pub detected_at: String,
}

impl DetectionRecord {
    pub fn new(
        page: u32,
        book_id: impl Into<String>,
        scan_dpi: u32,
        page_size: &Page,
        placeholders: Vec<PlaceholderRegion>,
        detected_at: impl Into<String>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            page,
            book_id: book_id.into(),
            scan_dpi,
            page_size_mm: PageSizeMm {
                width: page_size.width_mm,
                height: page_size.height_mm,
            },
            coordinate_system: COORDINATE_SYSTEM.to_string(),
            placeholders,
            validation_passed: false,
            detected_at: detected_at.into(),
        }
    }

    pub fn page_size(&self) -> Page {
        Page::new(self.page_size_mm.width, self.page_size_mm.height)
    }

    /// Load a detection record from JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let record: Self = serde_json::from_slice(&bytes)?;
        if record.coordinate_system != COORDINATE_SYSTEM {
            return Err(PlaceError::Config(format!(
                "unsupported coordinate system: {}",
                record.coordinate_system
            )));
        }
        Ok(record)
    }

    /// Save the record to JSON file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

/// Crop/scale transform as carried on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRecord {
    pub scale_factor: f64,
    pub crop_rect_px: PixelRect,
}

/// One image positioned in one placeholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedImage {
    pub placeholder_id: String,
    pub source_image: String,
    pub target_bbox_mm: PhysicalRect,
    pub scaling_mode: ScalingPolicy,
    pub transform: TransformRecord,
}

impl PositionedImage {
    pub fn from_transform(placement: &PlacementTransform, scaling_mode: ScalingPolicy) -> Self {
        Self {
            placeholder_id: placement.placeholder_id.clone(),
            source_image: placement.image_id.clone(),
            target_bbox_mm: placement.target_rect,
            scaling_mode,
            transform: TransformRecord {
                scale_factor: placement.scale_factor,
                crop_rect_px: placement.crop_rect_px,
            },
        }
    }

    pub fn to_transform(&self) -> PlacementTransform {
        PlacementTransform {
            placeholder_id: self.placeholder_id.clone(),
            image_id: self.source_image.clone(),
            target_rect: self.target_bbox_mm,
            scale_factor: self.transform.scale_factor,
            crop_rect_px: self.transform.crop_rect_px,
        }
    }
}

/// Complete layout output for a single page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
    pub schema_version: String,
    pub page: u32,
    pub book_id: String,
    /// Whether the geometry has been calibrated, and against what
    #[serde(default = "absent")]
    pub calibration: CalibrationState,
    pub positioned_images: Vec<PositionedImage>,
}

fn absent() -> CalibrationState {
    CalibrationState::Absent
}

impl LayoutRecord {
    pub fn new(
        page: u32,
        book_id: impl Into<String>,
        scaling_mode: ScalingPolicy,
        placements: &[PlacementTransform],
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            page,
            book_id: book_id.into(),
            calibration: CalibrationState::Absent,
            positioned_images: placements
                .iter()
                .map(|placement| PositionedImage::from_transform(placement, scaling_mode))
                .collect(),
        }
    }

    pub fn transforms(&self) -> Vec<PlacementTransform> {
        self.positioned_images
            .iter()
            .map(PositionedImage::to_transform)
            .collect()
    }

    /// Load a layout record from JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Save the record to JSON file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_record_wire_format() {
        let json = r#"{
            "schema_version": "1.0.0",
            "page": 1,
            "book_id": "my_book",
            "scan_dpi": 600,
            "page_size_mm": {"width": 210.0, "height": 297.0},
            "coordinate_system": "top_left_mm",
            "placeholders": [
                {
                    "id": "p1",
                    "bbox_mm": {"x": 20.0, "y": 40.0, "width": 80.0, "height": 60.0},
                    "detection_method": "docling",
                    "confidence": 0.92
                }
            ],
            "validation_passed": true,
            "detected_at": "2025-11-03T14:30:00"
        }"#;

        let record: DetectionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.page, 1);
        assert_eq!(record.placeholders.len(), 1);
        assert_eq!(record.placeholders[0].method, DetectionMethod::Docling);
        assert_eq!(
            record.placeholders[0].rect,
            PhysicalRect::new(20.0, 40.0, 80.0, 60.0)
        );
        // notes is optional on the wire
        assert_eq!(record.placeholders[0].notes, "");
        assert_eq!(record.page_size(), Page::new(210.0, 297.0));
    }

    #[test]
    fn test_layout_record_roundtrip() {
        let placement = PlacementTransform {
            placeholder_id: "p1".to_string(),
            image_id: "photos/a.jpg".to_string(),
            target_rect: PhysicalRect::new(20.0, 40.0, 80.0, 60.0),
            scale_factor: 0.5906,
            crop_rect_px: PixelRect::new(0, 0, 1600, 1200),
        };
        let record = LayoutRecord::new(1, "my_book", ScalingPolicy::Fill, &[placement.clone()]);

        let json = serde_json::to_string(&record).unwrap();
        let back: LayoutRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.transforms(), vec![placement]);
        assert_eq!(back.calibration, CalibrationState::Absent);
    }

    #[test]
    fn test_calibration_state_serializes_tagged() {
        let record = LayoutRecord {
            schema_version: SCHEMA_VERSION.to_string(),
            page: 1,
            book_id: "my_book".to_string(),
            calibration: CalibrationState::Applied {
                printer_id: "office".to_string(),
                paper_type: "A4".to_string(),
            },
            positioned_images: vec![],
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""status":"applied""#));
        assert!(json.contains(r#""printer_id":"office""#));
    }
}
