use crate::constants::*;
use crate::types::*;

/// Placement pipeline configuration.
///
/// One immutable value passed into validation and placement resolution;
/// there is no process-wide configuration state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementOptions {
    /// Target print resolution
    pub print_dpi: u32,

    /// How images are scaled into placeholders
    pub scaling_policy: ScalingPolicy,

    /// Upper bound on placeholders per page
    pub max_placeholders_per_page: usize,

    /// Confidence floor for detector-produced regions (manual entries exempt)
    pub min_detection_confidence: f64,

    /// Pairwise IoU at or above this value is an overlap violation
    pub max_overlap_iou: f64,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            print_dpi: DEFAULT_PRINT_DPI,
            scaling_policy: ScalingPolicy::Fill,
            max_placeholders_per_page: MAX_PLACEHOLDERS_PER_PAGE,
            min_detection_confidence: MIN_DETECTION_CONFIDENCE,
            max_overlap_iou: MAX_OVERLAP_IOU,
        }
    }
}

impl PlacementOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.print_dpi == 0 {
            return Err(PlaceError::Config("print_dpi must be positive".to_string()));
        }
        if self.max_placeholders_per_page == 0 {
            return Err(PlaceError::Config(
                "max_placeholders_per_page must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_detection_confidence) {
            return Err(PlaceError::Config(format!(
                "min_detection_confidence must be in [0, 1], got {}",
                self.min_detection_confidence
            )));
        }
        if !(self.max_overlap_iou > 0.0 && self.max_overlap_iou <= 1.0) {
            return Err(PlaceError::Config(format!(
                "max_overlap_iou must be in (0, 1], got {}",
                self.max_overlap_iou
            )));
        }
        Ok(())
    }
}
