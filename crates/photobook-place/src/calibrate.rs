//! Printer calibration
//!
//! A calibration profile corrects one printer/paper combination's
//! systematic geometric error with a per-axis scale and a millimeter
//! offset. The correction applies uniformly to every placement of a run
//! and always returns a fresh set, leaving the pre-calibration placements
//! available for diagnostics.

use crate::constants::{CALIBRATION_SCALE_SANE_MAX, CALIBRATION_SCALE_SANE_MIN};
use crate::types::*;

/// Whether a run was calibrated, and with what.
///
/// An absent profile is operationally different from an explicit identity
/// profile; callers see which of the two happened.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", tag = "status"))]
pub enum CalibrationState {
    /// A profile was applied
    Applied {
        printer_id: String,
        paper_type: String,
    },
    /// No profile exists for the printer/paper pair; geometry passed
    /// through unchanged
    Absent,
}

/// Calibrated placements plus how they got that way
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationOutcome {
    pub placements: Vec<PlacementTransform>,
    pub state: CalibrationState,
}

impl CalibrationProfile {
    /// An explicit do-nothing profile, distinct from no profile at all
    pub fn identity(printer_id: impl Into<String>, paper_type: impl Into<String>) -> Self {
        Self {
            printer_id: printer_id.into(),
            paper_type: paper_type.into(),
            scale_factor_x: 1.0,
            scale_factor_y: 1.0,
            offset_mm: OffsetMm::default(),
        }
    }

    /// Validate the profile
    pub fn validate(&self) -> Result<()> {
        if !(self.scale_factor_x > 0.0 && self.scale_factor_y > 0.0) {
            return Err(PlaceError::Config(format!(
                "calibration scale factors must be positive, got ({}, {})",
                self.scale_factor_x, self.scale_factor_y
            )));
        }
        for scale in [self.scale_factor_x, self.scale_factor_y] {
            if !(CALIBRATION_SCALE_SANE_MIN..=CALIBRATION_SCALE_SANE_MAX).contains(&scale) {
                log::warn!(
                    "calibration scale {} for {}/{} is outside the plausible {}..{} band",
                    scale,
                    self.printer_id,
                    self.paper_type,
                    CALIBRATION_SCALE_SANE_MIN,
                    CALIBRATION_SCALE_SANE_MAX
                );
            }
        }
        Ok(())
    }

    fn remap(&self, rect: &PhysicalRect) -> PhysicalRect {
        PhysicalRect::new(
            rect.x * self.scale_factor_x + self.offset_mm.x,
            rect.y * self.scale_factor_y + self.offset_mm.y,
            rect.width * self.scale_factor_x,
            rect.height * self.scale_factor_y,
        )
    }
}

/// Apply a calibration profile to every placement of one page's run.
///
/// `None` means no profile was found for the printer/paper pair: the
/// placements come back unchanged under `CalibrationState::Absent` rather
/// than silently pretending an identity calibration existed.
pub fn apply_calibration(
    placements: &[PlacementTransform],
    profile: Option<&CalibrationProfile>,
) -> Result<CalibrationOutcome> {
    let Some(profile) = profile else {
        log::info!(
            "no calibration profile; {} placement(s) pass through unchanged",
            placements.len()
        );
        return Ok(CalibrationOutcome {
            placements: placements.to_vec(),
            state: CalibrationState::Absent,
        });
    };

    profile.validate()?;

    let calibrated = placements
        .iter()
        .map(|placement| PlacementTransform {
            target_rect: profile.remap(&placement.target_rect),
            ..placement.clone()
        })
        .collect();

    log::info!(
        "applied calibration {}/{} to {} placement(s)",
        profile.printer_id,
        profile.paper_type,
        placements.len()
    );

    Ok(CalibrationOutcome {
        placements: calibrated,
        state: CalibrationState::Applied {
            printer_id: profile.printer_id.clone(),
            paper_type: profile.paper_type.clone(),
        },
    })
}

/// File name a profile is stored under, one file per (printer, paper) key
#[cfg(feature = "serde")]
pub fn profile_file_name(printer_id: &str, paper_type: &str) -> String {
    format!("printer_calibration_{printer_id}_{paper_type}.json")
}

/// Load the profile for a printer/paper pair from a profile directory.
///
/// A missing file is the expected-absent case and returns `Ok(None)`;
/// an unreadable or malformed file is an error.
#[cfg(feature = "serde")]
pub async fn load_profile(
    dir: impl AsRef<std::path::Path>,
    printer_id: &str,
    paper_type: &str,
) -> Result<Option<CalibrationProfile>> {
    let path = dir.as_ref().join(profile_file_name(printer_id, paper_type));
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let profile: CalibrationProfile = serde_json::from_slice(&bytes)?;
    profile.validate()?;
    Ok(Some(profile))
}

/// Save a profile into a profile directory
#[cfg(feature = "serde")]
pub async fn save_profile(
    dir: impl AsRef<std::path::Path>,
    profile: &CalibrationProfile,
) -> Result<()> {
    profile.validate()?;
    let path = dir
        .as_ref()
        .join(profile_file_name(&profile.printer_id, &profile.paper_type));
    let json = serde_json::to_string_pretty(profile)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn placement(rect: PhysicalRect) -> PlacementTransform {
        PlacementTransform {
            placeholder_id: "p1".to_string(),
            image_id: "a.jpg".to_string(),
            target_rect: rect,
            scale_factor: 0.59,
            crop_rect_px: PixelRect::new(0, 0, 1600, 1200),
        }
    }

    #[test]
    fn test_identity_profile_changes_nothing() {
        let placements = [placement(PhysicalRect::new(20.0, 40.0, 80.0, 60.0))];
        let profile = CalibrationProfile::identity("office", "A4");

        let outcome = apply_calibration(&placements, Some(&profile)).unwrap();
        assert_eq!(outcome.placements[0].target_rect, placements[0].target_rect);
        assert!(matches!(outcome.state, CalibrationState::Applied { .. }));
    }

    #[test]
    fn test_scale_and_offset_remap() {
        let placements = [placement(PhysicalRect::new(20.0, 40.0, 80.0, 60.0))];
        let profile = CalibrationProfile {
            printer_id: "office".to_string(),
            paper_type: "A4".to_string(),
            scale_factor_x: 0.98,
            scale_factor_y: 0.99,
            offset_mm: OffsetMm { x: 2.0, y: 1.5 },
        };

        let outcome = apply_calibration(&placements, Some(&profile)).unwrap();
        let rect = outcome.placements[0].target_rect;
        assert_relative_eq!(rect.x, 21.6, epsilon = 1e-9);
        assert_relative_eq!(rect.y, 41.1, epsilon = 1e-9);
        assert_relative_eq!(rect.width, 78.4, epsilon = 1e-9);
        assert_relative_eq!(rect.height, 59.4, epsilon = 1e-9);
        // Crop and scale are printer-independent
        assert_eq!(outcome.placements[0].crop_rect_px, placements[0].crop_rect_px);
        assert_eq!(outcome.placements[0].scale_factor, placements[0].scale_factor);
    }

    #[test]
    fn test_absent_profile_is_observable_noop() {
        let placements = [placement(PhysicalRect::new(20.0, 40.0, 80.0, 60.0))];

        let outcome = apply_calibration(&placements, None).unwrap();
        assert_eq!(outcome.placements, placements.to_vec());
        assert_eq!(outcome.state, CalibrationState::Absent);
    }

    #[test]
    fn test_input_placements_untouched() {
        let placements = [placement(PhysicalRect::new(20.0, 40.0, 80.0, 60.0))];
        let profile = CalibrationProfile {
            scale_factor_x: 1.05,
            ..CalibrationProfile::identity("office", "A4")
        };

        let _ = apply_calibration(&placements, Some(&profile)).unwrap();
        // Originals stay available for diagnostics
        assert_eq!(placements[0].target_rect, PhysicalRect::new(20.0, 40.0, 80.0, 60.0));
    }

    #[test]
    fn test_non_positive_scale_rejected() {
        let placements = [placement(PhysicalRect::new(20.0, 40.0, 80.0, 60.0))];
        let profile = CalibrationProfile {
            scale_factor_x: 0.0,
            ..CalibrationProfile::identity("office", "A4")
        };

        assert!(apply_calibration(&placements, Some(&profile)).is_err());
    }
}
