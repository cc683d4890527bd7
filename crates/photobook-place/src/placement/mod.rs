//! Placement resolution - mapping images onto placeholders
//!
//! Two concerns live here:
//! 1. Assignment: which image goes into which placeholder
//! 2. Transform computation: the crop/scale taking each image into its
//!    placeholder at print resolution
//!
//! Given identical inputs the output is bit-for-bit reproducible: both
//! orderings are fully specified before pairing, nothing depends on map
//! iteration order, wall-clock or randomness.

mod assign;
mod transform;

pub use assign::{AssignmentStrategy, ExplicitAssignment};
pub use transform::compute_transform;

use crate::options::PlacementOptions;
use crate::types::*;

/// Result of resolving one page.
///
/// Unmatched placeholders are reported here rather than silently dropped;
/// unmatched images are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementOutcome {
    /// One transform per matched (placeholder, image) pair, in assignment order
    pub placements: Vec<PlacementTransform>,
    /// Placeholders no image was available for, in assignment order
    pub unmatched: Vec<String>,
    /// Non-fatal findings (low source resolution)
    pub warnings: Vec<Violation>,
}

/// Resolve placements for one page.
///
/// Validation and assignment failures are page-scoped: an error here says
/// nothing about sibling pages of a multi-page run.
pub fn resolve_placements(
    placeholders: &[PlaceholderRegion],
    images: &[ImageAsset],
    strategy: &AssignmentStrategy,
    options: &PlacementOptions,
) -> Result<PlacementOutcome> {
    options.validate()?;

    let assignment = assign::assign(strategy, placeholders, images)?;

    let mut placements = Vec::with_capacity(assignment.pairs.len());
    let mut warnings = Vec::new();

    for (region, image) in &assignment.pairs {
        let (placement, warning) =
            compute_transform(region, image, options.scaling_policy, options.print_dpi)?;
        if let Some(warning) = warning {
            log::warn!("{}", warning.message);
            warnings.push(warning);
        }
        placements.push(placement);
    }

    if !assignment.unmatched.is_empty() {
        log::warn!(
            "{} placeholder(s) left without an image: {}",
            assignment.unmatched.len(),
            assignment.unmatched.join(", ")
        );
    }
    log::info!(
        "resolved {} placement(s), {} unmatched",
        placements.len(),
        assignment.unmatched.len()
    );

    Ok(PlacementOutcome {
        placements,
        unmatched: assignment.unmatched,
        warnings,
    })
}
