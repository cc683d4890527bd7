//! Image-to-placeholder assignment strategies

use std::collections::{HashMap, HashSet};

use crate::types::*;

/// One caller-supplied (placeholder, image) pairing
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExplicitAssignment {
    pub placeholder_id: String,
    pub image_id: String,
}

/// How images are paired with placeholders
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentStrategy {
    /// Largest placeholder gets the lexicographically first image:
    /// placeholders ordered by area descending (id ascending on ties),
    /// images by identifier ascending, paired by position.
    Auto,
    /// Caller supplies exact pairings; dangling references fail
    Explicit(Vec<ExplicitAssignment>),
}

/// Ordered pairs plus the placeholders nothing was assigned to
pub(crate) struct Assignment<'a> {
    pub pairs: Vec<(&'a PlaceholderRegion, &'a ImageAsset)>,
    pub unmatched: Vec<String>,
}

pub(crate) fn assign<'a>(
    strategy: &AssignmentStrategy,
    placeholders: &'a [PlaceholderRegion],
    images: &'a [ImageAsset],
) -> Result<Assignment<'a>> {
    match strategy {
        AssignmentStrategy::Auto => Ok(assign_auto(placeholders, images)),
        AssignmentStrategy::Explicit(mapping) => assign_explicit(mapping, placeholders, images),
    }
}

fn assign_auto<'a>(
    placeholders: &'a [PlaceholderRegion],
    images: &'a [ImageAsset],
) -> Assignment<'a> {
    let mut ordered_regions: Vec<&PlaceholderRegion> = placeholders.iter().collect();
    ordered_regions.sort_by(|a, b| {
        b.rect
            .area()
            .total_cmp(&a.rect.area())
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut ordered_images: Vec<&ImageAsset> = images.iter().collect();
    ordered_images.sort_by(|a, b| a.id.cmp(&b.id));

    let pairs: Vec<_> = ordered_regions
        .iter()
        .zip(ordered_images.iter())
        .map(|(&region, &image)| (region, image))
        .collect();

    // Placeholders past the image count stay unmatched; surplus images
    // are simply not placed.
    let unmatched = ordered_regions
        .iter()
        .skip(ordered_images.len())
        .map(|region| region.id.clone())
        .collect();

    Assignment { pairs, unmatched }
}

fn assign_explicit<'a>(
    mapping: &[ExplicitAssignment],
    placeholders: &'a [PlaceholderRegion],
    images: &'a [ImageAsset],
) -> Result<Assignment<'a>> {
    let regions_by_id: HashMap<&str, &PlaceholderRegion> = placeholders
        .iter()
        .map(|region| (region.id.as_str(), region))
        .collect();
    let images_by_id: HashMap<&str, &ImageAsset> =
        images.iter().map(|image| (image.id.as_str(), image)).collect();

    let mut assigned = HashSet::new();
    let mut pairs = Vec::with_capacity(mapping.len());

    for entry in mapping {
        let region = regions_by_id
            .get(entry.placeholder_id.as_str())
            .ok_or_else(|| PlaceError::UnknownPlaceholder(entry.placeholder_id.clone()))?;
        let image = images_by_id
            .get(entry.image_id.as_str())
            .ok_or_else(|| PlaceError::UnknownImage(entry.image_id.clone()))?;
        if !assigned.insert(entry.placeholder_id.as_str()) {
            return Err(PlaceError::DuplicateAssignment(entry.placeholder_id.clone()));
        }
        pairs.push((*region, *image));
    }

    // Placeholders the mapping never mentions are unmatched, in page order.
    let unmatched = placeholders
        .iter()
        .filter(|region| !assigned.contains(region.id.as_str()))
        .map(|region| region.id.clone())
        .collect();

    Ok(Assignment { pairs, unmatched })
}
