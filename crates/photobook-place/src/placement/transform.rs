//! Crop/scale transform computation
//!
//! Converts a placeholder's millimeter target rectangle into pixel space at
//! print resolution and derives the crop and uniform scale taking the source
//! image there. Geometry stays in `f64`; the crop rectangle is the single
//! integral emission point.

use crate::types::*;
use crate::units::{mm_to_px, round_px};

/// Compute the transform placing `image` into `region` under `policy`.
///
/// Returns the transform plus an optional low-resolution warning when the
/// source has fewer pixels than the target needs (the placement upscales).
pub fn compute_transform(
    region: &PlaceholderRegion,
    image: &ImageAsset,
    policy: ScalingPolicy,
    print_dpi: u32,
) -> Result<(PlacementTransform, Option<Violation>)> {
    if image.width_px == 0 || image.height_px == 0 {
        return Err(PlaceError::InvalidParameter(format!(
            "image {} has zero pixel extent",
            image.id
        )));
    }

    let dpi = f64::from(print_dpi);
    let target_w_px = mm_to_px(region.rect.width, dpi)?;
    let target_h_px = mm_to_px(region.rect.height, dpi)?;

    let (crop_rect_px, scale_factor) = match policy {
        // Center-crop shares fill's geometry; the two stay separate policy
        // names at the API surface.
        ScalingPolicy::Fill | ScalingPolicy::CenterCrop => {
            cover_crop(image, target_w_px, target_h_px)
        }
        ScalingPolicy::Fit => fit_whole(image, target_w_px, target_h_px),
    };

    let placement = PlacementTransform {
        placeholder_id: region.id.clone(),
        image_id: image.id.clone(),
        target_rect: region.rect,
        scale_factor,
        crop_rect_px,
    };

    // Source pixel density per printed inch is print_dpi / scale; a scale
    // above 1.0 means the source is being stretched past its resolution.
    let warning = if scale_factor > 1.0 {
        let effective_dpi = dpi / scale_factor;
        Some(Violation::warning(
            ViolationCode::LowResolution,
            format!(
                "image {} in placeholder {} prints at ~{:.0} dpi, below the {} dpi target",
                image.id, region.id, effective_dpi, print_dpi
            ),
        ))
    } else {
        None
    };

    Ok((placement, warning))
}

/// Largest centered crop matching the target aspect ratio, scaled to cover
/// the target exactly. The longer axis loses pixels symmetrically from
/// both sides.
fn cover_crop(image: &ImageAsset, target_w_px: f64, target_h_px: f64) -> (PixelRect, f64) {
    let img_w = f64::from(image.width_px);
    let img_h = f64::from(image.height_px);
    let r_target = target_w_px / target_h_px;
    let r_img = img_w / img_h;

    let (crop_w, crop_h) = if r_img > r_target {
        // Image is wider than the target: full height, crop the sides
        (img_h * r_target, img_h)
    } else {
        // Image is taller (or equal): full width, crop top and bottom
        (img_w, img_w / r_target)
    };

    let crop = PixelRect::new(
        round_px((img_w - crop_w) / 2.0),
        round_px((img_h - crop_h) / 2.0),
        round_px(crop_w).max(1),
        round_px(crop_h).max(1),
    );
    let scale_factor = target_w_px / crop.width as f64;

    (crop, scale_factor)
}

/// Whole image, no crop; scaled to sit inside the target. The renderer
/// centers the result and fills the leftover border.
fn fit_whole(image: &ImageAsset, target_w_px: f64, target_h_px: f64) -> (PixelRect, f64) {
    let img_w = f64::from(image.width_px);
    let img_h = f64::from(image.height_px);

    let crop = PixelRect::new(0, 0, i64::from(image.width_px), i64::from(image.height_px));
    let scale_factor = (target_w_px / img_w).min(target_h_px / img_h);

    (crop, scale_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn region(width_mm: f64, height_mm: f64) -> PlaceholderRegion {
        PlaceholderRegion {
            id: "p1".to_string(),
            rect: PhysicalRect::new(20.0, 40.0, width_mm, height_mm),
            method: DetectionMethod::Docling,
            confidence: 0.92,
            notes: String::new(),
        }
    }

    #[test]
    fn test_fill_matching_aspect_keeps_whole_image() {
        // 80x60 mm target and 1600x1200 px image are both 4:3
        let region = region(80.0, 60.0);
        let image = ImageAsset::new("photo.jpg", 1600, 1200);

        let (placement, warning) =
            compute_transform(&region, &image, ScalingPolicy::Fill, 300).unwrap();

        assert_eq!(placement.crop_rect_px, PixelRect::new(0, 0, 1600, 1200));
        let target_w_px = 80.0 / 25.4 * 300.0;
        assert_relative_eq!(placement.scale_factor, target_w_px / 1600.0, epsilon = 1e-9);
        // Roughly 0.59: the image comfortably covers the target
        assert!((placement.scale_factor - 0.5906).abs() < 1e-3);
        assert!(warning.is_none());
    }

    #[test]
    fn test_fill_crops_longer_axis_symmetrically() {
        // Portrait 1200x1600 px image into a 4:3 landscape target:
        // width is kept, height crops to 900 centered at y=350
        let region = region(80.0, 60.0);
        let image = ImageAsset::new("portrait.jpg", 1200, 1600);

        let (placement, _) =
            compute_transform(&region, &image, ScalingPolicy::Fill, 300).unwrap();

        assert_eq!(placement.crop_rect_px, PixelRect::new(0, 350, 1200, 900));
    }

    #[test]
    fn test_fill_crops_width_of_wide_image() {
        // 2000x1000 px (2:1) into 4:3: full height, width crops to 1333
        let region = region(80.0, 60.0);
        let image = ImageAsset::new("pano.jpg", 2000, 1000);

        let (placement, _) =
            compute_transform(&region, &image, ScalingPolicy::Fill, 300).unwrap();

        let crop = placement.crop_rect_px;
        assert_eq!(crop.height, 1000);
        assert_eq!(crop.width, round_px(1000.0 * (4.0 / 3.0)));
        // Centered: equal margins up to the one-pixel rounding
        assert!((crop.x - (2000 - crop.width - crop.x)).abs() <= 1);
    }

    #[test]
    fn test_fit_never_crops() {
        let region = region(80.0, 60.0);
        let image = ImageAsset::new("tall.jpg", 1000, 3000);

        let (placement, _) =
            compute_transform(&region, &image, ScalingPolicy::Fit, 300).unwrap();

        assert_eq!(placement.crop_rect_px, PixelRect::new(0, 0, 1000, 3000));
        let target_h_px = 60.0 / 25.4 * 300.0;
        // Height-constrained
        assert_relative_eq!(
            placement.scale_factor,
            target_h_px / 3000.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_center_crop_matches_fill() {
        let region = region(80.0, 60.0);
        let image = ImageAsset::new("photo.jpg", 1200, 1600);

        let (fill, _) = compute_transform(&region, &image, ScalingPolicy::Fill, 300).unwrap();
        let (center, _) =
            compute_transform(&region, &image, ScalingPolicy::CenterCrop, 300).unwrap();

        assert_eq!(fill.crop_rect_px, center.crop_rect_px);
        assert_eq!(fill.scale_factor, center.scale_factor);
    }

    #[test]
    fn test_small_source_warns_low_resolution() {
        let region = region(80.0, 60.0);
        let image = ImageAsset::new("thumb.jpg", 160, 120);

        let (placement, warning) =
            compute_transform(&region, &image, ScalingPolicy::Fill, 300).unwrap();

        assert!(placement.scale_factor > 1.0);
        let warning = warning.expect("expected a low-resolution warning");
        assert_eq!(warning.code, ViolationCode::LowResolution);
        assert_eq!(warning.severity, Severity::Warning);
    }

    #[test]
    fn test_zero_extent_image_rejected() {
        let region = region(80.0, 60.0);
        let image = ImageAsset::new("broken.jpg", 0, 1200);

        let result = compute_transform(&region, &image, ScalingPolicy::Fill, 300);
        assert!(matches!(result, Err(PlaceError::InvalidParameter(_))));
    }
}
