//! Structural and physical validation of detected placeholder regions
//!
//! Every check runs and every violation is recorded before the report is
//! returned, so a caller can fix noisy detector output in one pass instead
//! of replaying the pipeline once per problem.

use std::collections::HashSet;

use crate::options::PlacementOptions;
use crate::types::*;

/// Intersection-over-union of two axis-aligned rectangles.
///
/// A zero-area intersection yields 0.0 without dividing.
pub fn iou(a: &PhysicalRect, b: &PhysicalRect) -> f64 {
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = a.right().min(b.right());
    let y2 = a.bottom().min(b.bottom());

    if x2 <= x1 || y2 <= y1 {
        return 0.0;
    }

    let intersection = (x2 - x1) * (y2 - y1);
    let union = a.area() + b.area() - intersection;

    if union > 0.0 { intersection / union } else { 0.0 }
}

/// Validate one page's placeholder set.
///
/// Checks, in order: cardinality, id uniqueness, page bounds, confidence
/// floor, pairwise overlap. Bounds, cardinality and duplicate-id findings
/// are blocking; confidence and overlap findings are warnings.
pub fn validate_page(
    page: &Page,
    placeholders: &[PlaceholderRegion],
    options: &PlacementOptions,
) -> ValidationReport {
    let mut violations = Vec::new();

    check_cardinality(placeholders, options, &mut violations);
    check_unique_ids(placeholders, &mut violations);
    for region in placeholders {
        check_bounds(page, region, &mut violations);
        check_confidence(region, options, &mut violations);
    }
    check_overlaps(placeholders, options, &mut violations);

    let passed = !violations
        .iter()
        .any(|v| v.severity == Severity::Blocking);

    log::debug!(
        "validated {} placeholder(s): {} violation(s), passed={}",
        placeholders.len(),
        violations.len(),
        passed
    );

    ValidationReport { passed, violations }
}

fn check_cardinality(
    placeholders: &[PlaceholderRegion],
    options: &PlacementOptions,
    violations: &mut Vec<Violation>,
) {
    if placeholders.is_empty() {
        violations.push(Violation::blocking(
            ViolationCode::EmptyPage,
            "page has no placeholders",
        ));
    } else if placeholders.len() > options.max_placeholders_per_page {
        violations.push(Violation::blocking(
            ViolationCode::TooManyPlaceholders,
            format!(
                "page has {} placeholders, at most {} expected",
                placeholders.len(),
                options.max_placeholders_per_page
            ),
        ));
    }
}

fn check_unique_ids(placeholders: &[PlaceholderRegion], violations: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for region in placeholders {
        if !seen.insert(region.id.as_str()) {
            violations.push(Violation::blocking(
                ViolationCode::DuplicateId,
                format!("placeholder id {} appears more than once", region.id),
            ));
        }
    }
}

fn check_bounds(page: &Page, region: &PlaceholderRegion, violations: &mut Vec<Violation>) {
    let rect = &region.rect;
    if rect.width <= 0.0 || rect.height <= 0.0 {
        violations.push(Violation::blocking(
            ViolationCode::OutOfBounds,
            format!(
                "placeholder {} has degenerate extent {:.2}x{:.2} mm",
                region.id, rect.width, rect.height
            ),
        ));
        return;
    }
    if rect.x < 0.0
        || rect.y < 0.0
        || rect.right() > page.width_mm
        || rect.bottom() > page.height_mm
    {
        violations.push(Violation::blocking(
            ViolationCode::OutOfBounds,
            format!(
                "placeholder {} extends outside the {:.1}x{:.1} mm page",
                region.id, page.width_mm, page.height_mm
            ),
        ));
    }
}

fn check_confidence(
    region: &PlaceholderRegion,
    options: &PlacementOptions,
    violations: &mut Vec<Violation>,
) {
    if region.method.is_manual() {
        return;
    }
    if region.confidence < options.min_detection_confidence {
        violations.push(Violation::warning(
            ViolationCode::LowConfidence,
            format!(
                "placeholder {} confidence {:.2} below floor {:.2}",
                region.id, region.confidence, options.min_detection_confidence
            ),
        ));
    }
}

fn check_overlaps(
    placeholders: &[PlaceholderRegion],
    options: &PlacementOptions,
    violations: &mut Vec<Violation>,
) {
    for (i, a) in placeholders.iter().enumerate() {
        for b in &placeholders[i + 1..] {
            let overlap = iou(&a.rect, &b.rect);
            if overlap >= options.max_overlap_iou {
                violations.push(Violation::warning(
                    ViolationCode::Overlap,
                    format!(
                        "placeholders {} and {} overlap with IoU {:.3}",
                        a.id, b.id, overlap
                    ),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_iou_disjoint_is_zero() {
        let a = PhysicalRect::new(0.0, 0.0, 10.0, 10.0);
        let b = PhysicalRect::new(20.0, 20.0, 10.0, 10.0);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn test_iou_touching_edges_is_zero() {
        let a = PhysicalRect::new(0.0, 0.0, 10.0, 10.0);
        let b = PhysicalRect::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn test_iou_identical_is_one() {
        let a = PhysicalRect::new(5.0, 5.0, 10.0, 10.0);
        assert_relative_eq!(iou(&a, &a), 1.0);
    }

    #[test]
    fn test_iou_known_overlap() {
        // Intersection 5x10 = 50, union 100 + 100 - 50 = 150
        let a = PhysicalRect::new(0.0, 0.0, 10.0, 10.0);
        let b = PhysicalRect::new(5.0, 0.0, 10.0, 10.0);
        assert_relative_eq!(iou(&a, &b), 50.0 / 150.0);
    }

    #[test]
    fn test_overlap_threshold_is_strict() {
        // Intersection 2x1 = 2, union 11 + 11 - 2 = 20, IoU exactly 0.10
        let at_threshold = [
            region("p1", PhysicalRect::new(0.0, 0.0, 11.0, 1.0)),
            region("p2", PhysicalRect::new(9.0, 0.0, 11.0, 1.0)),
        ];
        let page = Page::new(210.0, 297.0);
        let options = PlacementOptions::default();

        let report = validate_page(&page, &at_threshold, &options);
        assert!(
            report
                .violations
                .iter()
                .any(|v| v.code == ViolationCode::Overlap)
        );
        // Overlap is a warning, not blocking
        assert!(report.passed);

        // Slightly less overlap passes
        let below_threshold = [
            region("p1", PhysicalRect::new(0.0, 0.0, 11.0, 1.0)),
            region("p2", PhysicalRect::new(9.01, 0.0, 11.0, 1.0)),
        ];
        let report = validate_page(&page, &below_threshold, &options);
        assert!(
            !report
                .violations
                .iter()
                .any(|v| v.code == ViolationCode::Overlap)
        );
    }

    #[test]
    fn test_overlap_message_names_both_regions() {
        let regions = [
            region("left", PhysicalRect::new(0.0, 0.0, 50.0, 50.0)),
            region("right", PhysicalRect::new(10.0, 10.0, 50.0, 50.0)),
        ];
        let page = Page::new(210.0, 297.0);
        let report = validate_page(&page, &regions, &PlacementOptions::default());

        let overlap = report
            .violations
            .iter()
            .find(|v| v.code == ViolationCode::Overlap)
            .expect("expected an overlap violation");
        assert!(overlap.message.contains("left"));
        assert!(overlap.message.contains("right"));
    }

    fn region(id: &str, rect: PhysicalRect) -> PlaceholderRegion {
        PlaceholderRegion {
            id: id.to_string(),
            rect,
            method: DetectionMethod::Docling,
            confidence: 0.95,
            notes: String::new(),
        }
    }
}
