pub mod budget;
pub mod calibrate;
mod constants;
pub mod detect;
mod options;
pub mod placement;
#[cfg(feature = "serde")]
pub mod records;
mod types;
pub mod units;
pub mod validate;

pub use budget::{ErrorBudget, ErrorContribution};
pub use calibrate::{CalibrationOutcome, CalibrationState, apply_calibration};
pub use constants::*;
pub use detect::{Detector, ManualDetector, PageScan};
pub use options::PlacementOptions;
pub use placement::{
    AssignmentStrategy, ExplicitAssignment, PlacementOutcome, resolve_placements,
};
pub use types::*;
pub use validate::{iou, validate_page};
