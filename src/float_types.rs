// Re-export parry for the f64 geometry engine
pub use parry3d_f64 as parry3d;

// Our Real scalar type. The BSP engine accumulates error across recursive
// clips, so it stays in double precision even when the host renders in f32.
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Lazily-initialized tolerance used for every front/back/on classification.
/// Defaults to `1e-5` (model units), but can be overridden:
///  1) **Build-time**: set env var `WALL_DETECTOR_TOLERANCE` (e.g. `WALL_DETECTOR_TOLERANCE=1e-6 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before building any tree
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

/// Default splitting tolerance, relative to typical building model scale.
pub const DEFAULT_TOLERANCE: Real = 1e-5;

/// Returns the current tolerance.
/// If not set yet, it tries `WALL_DETECTOR_TOLERANCE` (parsed as `Real`) and
/// falls back to [`DEFAULT_TOLERANCE`].
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("WALL_DETECTOR_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        DEFAULT_TOLERANCE
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Returns `false` when a tolerance was already fixed.
pub fn set_tolerance(value: Real) -> bool {
    TOLERANCE_CELL.set(value.max(Real::EPSILON)).is_ok()
}
