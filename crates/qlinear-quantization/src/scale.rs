//! Scale / zero-point solver for the affine map `r = scale * (q - zero_point)`.

use qlinear_common::{QuantizationError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A `(zero_point, scale)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantParams {
    pub zero_point: i32,
    pub scale: f32,
}

impl QuantParams {
    /// Parameters used when there is nothing to measure: `scale = 1`, `zero_point = 0`.
    pub const IDENTITY: QuantParams = QuantParams { zero_point: 0, scale: 1.0 };

    pub const fn new(zero_point: i32, scale: f32) -> Self {
        Self { zero_point, scale }
    }
}

impl Default for QuantParams {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Compute the scale and zero point mapping `[rmin, rmax]` onto `[qmin, qmax]`.
///
/// The real range is first widened to include zero so the zero point always
/// lands inside `[qmin, qmax]`. With `symmetric`, the range becomes
/// `[-absmax, absmax]`.
///
/// If the resulting scale is below the smallest positive normal `f32`, the
/// identity parameters are returned instead of an error.
///
/// The zero point is rounded half to even, the same convention the data
/// transform uses.
///
/// # Errors
///
/// [`QuantizationError::InvalidRange`] unless `qmin <= 0 <= qmax`.
pub fn compute_scale_zp(
    rmin: f32,
    rmax: f32,
    qmin: i32,
    qmax: i32,
    symmetric: bool,
) -> Result<QuantParams> {
    if qmin > 0 || qmax < 0 {
        return Err(QuantizationError::InvalidRange { qmin, qmax }.into());
    }

    let mut rmin = f64::from(rmin).min(0.0);
    let mut rmax = f64::from(rmax).max(0.0);

    if symmetric {
        let absmax = rmin.abs().max(rmax.abs());
        rmin = -absmax;
        rmax = absmax;
    }

    let scale = (rmax - rmin) / f64::from(qmax - qmin);
    // `!(scale >= tiny)` also catches a NaN scale from a degenerate qmin == qmax.
    if !(scale >= f64::from(f32::MIN_POSITIVE)) {
        debug!(rmin, rmax, qmin, qmax, "scale underflow, falling back to scale=1 zero_point=0");
        return Ok(QuantParams::IDENTITY);
    }

    let zero_point = (f64::from(qmin) - rmin / scale).round_ties_even() as i32;
    Ok(QuantParams { zero_point, scale: scale as f32 })
}
