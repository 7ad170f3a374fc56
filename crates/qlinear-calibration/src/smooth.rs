//! Histogram smoothing for KL-divergence calibration.

use qlinear_common::{QuantizationError, Result};

pub const DEFAULT_SMOOTHING_EPS: f32 = 1e-4;

/// Smooth a discrete distribution (not necessarily normalised) so that no
/// bin is zero: zero bins become `eps`, and the same total is taken off the
/// non-zero bins evenly.
///
/// Returns `Ok(None)` when every bin is zero.
///
/// # Errors
///
/// `InvalidInput` when the per-bin reduction reaches 1, or when a non-zero
/// bin would become non-positive.
pub fn smooth_distribution(p: &[f32], eps: f32) -> Result<Option<Vec<f32>>> {
    let n_zeros = p.iter().filter(|&&v| v == 0.0).count();
    let n_nonzeros = p.len() - n_zeros;
    if n_nonzeros == 0 {
        return Ok(None);
    }

    let eps1 = f64::from(eps) * n_zeros as f64 / n_nonzeros as f64;
    if eps1 >= 1.0 {
        return Err(QuantizationError::invalid_input(format!(
            "n_zeros={n_zeros}, n_nonzeros={n_nonzeros}, eps1={eps1}"
        ))
        .into());
    }
    let eps1 = eps1 as f32;

    let hist: Vec<f32> = p.iter().map(|&v| if v == 0.0 { eps } else { v - eps1 }).collect();
    if let Some(pos) = hist.iter().position(|&v| v <= 0.0) {
        return Err(QuantizationError::invalid_input(format!(
            "smoothed bin {pos} is not positive ({})",
            hist[pos]
        ))
        .into());
    }
    Ok(Some(hist))
}
