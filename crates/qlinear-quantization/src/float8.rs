//! Float8 E4M3FN codec and the float8 value-distribution model.
//!
//! E4M3FN layout: 1 sign bit, 4 exponent bits (bias 7), 3 mantissa bits.
//! There are no infinities; `S.1111.111` is NaN, so the largest finite
//! magnitude is `0.1111.110` = 448.
//!
//! Float8 scales are derived from a standard-deviation ratio: the data and
//! the set of representable float8 values are both treated as centred
//! gaussians, and the scale maps one spread onto the other.

use std::sync::{Arc, OnceLock};

use qlinear_common::{QuantizationError, Result, TensorDataType};
use tracing::debug;

use crate::scale::QuantParams;
use crate::utils::population_std;

/// Canonical NaN encoding (positive sign).
pub const E4M3FN_NAN: u8 = 0x7F;
/// Largest finite encoding (+448).
pub const E4M3FN_MAX_CODE: u8 = 0x7E;
/// Largest finite magnitude.
pub const E4M3FN_MAX: f32 = 448.0;

const SIGN_MASK: u8 = 0x80;
const MAGNITUDE_MASK: u8 = 0x7F;

/// True when `bits` is one of the two NaN encodings.
#[inline]
pub fn is_nan_e4m3fn(bits: u8) -> bool {
    bits & MAGNITUDE_MASK == E4M3FN_NAN
}

/// Decode an E4M3FN bit pattern to `f32`.
pub fn decode_e4m3fn(bits: u8) -> f32 {
    if is_nan_e4m3fn(bits) {
        return f32::NAN;
    }
    let exponent = i32::from((bits >> 3) & 0x0F);
    let mantissa = f32::from(bits & 0x07);
    let magnitude = if exponent == 0 {
        // subnormal: 0.mmm * 2^-6
        mantissa * 2f32.powi(-9)
    } else {
        (1.0 + mantissa / 8.0) * 2f32.powi(exponent - 7)
    };
    if bits & SIGN_MASK != 0 { -magnitude } else { magnitude }
}

/// Magnitudes of codes `0x00..=0x7E`, strictly increasing.
fn magnitudes() -> &'static [f32; 127] {
    static TABLE: OnceLock<[f32; 127]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0.0f32; 127];
        for (code, slot) in table.iter_mut().enumerate() {
            *slot = decode_e4m3fn(code as u8);
        }
        table
    })
}

/// Encode an `f32` as the nearest E4M3FN value, ties to even.
///
/// NaN encodes as NaN and the sign of zero is kept. Magnitudes beyond 448
/// (including infinities) saturate to ±448 when `saturate` is set; otherwise
/// they become NaN, except values that still round down to 448.
pub fn encode_e4m3fn(value: f32, saturate: bool) -> u8 {
    if value.is_nan() {
        return E4M3FN_NAN;
    }
    let sign = if value.is_sign_negative() { SIGN_MASK } else { 0 };
    let magnitude = value.abs();

    if magnitude > E4M3FN_MAX {
        // Halfway between 448 and the (unrepresentable) next step, 480.
        let rounds_to_max = magnitude <= 464.0;
        return if saturate || rounds_to_max {
            sign | E4M3FN_MAX_CODE
        } else {
            sign | E4M3FN_NAN
        };
    }

    let table = magnitudes();
    let idx = table.partition_point(|&m| m < magnitude);
    // magnitude <= 448 so idx <= 126
    let code = if idx == 0 || table[idx] == magnitude {
        idx
    } else {
        let below = f64::from(magnitude) - f64::from(table[idx - 1]);
        let above = f64::from(table[idx]) - f64::from(magnitude);
        if below < above || (below == above && (idx - 1) % 2 == 0) {
            idx - 1
        } else {
            idx
        }
    };
    sign | code as u8
}

/// Per-kind cache of the standard deviation of the representable float8 values.
///
/// Each entry is computed on first use and kept for the lifetime of the cache.
/// Concurrent first requests may both compute; the result is deterministic
/// and only one value is stored.
#[derive(Debug, Default)]
pub struct Float8Distributions {
    e4m3fn: OnceLock<f64>,
}

impl Float8Distributions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide shared instance.
    pub fn global() -> Arc<Float8Distributions> {
        static GLOBAL: OnceLock<Arc<Float8Distributions>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Float8Distributions::new())))
    }

    /// Finite values representable by `kind`, in bit-pattern order.
    pub fn finite_values(kind: TensorDataType) -> Result<Vec<f32>> {
        match kind {
            TensorDataType::Float8E4M3FN => {
                Ok((0..=u8::MAX).map(decode_e4m3fn).filter(|v| v.is_finite()).collect())
            }
            other => Err(QuantizationError::unsupported(other).into()),
        }
    }

    /// Standard deviation of the finite values representable by `kind`.
    pub fn std_of_format(&self, kind: TensorDataType) -> Result<f64> {
        let slot = match kind {
            TensorDataType::Float8E4M3FN => &self.e4m3fn,
            other => return Err(QuantizationError::unsupported(other).into()),
        };
        if let Some(std) = slot.get() {
            return Ok(*std);
        }
        let std = population_std(&Self::finite_values(kind)?);
        debug!(%kind, std, "initialised float8 distribution");
        Ok(*slot.get_or_init(|| std))
    }

    /// Float8 parameters for data with standard deviation `std`:
    /// `zero_point = 0`, `scale = std / std_of_format(kind)`.
    pub fn compute_scale_zp_float8(&self, kind: TensorDataType, std: f64) -> Result<QuantParams> {
        let std_f8 = self.std_of_format(kind)?;
        Ok(QuantParams { zero_point: 0, scale: (std / std_f8) as f32 })
    }
}

/// [`Float8Distributions::compute_scale_zp_float8`] on the shared cache.
pub fn compute_scale_zp_float8(kind: TensorDataType, std: f64) -> Result<QuantParams> {
    Float8Distributions::global().compute_scale_zp_float8(kind, std)
}
