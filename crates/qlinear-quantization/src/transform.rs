//! Affine quantize / dequantize of flat `f32` buffers.
//!
//! Integer targets are handled natively (round, add zero point, clip, cast).
//! Float8 targets have no native arithmetic type, so encoding goes through a
//! [`NarrowFloatKernel`]; the default [`LookupKernel`] uses the table-driven
//! E4M3FN codec from [`crate::float8`].

use std::fmt;
use std::sync::{Arc, OnceLock};

use qlinear_common::{QuantizationError, Result, TensorDataType};
use serde::{Deserialize, Serialize};

use crate::float8::{Float8Distributions, decode_e4m3fn, encode_e4m3fn};
use crate::range::get_qmin_qmax_for_qtype;
use crate::scale::QuantParams;

/// Quantized values in the native storage of their element type.
///
/// Float8 values are kept as raw bit patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantizedData {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    Float8E4M3FN(Vec<u8>),
}

macro_rules! each_variant {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            QuantizedData::U8($v) => $body,
            QuantizedData::I8($v) => $body,
            QuantizedData::U16($v) => $body,
            QuantizedData::I16($v) => $body,
            QuantizedData::Float8E4M3FN($v) => $body,
        }
    };
}

impl QuantizedData {
    /// A zero-filled buffer of `len` elements for `kind`.
    pub fn zeros(kind: TensorDataType, len: usize) -> Result<Self> {
        Ok(match kind {
            TensorDataType::Uint8 => Self::U8(vec![0; len]),
            TensorDataType::Int8 => Self::I8(vec![0; len]),
            TensorDataType::Uint16 => Self::U16(vec![0; len]),
            TensorDataType::Int16 => Self::I16(vec![0; len]),
            TensorDataType::Float8E4M3FN => Self::Float8E4M3FN(vec![0; len]),
            other => return Err(QuantizationError::unsupported(other).into()),
        })
    }

    pub fn data_type(&self) -> TensorDataType {
        match self {
            Self::U8(_) => TensorDataType::Uint8,
            Self::I8(_) => TensorDataType::Int8,
            Self::U16(_) => TensorDataType::Uint16,
            Self::I16(_) => TensorDataType::Int16,
            Self::Float8E4M3FN(_) => TensorDataType::Float8E4M3FN,
        }
    }

    pub fn len(&self) -> usize {
        each_variant!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values widened to `i32`; float8 yields the raw bit patterns.
    pub fn to_i32_vec(&self) -> Vec<i32> {
        each_variant!(self, v => v.iter().map(|&x| i32::from(x)).collect())
    }

    /// Float8 bit patterns, `None` for integer buffers.
    pub fn as_float8_bits(&self) -> Option<&[u8]> {
        match self {
            Self::Float8E4M3FN(bits) => Some(bits),
            _ => None,
        }
    }

    /// Copy `src` into the given positions of `self`.
    ///
    /// Both buffers must hold the same element type and `positions` must have
    /// one entry per element of `src`.
    pub fn scatter(&mut self, positions: &[usize], src: &QuantizedData) -> Result<()> {
        if positions.len() != src.len() {
            return Err(QuantizationError::invalid_input(format!(
                "scatter of {} values into {} positions",
                src.len(),
                positions.len()
            ))
            .into());
        }
        let len = self.len();
        if let Some(&bad) = positions.iter().find(|&&p| p >= len) {
            return Err(QuantizationError::invalid_input(format!(
                "scatter position {bad} out of bounds for {len} elements"
            ))
            .into());
        }

        fn copy<T: Copy>(dst: &mut [T], positions: &[usize], src: &[T]) {
            for (&p, &v) in positions.iter().zip(src) {
                dst[p] = v;
            }
        }

        match (self, src) {
            (Self::U8(d), Self::U8(s)) => copy(d, positions, s),
            (Self::I8(d), Self::I8(s)) => copy(d, positions, s),
            (Self::U16(d), Self::U16(s)) => copy(d, positions, s),
            (Self::I16(d), Self::I16(s)) => copy(d, positions, s),
            (Self::Float8E4M3FN(d), Self::Float8E4M3FN(s)) => copy(d, positions, s),
            (dst, src) => {
                return Err(QuantizationError::invalid_input(format!(
                    "cannot scatter {} values into a {} buffer",
                    src.data_type(),
                    dst.data_type()
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// Elementwise affine quantizer for float targets without a native type.
///
/// Implementations encode `x / scale` to the nearest representable value of
/// `kind`; the zero point is always 0.
pub trait NarrowFloatKernel: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Whether this kernel can encode `kind`.
    fn supports(&self, kind: TensorDataType) -> bool;

    /// Encode `data / scale` as `kind` bit patterns.
    fn affine_quantize(&self, data: &[f32], scale: f32, kind: TensorDataType) -> Result<Vec<u8>>;
}

/// Table-driven E4M3FN encoder.
#[derive(Debug, Clone, Copy)]
pub struct LookupKernel {
    saturate: bool,
}

impl Default for LookupKernel {
    fn default() -> Self {
        Self { saturate: true }
    }
}

impl LookupKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Out-of-range values become NaN instead of clamping to ±448.
    pub fn non_saturating() -> Self {
        Self { saturate: false }
    }

    pub fn saturate(&self) -> bool {
        self.saturate
    }
}

impl NarrowFloatKernel for LookupKernel {
    fn name(&self) -> &'static str {
        "lookup"
    }

    fn supports(&self, kind: TensorDataType) -> bool {
        kind == TensorDataType::Float8E4M3FN
    }

    fn affine_quantize(&self, data: &[f32], scale: f32, kind: TensorDataType) -> Result<Vec<u8>> {
        if !self.supports(kind) {
            return Err(QuantizationError::unsupported(kind).into());
        }
        Ok(data.iter().map(|&x| encode_e4m3fn(x / scale, self.saturate)).collect())
    }
}

/// Clips with `min(max(v, lo), hi)`, so crossed bounds put every value on
/// `hi`. NaN is left for the cast, which maps it to 0.
fn quantize_integer<T>(
    data: &[f32],
    scale: f32,
    zero_point: i32,
    lo: i32,
    hi: i32,
    cast: fn(f32) -> T,
) -> Vec<T> {
    let zp = zero_point as f32;
    let (lo, hi) = (lo as f32, hi as f32);
    data.iter()
        .map(|&x| {
            let v = (x / scale).round_ties_even() + zp;
            cast(if v.is_nan() { v } else { v.max(lo).min(hi) })
        })
        .collect()
}

/// Quantization engine: owns the float8 kernel and distribution cache the
/// float8 path depends on.
pub struct Quantizer {
    kernel: Arc<dyn NarrowFloatKernel>,
    distributions: Arc<Float8Distributions>,
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::new(Arc::new(LookupKernel::default()), Float8Distributions::global())
    }
}

impl fmt::Debug for Quantizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantizer")
            .field("kernel", &self.kernel.name())
            .field("distributions", &self.distributions)
            .finish()
    }
}

impl Quantizer {
    pub fn new(
        kernel: Arc<dyn NarrowFloatKernel>,
        distributions: Arc<Float8Distributions>,
    ) -> Self {
        Self { kernel, distributions }
    }

    /// Shared default quantizer (lookup kernel, global distribution cache).
    pub fn global() -> &'static Quantizer {
        static GLOBAL: OnceLock<Quantizer> = OnceLock::new();
        GLOBAL.get_or_init(Quantizer::default)
    }

    pub fn kernel(&self) -> &dyn NarrowFloatKernel {
        self.kernel.as_ref()
    }

    pub fn distributions(&self) -> &Float8Distributions {
        &self.distributions
    }

    /// Quantize `data` to `kind` with the given scale and zero point.
    ///
    /// Integer results are `round_half_even(x / scale) + zero_point`, clipped
    /// to the symmetric full range of `kind` (so int8 never produces -128),
    /// further narrowed by `low` / `high` when given. Crossed bounds clip
    /// every value to the upper one. NaN inputs become 0.
    ///
    /// # Errors
    ///
    /// - [`QuantizationError::InvalidZeroPoint`] for float8 with `zero_point != 0`
    /// - [`QuantizationError::UnsupportedKind`] for kinds with no transform
    pub fn quantize_array(
        &self,
        kind: TensorDataType,
        data: &[f32],
        scale: f32,
        zero_point: i32,
        low: Option<i32>,
        high: Option<i32>,
    ) -> Result<QuantizedData> {
        if kind.is_float8() {
            if zero_point != 0 {
                return Err(QuantizationError::InvalidZeroPoint { zero_point }.into());
            }
            if !self.kernel.supports(kind) {
                return Err(QuantizationError::unsupported(kind).into());
            }
            let bits = self.kernel.affine_quantize(data, scale, kind)?;
            return Ok(QuantizedData::Float8E4M3FN(bits));
        }

        let (qmin, qmax) = get_qmin_qmax_for_qtype(kind, false, true)?;
        let lo = low.map_or(qmin, |l| l.max(qmin));
        let hi = high.map_or(qmax, |h| h.min(qmax));

        Ok(match kind {
            TensorDataType::Uint8 => {
                QuantizedData::U8(quantize_integer(data, scale, zero_point, lo, hi, |v| v as u8))
            }
            TensorDataType::Int8 => {
                QuantizedData::I8(quantize_integer(data, scale, zero_point, lo, hi, |v| v as i8))
            }
            TensorDataType::Uint16 => {
                QuantizedData::U16(quantize_integer(data, scale, zero_point, lo, hi, |v| v as u16))
            }
            TensorDataType::Int16 => {
                QuantizedData::I16(quantize_integer(data, scale, zero_point, lo, hi, |v| v as i16))
            }
            other => return Err(QuantizationError::unsupported(other).into()),
        })
    }
}

/// [`Quantizer::quantize_array`] on the shared default quantizer.
pub fn quantize_array(
    kind: TensorDataType,
    data: &[f32],
    scale: f32,
    zero_point: i32,
    low: Option<i32>,
    high: Option<i32>,
) -> Result<QuantizedData> {
    Quantizer::global().quantize_array(kind, data, scale, zero_point, low, high)
}

/// Map quantized values back to real values: `scale * (q - zero_point)`.
///
/// Float8 values are decoded first; NaN patterns decode to NaN.
pub fn dequantize_array(data: &QuantizedData, params: QuantParams) -> Vec<f32> {
    match data {
        QuantizedData::Float8E4M3FN(bits) => {
            bits.iter().map(|&b| decode_e4m3fn(b) * params.scale).collect()
        }
        other => other
            .to_i32_vec()
            .into_iter()
            .map(|q| (q - params.zero_point) as f32 * params.scale)
            .collect(),
    }
}
