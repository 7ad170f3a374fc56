//! Quantization parameter computation and data transform for qlinear
//!
//! This crate maps float data onto low-bit targets with the affine relation
//! `real = scale * (quantized - zero_point)`:
//! - uint8 / int8 / uint16 / int16 with full, symmetric or reduced ranges
//! - float8 E4M3FN with a distribution-matched scale and no zero point
//!
//! Rounding is half-to-even in both the parameter solver and the transform.

pub mod float8;
pub mod pipeline;
pub mod range;
pub mod records;
pub mod scale;
pub mod transform;
pub mod utils;

pub use float8::{Float8Distributions, compute_scale_zp_float8, decode_e4m3fn, encode_e4m3fn};
pub use pipeline::{QuantizationResult, quantize_data, quantize_initializer_per_axis};
pub use range::{get_qmin_qmax_for_qtype, get_qrange_for_qtype};
pub use records::{BiasToQuantize, QuantizedInitializer, QuantizedValue};
pub use scale::{QuantParams, compute_scale_zp};
pub use transform::{
    LookupKernel, NarrowFloatKernel, QuantizedData, Quantizer, dequantize_array, quantize_array,
};
