//! Bulk quantization: observe the range of a buffer, derive parameters for
//! the target kind, and transform the data in one call.

use qlinear_common::{
    QuantizationError, QuantizeOptions, Result, TensorData, TensorDataType, checked_numel,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::float8::{decode_e4m3fn, is_nan_e4m3fn};
use crate::range::get_qmin_qmax_for_qtype;
use crate::records::QuantizedInitializer;
use crate::scale::{QuantParams, compute_scale_zp};
use crate::transform::{QuantizedData, Quantizer};
use crate::utils::{axis_slice_positions, count_nan, min_max, population_std};

/// Outcome of [`quantize_data`].
///
/// `rmin` / `rmax` are the observed data range, not the zero-extended range
/// the solver works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizationResult {
    pub rmin: f32,
    pub rmax: f32,
    pub zero_point: i32,
    pub scale: f32,
    pub quantized: QuantizedData,
}

impl QuantizationResult {
    pub fn params(&self) -> QuantParams {
        QuantParams::new(self.zero_point, self.scale)
    }
}

/// Observed `(min, max)`, ignoring NaN; `(0, 0)` when nothing is comparable.
fn observed_range(data: &[f32]) -> (f32, f32) {
    let nans = count_nan(data);
    if nans > 0 {
        warn!(nans, len = data.len(), "ignoring NaN values when computing the data range");
    }
    min_max(data).unwrap_or((0.0, 0.0))
}

impl Quantizer {
    /// Quantize `data` to `kind`, computing the parameters from the data.
    ///
    /// Integer kinds derive `(qmin, qmax)` from the range policy and solve for
    /// scale and zero point. Float8 derives the scale from the standard
    /// deviation of the data relative to the format and always uses a zero
    /// point of 0. Empty input yields the identity parameters and an empty
    /// buffer.
    ///
    /// # Errors
    ///
    /// - [`QuantizationError::UnsupportedOption`] for float8 with `reduce_range`
    /// - [`QuantizationError::QuantizationProducedNaN`] if any float8 output is NaN
    /// - [`QuantizationError::UnsupportedKind`] for kinds that are not
    ///   quantization targets
    pub fn quantize_data(
        &self,
        data: &[f32],
        kind: TensorDataType,
        symmetric: bool,
        reduce_range: bool,
    ) -> Result<QuantizationResult> {
        let (rmin, rmax) = if data.is_empty() { (0.0, 0.0) } else { observed_range(data) };

        if kind.is_float8() {
            if !self.kernel().supports(kind) {
                return Err(QuantizationError::unsupported(kind).into());
            }
            if reduce_range {
                let option = "reduce_range=true";
                return Err(QuantizationError::UnsupportedOption { option, kind }.into());
            }
            let params = if data.is_empty() {
                QuantParams::IDENTITY
            } else {
                self.distributions().compute_scale_zp_float8(kind, population_std(data))?
            };
            let quantized = self.quantize_array(kind, data, params.scale, 0, None, None)?;
            if let Some(bits) = quantized.as_float8_bits() {
                if bits.iter().any(|&b| is_nan_e4m3fn(b)) {
                    let decoded: Vec<f32> = bits.iter().map(|&b| decode_e4m3fn(b)).collect();
                    let (quant_min, quant_max) = min_max(&decoded).unwrap_or((f32::NAN, f32::NAN));
                    return Err(QuantizationError::QuantizationProducedNaN {
                        data_min: rmin,
                        data_max: rmax,
                        quant_min,
                        quant_max,
                    }
                    .into());
                }
            }
            return Ok(QuantizationResult {
                rmin,
                rmax,
                zero_point: params.zero_point,
                scale: params.scale,
                quantized,
            });
        }

        if !kind.is_quantized_integer() {
            return Err(QuantizationError::unsupported(kind).into());
        }

        let (qmin, qmax) = get_qmin_qmax_for_qtype(kind, reduce_range, symmetric)?;
        let params = compute_scale_zp(rmin, rmax, qmin, qmax, symmetric)?;
        let quantized =
            self.quantize_array(kind, data, params.scale, params.zero_point, None, None)?;
        Ok(QuantizationResult {
            rmin,
            rmax,
            zero_point: params.zero_point,
            scale: params.scale,
            quantized,
        })
    }

    /// [`Quantizer::quantize_data`] driven by validated [`QuantizeOptions`].
    pub fn quantize_with_options(
        &self,
        data: &[f32],
        options: &QuantizeOptions,
    ) -> Result<QuantizationResult> {
        options.validate()?;
        self.quantize_data(
            data,
            options.quant_type.tensor_type(),
            options.symmetric,
            options.reduce_range,
        )
    }

    /// Quantize a float initializer with one set of parameters for the whole tensor.
    pub fn quantize_initializer(
        &self,
        initializer: &TensorData,
        kind: TensorDataType,
        symmetric: bool,
        reduce_range: bool,
    ) -> Result<QuantizedInitializer> {
        let data = initializer.float_values()?;
        let result = self.quantize_data(data, kind, symmetric, reduce_range)?;
        Ok(QuantizedInitializer {
            name: initializer.name.clone(),
            initializer: initializer.clone(),
            rmins: vec![result.rmin],
            rmaxs: vec![result.rmax],
            zero_points: vec![result.zero_point],
            scales: vec![result.scale],
            data: data.to_vec(),
            quantized_data: result.quantized,
            axis: None,
        })
    }

    /// Quantize a float initializer with separate parameters for each slice
    /// along `axis`.
    ///
    /// Slices are quantized in parallel; the output keeps the row-major
    /// layout of the input.
    ///
    /// # Errors
    ///
    /// [`QuantizationError::InvalidInput`] when `axis` is out of bounds or the
    /// dims do not match the number of values, plus anything
    /// [`Quantizer::quantize_data`] returns for a slice.
    pub fn quantize_initializer_per_axis(
        &self,
        initializer: &TensorData,
        axis: usize,
        kind: TensorDataType,
        symmetric: bool,
        reduce_range: bool,
    ) -> Result<QuantizedInitializer> {
        let data = initializer.float_values()?;
        let dims = &initializer.dims;
        if axis >= dims.len() {
            return Err(QuantizationError::invalid_input(format!(
                "axis {axis} out of bounds for {} with rank {}",
                initializer.name,
                dims.len()
            ))
            .into());
        }
        let numel = checked_numel(dims).ok_or_else(|| {
            QuantizationError::invalid_input(format!(
                "{} has dims {dims:?} whose element count overflows",
                initializer.name
            ))
        })?;
        if numel != data.len() {
            return Err(QuantizationError::invalid_input(format!(
                "{} has dims {dims:?} ({numel} elements) but {} values",
                initializer.name,
                data.len()
            ))
            .into());
        }

        let slices = (0..dims[axis])
            .into_par_iter()
            .map(|index| -> Result<(Vec<usize>, QuantizationResult)> {
                let positions = axis_slice_positions(dims, axis, index);
                let values: Vec<f32> = positions.iter().map(|&p| data[p]).collect();
                let result = self.quantize_data(&values, kind, symmetric, reduce_range)?;
                Ok((positions, result))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut quantized_data = QuantizedData::zeros(kind, data.len())?;
        let mut rmins = Vec::with_capacity(slices.len());
        let mut rmaxs = Vec::with_capacity(slices.len());
        let mut zero_points = Vec::with_capacity(slices.len());
        let mut scales = Vec::with_capacity(slices.len());
        for (positions, result) in &slices {
            quantized_data.scatter(positions, &result.quantized)?;
            rmins.push(result.rmin);
            rmaxs.push(result.rmax);
            zero_points.push(result.zero_point);
            scales.push(result.scale);
        }
        debug!(
            name = %initializer.name,
            axis,
            channels = slices.len(),
            %kind,
            "quantized per axis"
        );

        Ok(QuantizedInitializer {
            name: initializer.name.clone(),
            initializer: initializer.clone(),
            rmins,
            rmaxs,
            zero_points,
            scales,
            data: data.to_vec(),
            quantized_data,
            axis: Some(axis),
        })
    }
}

/// [`Quantizer::quantize_data`] on the shared default quantizer.
pub fn quantize_data(
    data: &[f32],
    kind: TensorDataType,
    symmetric: bool,
    reduce_range: bool,
) -> Result<QuantizationResult> {
    Quantizer::global().quantize_data(data, kind, symmetric, reduce_range)
}

/// [`Quantizer::quantize_initializer_per_axis`] on the shared default quantizer.
pub fn quantize_initializer_per_axis(
    initializer: &TensorData,
    axis: usize,
    kind: TensorDataType,
    symmetric: bool,
    reduce_range: bool,
) -> Result<QuantizedInitializer> {
    Quantizer::global().quantize_initializer_per_axis(
        initializer,
        axis,
        kind,
        symmetric,
        reduce_range,
    )
}
