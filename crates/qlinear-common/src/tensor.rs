//! Lightweight stand-in for a graph initializer.
//!
//! The host graph format owns the real tensor encoding; qlinear only needs
//! the name, element type, dims and (for float tensors) the values.

use serde::{Deserialize, Serialize};

use crate::error::{QLinearError, Result};
use crate::types::TensorDataType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorData {
    pub name: String,
    pub data_type: TensorDataType,
    pub dims: Vec<usize>,
    /// Populated only for `FLOAT` tensors.
    pub float_data: Vec<f32>,
}

impl TensorData {
    /// Build a `FLOAT` tensor.
    pub fn from_f32(name: impl Into<String>, dims: Vec<usize>, data: Vec<f32>) -> Self {
        Self { name: name.into(), data_type: TensorDataType::Float, dims, float_data: data }
    }

    /// Build a tensor of a non-float type; only metadata is carried.
    pub fn typed(name: impl Into<String>, data_type: TensorDataType, dims: Vec<usize>) -> Self {
        Self { name: name.into(), data_type, dims, float_data: Vec::new() }
    }

    /// Number of elements implied by `dims` (1 for a scalar), or `None` when
    /// the product does not fit in `usize`.
    pub fn numel(&self) -> Option<usize> {
        checked_numel(&self.dims)
    }

    /// The float payload; any other element type is rejected.
    pub fn float_values(&self) -> Result<&[f32]> {
        if self.data_type != TensorDataType::Float {
            return Err(QLinearError::UnsupportedTensorType {
                name: self.name.clone(),
                data_type: self.data_type.name().to_string(),
            });
        }
        Ok(&self.float_data)
    }
}

/// Product of `dims` without overflow.
pub fn checked_numel(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numel_of_scalar_is_one() {
        let t = TensorData::from_f32("s", vec![], vec![1.0]);
        assert_eq!(t.numel(), Some(1));
    }

    #[test]
    fn typed_tensor_has_no_float_payload() {
        let t = TensorData::typed("w", TensorDataType::Int8, vec![2, 3]);
        assert_eq!(t.numel(), Some(6));
        assert!(t.float_data.is_empty());
    }

    #[test]
    fn numel_overflow_is_none() {
        let t = TensorData::from_f32("w", vec![usize::MAX, 2], vec![1.0]);
        assert_eq!(t.numel(), None);
        assert_eq!(checked_numel(&[usize::MAX, 0]), Some(0));
    }

    #[test]
    fn float_values_rejects_non_float() {
        let t = TensorData::typed("w", TensorDataType::Int8, vec![2]);
        let err = t.float_values().unwrap_err();
        assert_eq!(err.to_string(), "only float type is supported. Weights w is INT8");

        let f = TensorData::from_f32("f", vec![2], vec![1.0, 2.0]);
        assert_eq!(f.float_values().unwrap(), &[1.0f32, 2.0]);
    }
}
