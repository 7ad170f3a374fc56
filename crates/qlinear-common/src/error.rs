//! Error types shared across the qlinear crates.

use thiserror::Error;

use crate::types::TensorDataType;

/// Result alias used by every qlinear crate.
pub type Result<T> = std::result::Result<T, QLinearError>;

/// Errors raised while computing quantization parameters or transforming data.
///
/// All variants are fatal for the call that produced them; nothing in this
/// workspace retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantizationError {
    /// The representable range does not contain zero.
    #[error(
        "qmin and qmax must meet requirement: qmin <= 0 <= qmax while qmin:{qmin}, qmax:{qmax}"
    )]
    InvalidRange { qmin: i32, qmax: i32 },

    /// No range table, decoder or transform is registered for this kind.
    #[error("unsupported quantization kind {kind}")]
    UnsupportedKind { kind: TensorDataType },

    /// Float8 targets have no zero-point; anything but 0 is rejected.
    #[error("zero_point is expected to be null for float 8 not {zero_point}")]
    InvalidZeroPoint { zero_point: i32 },

    /// The option combination is not supported for the requested kind.
    #[error("unsupported option {option} for {kind}")]
    UnsupportedOption { option: &'static str, kind: TensorDataType },

    /// The float8 encoding produced a NaN bit pattern. `quant_min` /
    /// `quant_max` are over the decoded non-NaN outputs (NaN when there are none).
    #[error(
        "one of the quantized values is NaN: data in [{data_min}, {data_max}], \
         quantized_data in [{quant_min}, {quant_max}]"
    )]
    QuantizationProducedNaN { data_min: f32, data_max: f32, quant_min: f32, quant_max: f32 },

    /// Malformed caller input (shape mismatch, bad axis, malformed histogram).
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl QuantizationError {
    /// Shorthand for [`QuantizationError::UnsupportedKind`].
    pub fn unsupported(kind: TensorDataType) -> Self {
        Self::UnsupportedKind { kind }
    }

    /// Shorthand for [`QuantizationError::InvalidInput`].
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput { reason: reason.into() }
    }
}

/// Top-level error for qlinear.
#[derive(Error, Debug)]
pub enum QLinearError {
    #[error("quantization error: {0}")]
    Quantization(#[from] QuantizationError),

    /// Tensor conversion only handles FLOAT initializers.
    #[error("only float type is supported. Weights {name} is {data_type}")]
    UnsupportedTensorType { name: String, data_type: String },

    #[error("attribute {name} does not have type specified")]
    UndefinedAttributeType { name: String },

    #[error("attribute {name} has unsupported type {attr_type}")]
    UnsupportedAttributeType { name: String, attr_type: i32 },

    /// A string or integer could not be mapped onto one of the closed enums.
    #[error("invalid {kind} value: {value:?}")]
    InvalidValue { kind: &'static str, value: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl QLinearError {
    /// Returns the inner quantization error, if any.
    pub fn as_quantization(&self) -> Option<&QuantizationError> {
        match self {
            Self::Quantization(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_range_message_names_both_bounds() {
        let err = QuantizationError::InvalidRange { qmin: 1, qmax: 255 };
        assert_eq!(
            err.to_string(),
            "qmin and qmax must meet requirement: qmin <= 0 <= qmax while qmin:1, qmax:255"
        );
    }

    #[test]
    fn quantization_error_converts_into_top_level() {
        let err: QLinearError = QuantizationError::unsupported(TensorDataType::Int32).into();
        assert!(matches!(
            err.as_quantization(),
            Some(QuantizationError::UnsupportedKind { kind: TensorDataType::Int32 })
        ));
        assert_eq!(err.to_string(), "quantization error: unsupported quantization kind INT32");
    }

    #[test]
    fn nan_error_reports_ranges() {
        let err = QuantizationError::QuantizationProducedNaN {
            data_min: -1.5,
            data_max: 2.0,
            quant_min: -4.75,
            quant_max: 0.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("[-1.5, 2]"), "{msg}");
        assert!(msg.contains("[-4.75, 0]"), "{msg}");
    }

    #[test]
    fn non_quantization_error_has_no_inner() {
        let err = QLinearError::Config("bad".to_string());
        assert!(err.as_quantization().is_none());
    }
}
