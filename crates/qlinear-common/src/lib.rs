//! Common types, errors, and configuration for qlinear
//!
//! This crate provides the foundational types shared by the quantization,
//! graph and calibration crates: element-type tags, quantization selectors,
//! the error hierarchy and option structs.

pub mod config;
pub mod error;
pub mod tensor;
pub mod types;

pub use config::{CalibrationTableConfig, QuantizeOptions};
pub use error::{QLinearError, QuantizationError, Result};
pub use tensor::{TensorData, checked_numel};
pub use types::{QuantFormat, QuantType, QuantizationMode, QuantizedValueType, TensorDataType};
