//! Configuration types and utilities

use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{QuantizationError, Result};
use crate::types::QuantType;

fn env_flag(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Options for a single `quantize_data` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantizeOptions {
    pub quant_type: QuantType,
    pub symmetric: bool,
    pub reduce_range: bool,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self { quant_type: QuantType::QInt8, symmetric: true, reduce_range: false }
    }
}

impl QuantizeOptions {
    pub fn new(quant_type: QuantType) -> Self {
        Self { quant_type, ..Default::default() }
    }

    /// Read options from `QLINEAR_QUANT_TYPE`, `QLINEAR_SYMMETRIC` and
    /// `QLINEAR_REDUCE_RANGE`, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let quant_type = match env::var("QLINEAR_QUANT_TYPE") {
            Ok(v) => v.parse().unwrap_or_else(|e| {
                warn!("ignoring QLINEAR_QUANT_TYPE: {e}");
                defaults.quant_type
            }),
            Err(_) => defaults.quant_type,
        };
        Self {
            quant_type,
            symmetric: env_flag("QLINEAR_SYMMETRIC").unwrap_or(defaults.symmetric),
            reduce_range: env_flag("QLINEAR_REDUCE_RANGE").unwrap_or(defaults.reduce_range),
        }
    }

    pub const fn with_symmetric(mut self, symmetric: bool) -> Self {
        self.symmetric = symmetric;
        self
    }

    pub const fn with_reduce_range(mut self, reduce_range: bool) -> Self {
        self.reduce_range = reduce_range;
        self
    }

    /// Reject option combinations the target cannot honour.
    pub fn validate(&self) -> Result<()> {
        let kind = self.quant_type.tensor_type();
        if kind.is_float8() && self.reduce_range {
            return Err(
                QuantizationError::UnsupportedOption { option: "reduce_range=true", kind }.into()
            );
        }
        Ok(())
    }
}

/// Settings for writing calibration tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalibrationTableConfig {
    /// Read the binary table back after writing and log every entry.
    pub debug_validate: bool,
}

impl CalibrationTableConfig {
    /// `QUANTIZATION_DEBUG=1` turns on read-back validation.
    pub fn from_env() -> Self {
        Self { debug_validate: env::var("QUANTIZATION_DEBUG").is_ok_and(|v| v == "1") }
    }
}
