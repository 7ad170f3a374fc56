//! Plain data records passed between quantization stages.

use qlinear_common::{QuantType, QuantizedValueType, TensorData};
use serde::{Deserialize, Serialize};

use crate::transform::QuantizedData;

/// A weight initializer together with the parameters used to quantize it.
///
/// Per-tensor quantization stores one entry in each of `rmins`, `rmaxs`,
/// `zero_points` and `scales`; per-axis quantization stores one per slice
/// along `axis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizedInitializer {
    pub name: String,
    pub initializer: TensorData,
    pub rmins: Vec<f32>,
    pub rmaxs: Vec<f32>,
    pub zero_points: Vec<i32>,
    pub scales: Vec<f32>,
    /// Original float values, row-major.
    pub data: Vec<f32>,
    pub quantized_data: QuantizedData,
    pub axis: Option<usize>,
}

impl QuantizedInitializer {
    /// True when parameters were computed per slice rather than per tensor.
    pub fn is_per_axis(&self) -> bool {
        self.axis.is_some()
    }
}

/// Names wired up for one quantized value in the rewritten graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantizedValue {
    pub original_name: String,
    pub q_name: String,
    pub scale_name: String,
    pub zp_name: String,
    pub value_type: QuantizedValueType,
    pub axis: Option<usize>,
    pub node_type: Option<String>,
    pub node_qtype: Option<QuantType>,
}

impl QuantizedValue {
    pub fn new(
        original_name: impl Into<String>,
        q_name: impl Into<String>,
        scale_name: impl Into<String>,
        zp_name: impl Into<String>,
        value_type: QuantizedValueType,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            q_name: q_name.into(),
            scale_name: scale_name.into(),
            zp_name: zp_name.into(),
            value_type,
            axis: None,
            node_type: None,
            node_qtype: None,
        }
    }

    pub fn with_axis(mut self, axis: usize) -> Self {
        self.axis = Some(axis);
        self
    }

    pub fn with_node(mut self, node_type: impl Into<String>, node_qtype: QuantType) -> Self {
        self.node_type = Some(node_type.into());
        self.node_qtype = Some(node_qtype);
        self
    }
}

/// A bias whose quantization is deferred until its input and weight scales are known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiasToQuantize {
    pub bias_name: String,
    pub input_name: String,
    pub weight_name: String,
}

impl BiasToQuantize {
    pub fn new(
        bias_name: impl Into<String>,
        input_name: impl Into<String>,
        weight_name: impl Into<String>,
    ) -> Self {
        Self {
            bias_name: bias_name.into(),
            input_name: input_name.into(),
            weight_name: weight_name.into(),
        }
    }
}
