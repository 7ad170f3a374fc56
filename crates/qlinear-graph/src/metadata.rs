//! Model-level metadata tags recording which quantization steps already ran.

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const PRE_PROCESS_KEY: &str = "onnx.quant.pre_process";
pub const INFER_KEY: &str = "onnx.infer";
/// Value written for both tags.
pub const QUANT_TAG_VALUE: &str = "onnxruntime.quant";

/// A single key-value metadata entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataProp {
    pub key: String,
    pub value: String,
}

/// Ordered model metadata properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub props: Vec<MetadataProp>,
}

impl ModelMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the last property named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.props.iter().rev().find(|p| p.key == key).map(|p| p.value.as_str())
    }

    pub fn has(&self, key: &str, value: &str) -> bool {
        self.props.iter().any(|p| p.key == key && p.value == value)
    }

    /// Insert or overwrite `key` in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.props.iter_mut().find(|p| p.key == key) {
            Some(prop) => prop.value = value,
            None => self.props.push(MetadataProp { key, value }),
        }
    }

    /// Rebuild the properties with `key = value` first, then every existing
    /// property merged over it. An existing entry for `key` keeps its value.
    fn tag(&mut self, key: &str, value: &str) {
        let mut merged = ModelMetadata::new();
        merged.set(key, value);
        for prop in self.props.drain(..) {
            merged.set(prop.key, prop.value);
        }
        *self = merged;
    }
}

/// Tag the model as having gone through quantization pre-processing.
pub fn add_pre_process_metadata(metadata: &mut ModelMetadata) {
    metadata.tag(PRE_PROCESS_KEY, QUANT_TAG_VALUE);
    debug!(key = PRE_PROCESS_KEY, "tagged model metadata");
}

pub fn model_has_pre_process_metadata(metadata: &ModelMetadata) -> bool {
    metadata.has(PRE_PROCESS_KEY, QUANT_TAG_VALUE)
}

/// Tag the model as having gone through shape inference.
pub fn add_infer_metadata(metadata: &mut ModelMetadata) {
    metadata.tag(INFER_KEY, QUANT_TAG_VALUE);
    debug!(key = INFER_KEY, "tagged model metadata");
}

pub fn model_has_infer_metadata(metadata: &ModelMetadata) -> bool {
    metadata.has(INFER_KEY, QUANT_TAG_VALUE)
}
