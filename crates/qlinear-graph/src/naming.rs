//! Naming conventions for the tensors and nodes inserted around quantized values.

use std::path::{Path, PathBuf};

pub const PRODUCER_NAME: &str = "onnx.quantize";
pub const PRODUCER_VERSION: &str = "0.1.0";

pub const ONNX_DOMAIN: &str = "ai.onnx";
pub const MS_DOMAIN: &str = "com.microsoft";

pub const QUANT_OP_NAME: &str = "QuantizeLinear";
pub const DEQUANT_OP_NAME: &str = "DequantizeLinear";

pub const QUANT_SUFFIX: &str = "_QuantizeLinear";
pub const QUANT_INPUT_SUFFIX: &str = "_QuantizeLinear_Input";
pub const QUANT_OUTPUT_SUFFIX: &str = "_QuantizeLinear_Output";
pub const DEQUANT_SUFFIX: &str = "_DequantizeLinear";
pub const DEQUANT_INPUT_SUFFIX: &str = "_DequantizeLinear_Input";
pub const DEQUANT_OUTPUT_SUFFIX: &str = "_DequantizeLinear_Output";

/// Suffix of the tensor holding quantized weights.
pub const TENSOR_NAME_QUANT_SUFFIX: &str = "_quantized";

pub fn add_quant_suffix(tensor_name: &str) -> String {
    format!("{tensor_name}{QUANT_SUFFIX}")
}

pub fn add_quant_input_suffix(tensor_name: &str) -> String {
    format!("{tensor_name}{QUANT_INPUT_SUFFIX}")
}

pub fn add_quant_output_suffix(tensor_name: &str) -> String {
    format!("{tensor_name}{QUANT_OUTPUT_SUFFIX}")
}

pub fn add_dequant_suffix(tensor_name: &str) -> String {
    format!("{tensor_name}{DEQUANT_SUFFIX}")
}

pub fn add_dequant_input_suffix(tensor_name: &str) -> String {
    format!("{tensor_name}{DEQUANT_INPUT_SUFFIX}")
}

pub fn add_dequant_output_suffix(tensor_name: &str) -> String {
    format!("{tensor_name}{DEQUANT_OUTPUT_SUFFIX}")
}

/// Insert `identifier` between the file stem and its extension, keeping the
/// parent directory: `dir/model.onnx` + `-inferred` → `dir/model-inferred.onnx`.
pub fn generate_identified_filename(filename: &Path, identifier: &str) -> PathBuf {
    let stem = filename.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let mut name = format!("{stem}{identifier}");
    if let Some(ext) = filename.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    match filename.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
