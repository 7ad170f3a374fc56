//! Graph glue for qlinear
//!
//! Minimal, serde-friendly stand-ins for the graph objects the quantizer
//! touches (nodes, attributes, model metadata), plus the helpers used while
//! rewriting a graph:
//! - name and index lookups over tensors, nodes and attributes
//! - attribute → keyword-argument conversion
//! - pre-processing / shape-inference metadata tags
//! - QuantizeLinear / DequantizeLinear naming conventions

pub mod attribute;
pub mod lookup;
pub mod metadata;
pub mod naming;
pub mod node;

pub use attribute::{AttributeProto, AttributeType, AttributeValue, GraphRef, attribute_to_kwarg};
pub use lookup::{Named, find_by_name, get_elem_index, tensor_proto_to_array};
pub use metadata::{
    MetadataProp, ModelMetadata, add_infer_metadata, add_pre_process_metadata,
    model_has_infer_metadata, model_has_pre_process_metadata,
};
pub use naming::{
    add_dequant_input_suffix, add_dequant_output_suffix, add_dequant_suffix,
    add_quant_input_suffix, add_quant_output_suffix, add_quant_suffix,
    generate_identified_filename,
};
pub use node::{NodeProto, get_mul_node};
