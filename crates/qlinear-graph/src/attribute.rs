//! Node attributes and their conversion to keyword arguments.

use qlinear_common::{QLinearError, Result, TensorData};
use serde::{Deserialize, Serialize};

use crate::lookup::Named;

/// Discriminant tag for attribute payloads.
///
/// Numeric values match the graph format's wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum AttributeType {
    Undefined = 0,
    Float = 1,
    Int = 2,
    String = 3,
    Tensor = 4,
    Graph = 5,
    Floats = 6,
    Ints = 7,
    Strings = 8,
    Tensors = 9,
    Graphs = 10,
}

impl AttributeType {
    /// Convert from the raw wire code.
    pub const fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::Undefined),
            1 => Some(Self::Float),
            2 => Some(Self::Int),
            3 => Some(Self::String),
            4 => Some(Self::Tensor),
            5 => Some(Self::Graph),
            6 => Some(Self::Floats),
            7 => Some(Self::Ints),
            8 => Some(Self::Strings),
            9 => Some(Self::Tensors),
            10 => Some(Self::Graphs),
            _ => None,
        }
    }
}

/// Opaque reference to a subgraph; the quantizer never looks inside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRef(pub String);

/// An attribute as stored on a node.
///
/// Only the field selected by `attr_type` is meaningful. `attr_type` stays a
/// raw code so that attributes with unknown types can still be carried.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeProto {
    pub name: String,
    pub attr_type: i32,
    pub f: f32,
    pub i: i64,
    pub s: Vec<u8>,
    pub t: Option<TensorData>,
    pub g: GraphRef,
    pub floats: Vec<f32>,
    pub ints: Vec<i64>,
    pub strings: Vec<Vec<u8>>,
    pub tensors: Vec<TensorData>,
    pub graphs: Vec<GraphRef>,
}

impl AttributeProto {
    fn typed(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self { name: name.into(), attr_type: attr_type as i32, ..Default::default() }
    }

    pub fn float(name: impl Into<String>, f: f32) -> Self {
        Self { f, ..Self::typed(name, AttributeType::Float) }
    }

    pub fn int(name: impl Into<String>, i: i64) -> Self {
        Self { i, ..Self::typed(name, AttributeType::Int) }
    }

    pub fn string(name: impl Into<String>, s: impl Into<Vec<u8>>) -> Self {
        Self { s: s.into(), ..Self::typed(name, AttributeType::String) }
    }

    pub fn tensor(name: impl Into<String>, t: TensorData) -> Self {
        Self { t: Some(t), ..Self::typed(name, AttributeType::Tensor) }
    }

    pub fn graph(name: impl Into<String>, g: GraphRef) -> Self {
        Self { g, ..Self::typed(name, AttributeType::Graph) }
    }

    pub fn floats(name: impl Into<String>, floats: Vec<f32>) -> Self {
        Self { floats, ..Self::typed(name, AttributeType::Floats) }
    }

    pub fn ints(name: impl Into<String>, ints: Vec<i64>) -> Self {
        Self { ints, ..Self::typed(name, AttributeType::Ints) }
    }

    pub fn strings(name: impl Into<String>, strings: Vec<Vec<u8>>) -> Self {
        Self { strings, ..Self::typed(name, AttributeType::Strings) }
    }

    pub fn tensors(name: impl Into<String>, tensors: Vec<TensorData>) -> Self {
        Self { tensors, ..Self::typed(name, AttributeType::Tensors) }
    }

    pub fn graphs(name: impl Into<String>, graphs: Vec<GraphRef>) -> Self {
        Self { graphs, ..Self::typed(name, AttributeType::Graphs) }
    }
}

impl Named for AttributeProto {
    fn name(&self) -> &str {
        &self.name
    }
}

/// The payload of an attribute, detached from its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Float(f32),
    Int(i64),
    String(Vec<u8>),
    Tensor(TensorData),
    Graph(GraphRef),
    Floats(Vec<f32>),
    Ints(Vec<i64>),
    Strings(Vec<Vec<u8>>),
    Tensors(Vec<TensorData>),
    Graphs(Vec<GraphRef>),
}

/// Convert an attribute into a `(name, value)` pair suitable for rebuilding
/// a node.
///
/// # Errors
///
/// - `UndefinedAttributeType` when the type code is 0
/// - `UnsupportedAttributeType` for codes outside 1..=10
/// - `InvalidValue` for a tensor attribute without a tensor
pub fn attribute_to_kwarg(attribute: &AttributeProto) -> Result<(String, AttributeValue)> {
    let name = attribute.name.clone();
    let value = match AttributeType::from_i32(attribute.attr_type) {
        Some(AttributeType::Undefined) => {
            return Err(QLinearError::UndefinedAttributeType { name });
        }
        None => {
            return Err(QLinearError::UnsupportedAttributeType {
                name,
                attr_type: attribute.attr_type,
            });
        }
        Some(AttributeType::Float) => AttributeValue::Float(attribute.f),
        Some(AttributeType::Int) => AttributeValue::Int(attribute.i),
        Some(AttributeType::String) => AttributeValue::String(attribute.s.clone()),
        Some(AttributeType::Tensor) => match &attribute.t {
            Some(t) => AttributeValue::Tensor(t.clone()),
            None => {
                return Err(QLinearError::InvalidValue {
                    kind: "tensor attribute",
                    value: name,
                });
            }
        },
        Some(AttributeType::Graph) => AttributeValue::Graph(attribute.g.clone()),
        Some(AttributeType::Floats) => AttributeValue::Floats(attribute.floats.clone()),
        Some(AttributeType::Ints) => AttributeValue::Ints(attribute.ints.clone()),
        Some(AttributeType::Strings) => AttributeValue::Strings(attribute.strings.clone()),
        Some(AttributeType::Tensors) => AttributeValue::Tensors(attribute.tensors.clone()),
        Some(AttributeType::Graphs) => AttributeValue::Graphs(attribute.graphs.clone()),
    };
    Ok((name, value))
}
