//! Graph nodes.

use qlinear_common::Result;
use serde::{Deserialize, Serialize};

use crate::attribute::{AttributeProto, AttributeValue, attribute_to_kwarg};
use crate::lookup::Named;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeProto {
    pub op_type: String,
    pub name: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    /// Empty for the default operator domain.
    pub domain: String,
    pub attributes: Vec<AttributeProto>,
}

impl NodeProto {
    pub fn new<I, O>(
        op_type: impl Into<String>,
        inputs: I,
        outputs: O,
        name: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            op_type: op_type.into(),
            name: name.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
            domain: String::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeProto) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// All attributes as `(name, value)` pairs, in declaration order.
    pub fn attribute_kwargs(&self) -> Result<Vec<(String, AttributeValue)>> {
        self.attributes.iter().map(attribute_to_kwarg).collect()
    }
}

impl Named for NodeProto {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Build a `Mul` node with a single output.
pub fn get_mul_node<I>(inputs: I, output: impl Into<String>, name: impl Into<String>) -> NodeProto
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    NodeProto::new("Mul", inputs, [output.into()], name)
}
