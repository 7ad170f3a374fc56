//! Lookups over graph collections.

use qlinear_common::{QuantizationError, Result, TensorData};

/// Anything addressable by name inside a graph.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for TensorData {
    fn name(&self) -> &str {
        &self.name
    }
}

/// First item called `name`, if any.
pub fn find_by_name<'a, T: Named>(name: &str, items: &'a [T]) -> Option<&'a T> {
    items.iter().find(|item| item.name() == name)
}

/// Index of the last element equal to `name`.
///
/// Node input/output lists may repeat a name; the last occurrence wins.
pub fn get_elem_index<S: AsRef<str>>(name: &str, elems: &[S]) -> Option<usize> {
    elems.iter().rposition(|e| e.as_ref() == name)
}

/// Float values of an initializer.
///
/// # Errors
///
/// `UnsupportedTensorType` for non-float initializers, and `InvalidInput`
/// when the payload length disagrees with the dims.
pub fn tensor_proto_to_array(initializer: &TensorData) -> Result<Vec<f32>> {
    let values = initializer.float_values()?;
    let numel = initializer.numel().ok_or_else(|| {
        QuantizationError::invalid_input(format!(
            "{} has dims {:?} whose element count overflows",
            initializer.name, initializer.dims
        ))
    })?;
    if values.len() != numel {
        return Err(QuantizationError::invalid_input(format!(
            "{} has dims {:?} but {} values",
            initializer.name,
            initializer.dims,
            values.len()
        ))
        .into());
    }
    Ok(values.to_vec())
}
