//! Representable integer ranges for each quantized element type.
//!
//! Three static tables cover the policies: full native range, symmetric
//! (most-negative value dropped so the range is balanced around zero), and
//! reduced (roughly half the range, to avoid saturation in integer kernels).

use qlinear_common::{QuantizationError, Result, TensorDataType};

/// Full native range.
const INT_TYPE_RANGE: [(TensorDataType, (i32, i32)); 4] = [
    (TensorDataType::Uint8, (0, 255)),
    (TensorDataType::Int8, (-128, 127)),
    (TensorDataType::Uint16, (0, 65535)),
    (TensorDataType::Int16, (-32768, 32767)),
];

/// Symmetric range, defined for signed types only.
const INT_TYPE_SYMMETRIC_RANGE: [(TensorDataType, (i32, i32)); 2] =
    [(TensorDataType::Int8, (-127, 127)), (TensorDataType::Int16, (-32767, 32767))];

/// Reduced range.
const INT_TYPE_REDUCED_RANGE: [(TensorDataType, (i32, i32)); 4] = [
    (TensorDataType::Uint8, (0, 127)),
    (TensorDataType::Int8, (-64, 64)),
    (TensorDataType::Uint16, (0, 32767)),
    (TensorDataType::Int16, (-16384, 16384)),
];

fn lookup(table: &[(TensorDataType, (i32, i32))], kind: TensorDataType) -> Option<(i32, i32)> {
    table.iter().find(|(k, _)| *k == kind).map(|&(_, range)| range)
}

/// Return `(qmin, qmax)`, the smallest and largest values representable by
/// `kind` under the given policy.
///
/// `reduce_range` takes precedence over `symmetric`. `symmetric` only
/// changes the range of signed types; unsigned types keep their full range.
pub fn get_qmin_qmax_for_qtype(
    kind: TensorDataType,
    reduce_range: bool,
    symmetric: bool,
) -> Result<(i32, i32)> {
    if kind.is_float8() {
        return Err(QuantizationError::unsupported(kind).into());
    }

    let range = match (reduce_range, symmetric) {
        (true, _) => lookup(&INT_TYPE_REDUCED_RANGE, kind),
        (false, true) => lookup(&INT_TYPE_SYMMETRIC_RANGE, kind)
            .or_else(|| lookup(&INT_TYPE_RANGE, kind)),
        (false, false) => lookup(&INT_TYPE_RANGE, kind),
    };

    range.ok_or_else(|| QuantizationError::unsupported(kind).into())
}

/// Width of the representable range, `qmax - qmin`.
pub fn get_qrange_for_qtype(
    kind: TensorDataType,
    reduce_range: bool,
    symmetric: bool,
) -> Result<i32> {
    let (qmin, qmax) = get_qmin_qmax_for_qtype(kind, reduce_range, symmetric)?;
    Ok(qmax - qmin)
}
