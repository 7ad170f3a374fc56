//! Element types and quantization selectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QLinearError;

/// Element type of a graph tensor, tagged with its wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum TensorDataType {
    Undefined = 0,
    Float = 1,
    Uint8 = 2,
    Int8 = 3,
    Uint16 = 4,
    Int16 = 5,
    Int32 = 6,
    Int64 = 7,
    String = 8,
    Bool = 9,
    Float16 = 10,
    Double = 11,
    Uint32 = 12,
    Uint64 = 13,
    Complex64 = 14,
    Complex128 = 15,
    BFloat16 = 16,
    Float8E4M3FN = 17,
    Float8E4M3FNUZ = 18,
    Float8E5M2 = 19,
    Float8E5M2FNUZ = 20,
    Uint4 = 21,
    Int4 = 22,
}

impl TensorDataType {
    /// Every variant, in wire-code order.
    pub const ALL: [TensorDataType; 23] = [
        Self::Undefined,
        Self::Float,
        Self::Uint8,
        Self::Int8,
        Self::Uint16,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::String,
        Self::Bool,
        Self::Float16,
        Self::Double,
        Self::Uint32,
        Self::Uint64,
        Self::Complex64,
        Self::Complex128,
        Self::BFloat16,
        Self::Float8E4M3FN,
        Self::Float8E4M3FNUZ,
        Self::Float8E5M2,
        Self::Float8E5M2FNUZ,
        Self::Uint4,
        Self::Int4,
    ];

    /// Wire code of this element type.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Upper-case element type name, e.g. `"FLOAT8E4M3FN"`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Undefined => "UNDEFINED",
            Self::Float => "FLOAT",
            Self::Uint8 => "UINT8",
            Self::Int8 => "INT8",
            Self::Uint16 => "UINT16",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::String => "STRING",
            Self::Bool => "BOOL",
            Self::Float16 => "FLOAT16",
            Self::Double => "DOUBLE",
            Self::Uint32 => "UINT32",
            Self::Uint64 => "UINT64",
            Self::Complex64 => "COMPLEX64",
            Self::Complex128 => "COMPLEX128",
            Self::BFloat16 => "BFLOAT16",
            Self::Float8E4M3FN => "FLOAT8E4M3FN",
            Self::Float8E4M3FNUZ => "FLOAT8E4M3FNUZ",
            Self::Float8E5M2 => "FLOAT8E5M2",
            Self::Float8E5M2FNUZ => "FLOAT8E5M2FNUZ",
            Self::Uint4 => "UINT4",
            Self::Int4 => "INT4",
        }
    }

    /// True for the 8-bit floating point families.
    pub const fn is_float8(self) -> bool {
        matches!(
            self,
            Self::Float8E4M3FN | Self::Float8E4M3FNUZ | Self::Float8E5M2 | Self::Float8E5M2FNUZ
        )
    }

    /// True for the integer kinds that have a linear quantization range.
    pub const fn is_quantized_integer(self) -> bool {
        matches!(self, Self::Uint8 | Self::Int8 | Self::Uint16 | Self::Int16)
    }
}

impl fmt::Display for TensorDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for TensorDataType {
    type Error = QLinearError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::ALL.iter().copied().find(|t| t.code() == code).ok_or_else(|| {
            QLinearError::InvalidValue { kind: "TensorDataType", value: code.to_string() }
        })
    }
}

/// Quantization target chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QuantType {
    #[default]
    QInt8,
    QUInt8,
    QFloat8E4M3FN,
    QInt16,
    QUInt16,
}

impl QuantType {
    pub const ALL: [QuantType; 5] =
        [Self::QInt8, Self::QUInt8, Self::QFloat8E4M3FN, Self::QInt16, Self::QUInt16];

    /// Element type used to store values quantized with this target.
    pub const fn tensor_type(self) -> TensorDataType {
        match self {
            Self::QInt8 => TensorDataType::Int8,
            Self::QUInt8 => TensorDataType::Uint8,
            Self::QUInt16 => TensorDataType::Uint16,
            Self::QInt16 => TensorDataType::Int16,
            Self::QFloat8E4M3FN => TensorDataType::Float8E4M3FN,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::QInt8 => "QInt8",
            Self::QUInt8 => "QUInt8",
            Self::QFloat8E4M3FN => "QFLOAT8E4M3FN",
            Self::QInt16 => "QInt16",
            Self::QUInt16 => "QUInt16",
        }
    }
}

/// Which operator family a quantized model uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QuantizationMode {
    /// `ConvInteger` / `MatMulInteger`.
    IntegerOps,
    /// `QLinearConv` / `QLinearMatMul`.
    #[default]
    QLinearOps,
}

impl QuantizationMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::IntegerOps => "IntegerOps",
            Self::QLinearOps => "QLinearOps",
        }
    }
}

/// How quantized operators are represented in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QuantFormat {
    QOperator,
    #[default]
    QDQ,
}

impl QuantFormat {
    const fn as_str(self) -> &'static str {
        match self {
            Self::QOperator => "QOperator",
            Self::QDQ => "QDQ",
        }
    }
}

/// Role of a quantized value in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantizedValueType {
    Input,
    Initializer,
}

impl QuantizedValueType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Initializer => "Initializer",
        }
    }
}

macro_rules! impl_name_conversions {
    ($ty:ident, [$($variant:ident),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = QLinearError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s == $ty::$variant.as_str() {
                        return Ok($ty::$variant);
                    }
                )+
                Err(QLinearError::InvalidValue { kind: stringify!($ty), value: s.to_string() })
            }
        }
    };
}

impl_name_conversions!(QuantType, [QInt8, QUInt8, QFloat8E4M3FN, QInt16, QUInt16]);
impl_name_conversions!(QuantizationMode, [IntegerOps, QLinearOps]);
impl_name_conversions!(QuantFormat, [QOperator, QDQ]);
impl_name_conversions!(QuantizedValueType, [Input, Initializer]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_round_trip() {
        for t in TensorDataType::ALL {
            assert_eq!(TensorDataType::try_from(t.code()).unwrap(), t);
        }
        assert!(TensorDataType::try_from(23).is_err());
        assert!(TensorDataType::try_from(-1).is_err());
    }

    #[test]
    fn quant_type_maps_to_storage_type() {
        assert_eq!(QuantType::QInt8.tensor_type(), TensorDataType::Int8);
        assert_eq!(QuantType::QUInt8.tensor_type(), TensorDataType::Uint8);
        assert_eq!(QuantType::QInt16.tensor_type(), TensorDataType::Int16);
        assert_eq!(QuantType::QUInt16.tensor_type(), TensorDataType::Uint16);
        assert_eq!(QuantType::QFloat8E4M3FN.tensor_type(), TensorDataType::Float8E4M3FN);
    }

    #[test]
    fn enum_names_parse_back() {
        for q in QuantType::ALL {
            assert_eq!(q.to_string().parse::<QuantType>().unwrap(), q);
        }
        assert_eq!("QDQ".parse::<QuantFormat>().unwrap(), QuantFormat::QDQ);
        assert_eq!("IntegerOps".parse::<QuantizationMode>().unwrap(), QuantizationMode::IntegerOps);
        assert_eq!(
            "Initializer".parse::<QuantizedValueType>().unwrap(),
            QuantizedValueType::Initializer
        );
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = "QInt4".parse::<QuantType>().unwrap_err();
        assert_eq!(err.to_string(), "invalid QuantType value: \"QInt4\"");
        assert!("qdq".parse::<QuantFormat>().is_err());
    }

    #[test]
    fn float8_and_integer_predicates() {
        let float8: Vec<_> = TensorDataType::ALL.iter().filter(|t| t.is_float8()).collect();
        assert_eq!(float8.len(), 4);
        let ints: Vec<_> =
            TensorDataType::ALL.iter().filter(|t| t.is_quantized_integer()).collect();
        assert_eq!(ints.len(), 4);
        assert!(!TensorDataType::Int32.is_quantized_integer());
    }
}
