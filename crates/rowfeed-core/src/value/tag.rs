use crate::value::Value;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use uuid::Uuid;

///
/// ColumnType
///
/// Declared type tag of a mapped column.
/// Mirrors the `Value` variants, plus `Dynamic` for columns that may carry
/// any value kind.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ColumnType {
    Blob,
    Bool,
    Char,
    Decimal,
    Dynamic,
    Float32,
    Float64,
    Int16,
    Int32,
    Int64,
    Text,
    Timestamp,
    UInt8,
    Ulid,
    Uuid,
}

impl ColumnType {
    /// Stable human-readable label used by schema export and diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Blob => "Blob",
            Self::Bool => "Bool",
            Self::Char => "Char",
            Self::Decimal => "Decimal",
            Self::Dynamic => "Dynamic",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Text => "Text",
            Self::Timestamp => "Timestamp",
            Self::UInt8 => "UInt8",
            Self::Ulid => "Ulid",
            Self::Uuid => "Uuid",
        }
    }

    /// Zero value of this type, used when a reader is configured to return
    /// type defaults instead of failing on a missing current row.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::Blob => Value::Blob(Vec::new()),
            Self::Bool => Value::Bool(false),
            Self::Char => Value::Char('\0'),
            Self::Decimal => Value::Decimal(Decimal::ZERO),
            Self::Dynamic => Value::Null,
            Self::Float32 => Value::Float32(0.0),
            Self::Float64 => Value::Float64(0.0),
            Self::Int16 => Value::Int16(0),
            Self::Int32 => Value::Int32(0),
            Self::Int64 => Value::Int64(0),
            Self::Text => Value::Text(String::new()),
            Self::Timestamp => Value::Timestamp(DateTime::<Utc>::UNIX_EPOCH),
            Self::UInt8 => Value::UInt8(0),
            Self::Ulid => Value::Ulid(Ulid::nil()),
            Self::Uuid => Value::Uuid(Uuid::nil()),
        }
    }
}

/// Declared type of the variant carried by `value`; `None` for `Null`.
#[must_use]
pub(super) const fn column_type_of(value: &Value) -> Option<ColumnType> {
    let ty = match value {
        Value::Null => return None,
        Value::Blob(_) => ColumnType::Blob,
        Value::Bool(_) => ColumnType::Bool,
        Value::Char(_) => ColumnType::Char,
        Value::Decimal(_) => ColumnType::Decimal,
        Value::Float32(_) => ColumnType::Float32,
        Value::Float64(_) => ColumnType::Float64,
        Value::Int16(_) => ColumnType::Int16,
        Value::Int32(_) => ColumnType::Int32,
        Value::Int64(_) => ColumnType::Int64,
        Value::Text(_) => ColumnType::Text,
        Value::Timestamp(_) => ColumnType::Timestamp,
        Value::UInt8(_) => ColumnType::UInt8,
        Value::Ulid(_) => ColumnType::Ulid,
        Value::Uuid(_) => ColumnType::Uuid,
    };

    Some(ty)
}
