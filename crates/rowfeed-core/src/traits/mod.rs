
use crate::{
    column::Column,
    value::{ColumnType, Value},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use ulid::Ulid;
use uuid::Uuid;

// ============================================================================
// RECORDS
// ============================================================================

///
/// Record
///
/// A record type with an automatic column mapping.
///
/// Usually implemented through `#[derive(Record)]`: one column per named
/// field, in declaration order. `describe` is only called once per type; the
/// result is cached process-wide by `Columns::automatic`.
///

pub trait Record: Sized + 'static {
    fn describe() -> Vec<Column<Self>>;
}

// ============================================================================
// FIELD VALUES
// ============================================================================

///
/// FieldValue
///
/// Conversion boundary between a record's field types and `Value`.
///
/// `column_type` is the declared type reported for a column backed by this
/// field type. `Option<T>` reports `T`'s type and maps `None` to `Value::Null`.
///

pub trait FieldValue {
    fn column_type() -> ColumnType
    where
        Self: Sized;

    fn to_value(&self) -> Value;

    #[must_use]
    fn from_value(value: &Value) -> Option<Self>
    where
        Self: Sized;
}

// Write-only: a reader cannot lend a `&str` out of an owned `Value`, so
// `from_value` never matches. Read text columns as `String`.
impl FieldValue for &str {
    fn column_type() -> ColumnType {
        ColumnType::Text
    }

    fn to_value(&self) -> Value {
        Value::Text((*self).to_string())
    }

    fn from_value(_value: &Value) -> Option<Self> {
        None
    }
}

impl FieldValue for String {
    fn column_type() -> ColumnType {
        ColumnType::Text
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FieldValue for Vec<u8> {
    fn column_type() -> ColumnType {
        ColumnType::Blob
    }

    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Blob(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FieldValue for NaiveDateTime {
    fn column_type() -> ColumnType {
        ColumnType::Timestamp
    }

    fn to_value(&self) -> Value {
        Value::Timestamp(self.and_utc())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Timestamp(v) => Some(v.naive_utc()),
            _ => None,
        }
    }
}

impl FieldValue for Value {
    fn column_type() -> ColumnType {
        ColumnType::Dynamic
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn column_type() -> ColumnType {
        T::column_type()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            return Some(None);
        }

        T::from_value(value).map(Some)
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    fn column_type() -> ColumnType {
        T::column_type()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: &Value) -> Option<Self> {
        T::from_value(value).map(Self::new)
    }
}

/// Implement `FieldValue` for `Copy` types that convert into and out of the
/// payload of a single `Value` variant.
#[macro_export]
macro_rules! impl_field_value {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl $crate::traits::FieldValue for $type {
                fn column_type() -> $crate::value::ColumnType {
                    $crate::value::ColumnType::$variant
                }

                fn to_value(&self) -> $crate::value::Value {
                    $crate::value::Value::$variant((*self).into())
                }

                fn from_value(value: &$crate::value::Value) -> ::core::option::Option<Self> {
                    match value {
                        $crate::value::Value::$variant(v) => (*v).try_into().ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_field_value!(
    bool => Bool,
    char => Char,
    u8 => UInt8,
    i8 => Int16,
    i16 => Int16,
    u16 => Int32,
    i32 => Int32,
    u32 => Int64,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    Decimal => Decimal,
    DateTime<Utc> => Timestamp,
    Ulid => Ulid,
    Uuid => Uuid,
);
