mod tag;


use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use ulid::Ulid;
use uuid::Uuid;

// re-exports
pub use tag::ColumnType;

///
/// Value
///
/// Dynamic value produced by a column getter for one record.
///
/// Null → the field's value is absent (`Option::None`), i.e. an unset
///        nullable value crossing the reader boundary.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Blob(Vec<u8>),
    Bool(bool),
    Char(char),
    Decimal(Decimal),
    Float32(f32),
    Float64(f64),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Null,
    Text(String),
    Timestamp(DateTime<Utc>),
    UInt8(u8),
    Ulid(Ulid),
    /// Globally unique identifier (the guid kind).
    Uuid(Uuid),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Type tag of the carried variant, or `None` for `Null`.
    #[must_use]
    pub const fn column_type(&self) -> Option<ColumnType> {
        tag::column_type_of(self)
    }

    /// Stable variant label for diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.column_type() {
            Some(ty) => ty.label(),
            None => "Null",
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(b) => Some(b.as_slice()),
            _ => None,
        }
    }
}

// impl_value_from
macro_rules! impl_value_from {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_value_from!(
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
    String => Text,
    &str => Text,
    Vec<u8> => Blob,
    Decimal => Decimal,
    DateTime<Utc> => Timestamp,
    Ulid => Ulid,
    Uuid => Uuid,
);

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Self::Null,
        }
    }
}
