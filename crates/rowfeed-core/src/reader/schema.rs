use crate::{column::Columns, value::ColumnType};
use serde::Serialize;

/// Size sentinel reported for every column: the reader never infers widths.
pub const UNSPECIFIED_SIZE: i32 = -1;

///
/// SchemaColumn
///
/// Static description of one exposed column, independent of reader position.
/// `nullable` and `is_key` are fixed to `false`; they are not inferred from
/// the record type.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SchemaColumn {
    pub name: String,
    pub ordinal: usize,
    pub column_type: ColumnType,
    pub size: i32,
    pub nullable: bool,
    pub is_key: bool,
}

pub(super) fn schema_of<T>(columns: &Columns<T>) -> Vec<SchemaColumn> {
    columns
        .iter()
        .enumerate()
        .map(|(ordinal, column)| SchemaColumn {
            name: column.name().to_string(),
            ordinal,
            column_type: column.column_type(),
            size: UNSPECIFIED_SIZE,
            nullable: false,
            is_key: false,
        })
        .collect()
}
