//! Core runtime for rowfeed: values, column mappings, and the forward-only
//! record reader that exposes a sequence of typed records as rows and columns.
#![warn(unreachable_pub)]

extern crate self as rowfeed;

// public exports are one module level down
pub mod column;
pub mod error;
pub mod reader;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Prelude contains the vocabulary needed to map and read records.
///

pub mod prelude {
    pub use crate::{
        column::{Column, ColumnSet, Columns, MemberRef},
        error::ReaderError,
        member,
        reader::{IntoRecordReader as _, ReaderConfig, RecordReader},
        traits::{FieldValue, Record},
        value::{ColumnType, Value},
    };
}
