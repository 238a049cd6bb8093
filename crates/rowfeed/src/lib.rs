//! rowfeed: read a sequence of typed records as a forward-only table.
//!
//! This is the public meta-crate. Downstream users depend on **rowfeed** only.
//!
//! It re-exports the stable public API from:
//!   - `rowfeed-core`   (values, column mappings, the record reader)
//!   - `rowfeed-derive` (`#[derive(Record)]`)
//!
//! ```ignore
//! use rowfeed::prelude::*;
//!
//! #[derive(Record)]
//! struct Sample {
//!     string_field: String,
//!     int_field: i32,
//! }
//!
//! let mut reader = rows.into_record_reader();
//! while reader.advance()? {
//!     let name = reader.get_string(reader.ordinal("string_field")?)?;
//! }
//! ```

pub use rowfeed_core::{column, error, reader, traits, value};

//
// Macros
//

pub use rowfeed_core::{impl_field_value, member};
pub use rowfeed_derive::Record;

//
// Prelude
//

pub mod prelude {
    pub use rowfeed_core::prelude::*;
    pub use rowfeed_derive::Record;
}
