//! Forward-only record reader.
//!
//! `RecordReader` walks a source iterator one record at a time and exposes
//! the current record through positional and named columns. It never
//! buffers or pre-counts the source: row presence is only known after
//! `advance`.
//!
//! A reader is driven by a single caller (`&mut self` for every state
//! change). `close` is the single release point for the source iterator and
//! also runs on drop.

mod config;
mod ext;
mod schema;

#[cfg(test)]
mod tests;

use crate::{
    column::{Column, Columns},
    error::ReaderError,
    traits::FieldValue,
    value::{ColumnType, Value},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::{
    any::type_name,
    borrow::Borrow,
    cell::OnceCell,
    collections::HashMap,
    fmt,
    iter::Fuse,
};
use ulid::Ulid;
use uuid::Uuid;

// re-exports
pub use config::{MissingRowPolicy, NameMatch, ReaderConfig};
pub use ext::IntoRecordReader;
pub use schema::{SchemaColumn, UNSPECIFIED_SIZE};

///
/// RecordReader
///
/// Tabular cursor over a sequence of records of type `T`.
/// Items of the source may be owned records or anything that borrows as one.
///

pub struct RecordReader<T, I: Iterator> {
    source: Option<Fuse<I>>,
    columns: Columns<T>,
    current: Option<I::Item>,
    lookup: OnceCell<HashMap<String, usize>>,
    config: ReaderConfig,
    rows_read: u64,
    closed: bool,
}

impl<T, I> RecordReader<T, I>
where
    I: Iterator,
    I::Item: Borrow<T>,
{
    /// Open a reader over `source`. The source is not touched until the
    /// first `advance`.
    #[must_use]
    pub fn new(source: I, columns: Columns<T>) -> Self {
        tracing::debug!(
            record = type_name::<T>(),
            columns = columns.len(),
            "record reader opened"
        );

        Self {
            source: Some(source.fuse()),
            columns,
            current: None,
            lookup: OnceCell::new(),
            config: ReaderConfig::default(),
            rows_read: 0,
            closed: false,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self.lookup = OnceCell::new();
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ReaderConfig {
        &self.config
    }

    ///
    /// ROW STATE
    ///

    /// Move to the next record. Returns `false` once the source is exhausted,
    /// and keeps returning `false` on later calls.
    pub fn advance(&mut self) -> Result<bool, ReaderError> {
        let Some(source) = self.source.as_mut() else {
            return Err(ReaderError::Closed);
        };

        match source.next() {
            Some(record) => {
                self.current = Some(record);
                self.rows_read += 1;
                tracing::trace!(row = self.rows_read, "advanced to next record");

                Ok(true)
            }
            None => {
                self.current = None;

                Ok(false)
            }
        }
    }

    /// Always `true`; the source is never scanned ahead to verify it.
    #[must_use]
    pub const fn has_rows(&self) -> bool {
        true
    }

    /// Nesting depth of the current row; readers never nest.
    #[must_use]
    pub const fn depth(&self) -> usize {
        0
    }

    /// A reader exposes exactly one result set.
    #[allow(clippy::unused_self)]
    pub fn next_result(&mut self) -> bool {
        false
    }

    /// Number of records successfully advanced to.
    #[must_use]
    pub const fn rows_processed(&self) -> u64 {
        self.rows_read
    }

    /// The record the reader is positioned on, if any.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref().map(Borrow::borrow)
    }

    ///
    /// COLUMNS
    ///

    #[must_use]
    pub const fn columns(&self) -> &Columns<T> {
        &self.columns
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_name(&self, ordinal: usize) -> Result<&str, ReaderError> {
        self.column(ordinal).map(Column::name)
    }

    pub fn column_type(&self, ordinal: usize) -> Result<ColumnType, ReaderError> {
        self.column(ordinal).map(Column::column_type)
    }

    pub fn type_name(&self, ordinal: usize) -> Result<&'static str, ReaderError> {
        self.column_type(ordinal).map(ColumnType::label)
    }

    /// Resolve a column name to its ordinal.
    pub fn ordinal(&self, name: &str) -> Result<usize, ReaderError> {
        let lookup = self.lookup.get_or_init(|| self.build_lookup());

        let found = match self.config.name_match {
            NameMatch::Exact => lookup.get(name),
            NameMatch::IgnoreAsciiCase => lookup.get(&name.to_ascii_lowercase()),
        };

        found
            .copied()
            .ok_or_else(|| ReaderError::column_not_found(name))
    }

    #[must_use]
    pub fn schema(&self) -> Vec<SchemaColumn> {
        schema::schema_of(&self.columns)
    }

    ///
    /// VALUES
    ///

    /// Value of column `ordinal` for the current record.
    pub fn value(&self, ordinal: usize) -> Result<Value, ReaderError> {
        let column = self.column(ordinal)?;

        self.read(column)
    }

    pub fn value_by_name(&self, name: &str) -> Result<Value, ReaderError> {
        self.value(self.ordinal(name)?)
    }

    /// Fill `buffer` with the current record's values in column order.
    /// Writes `min(buffer.len(), column_count)` entries and returns that count.
    pub fn values_into(&self, buffer: &mut [Value]) -> Result<usize, ReaderError> {
        let count = buffer.len().min(self.columns.len());

        for (slot, column) in buffer.iter_mut().zip(self.columns.iter()) {
            *slot = self.read(column)?;
        }

        Ok(count)
    }

    /// All values of the current record, in column order.
    pub fn current_values(&self) -> Result<Vec<Value>, ReaderError> {
        self.columns.iter().map(|column| self.read(column)).collect()
    }

    pub fn is_null(&self, ordinal: usize) -> Result<bool, ReaderError> {
        self.value(ordinal).map(|value| value.is_null())
    }

    /// Typed read. Fails with `InvalidCast` when the value is not exactly of
    /// the requested kind; request `Option<F>` to accept `Null`.
    pub fn get<F: FieldValue>(&self, ordinal: usize) -> Result<F, ReaderError> {
        let value = self.value(ordinal)?;

        F::from_value(&value).ok_or_else(|| ReaderError::InvalidCast {
            ordinal,
            expected: F::column_type().label(),
            found: value.label(),
        })
    }

    pub fn get_bool(&self, ordinal: usize) -> Result<bool, ReaderError> {
        self.get(ordinal)
    }

    pub fn get_u8(&self, ordinal: usize) -> Result<u8, ReaderError> {
        self.get(ordinal)
    }

    pub fn get_char(&self, ordinal: usize) -> Result<char, ReaderError> {
        self.get(ordinal)
    }

    pub fn get_i16(&self, ordinal: usize) -> Result<i16, ReaderError> {
        self.get(ordinal)
    }

    pub fn get_i32(&self, ordinal: usize) -> Result<i32, ReaderError> {
        self.get(ordinal)
    }

    pub fn get_i64(&self, ordinal: usize) -> Result<i64, ReaderError> {
        self.get(ordinal)
    }

    pub fn get_f32(&self, ordinal: usize) -> Result<f32, ReaderError> {
        self.get(ordinal)
    }

    pub fn get_f64(&self, ordinal: usize) -> Result<f64, ReaderError> {
        self.get(ordinal)
    }

    pub fn get_string(&self, ordinal: usize) -> Result<String, ReaderError> {
        self.get(ordinal)
    }

    pub fn get_decimal(&self, ordinal: usize) -> Result<Decimal, ReaderError> {
        self.get(ordinal)
    }

    /// Read a guid column.
    pub fn get_uuid(&self, ordinal: usize) -> Result<Uuid, ReaderError> {
        self.get(ordinal)
    }

    pub fn get_ulid(&self, ordinal: usize) -> Result<Ulid, ReaderError> {
        self.get(ordinal)
    }

    pub fn get_timestamp(&self, ordinal: usize) -> Result<DateTime<Utc>, ReaderError> {
        self.get(ordinal)
    }

    /// Byte-range extraction is not supported; read the whole value with
    /// `value` or `get::<Vec<u8>>` instead.
    #[allow(clippy::unused_self)]
    pub fn get_bytes(
        &self,
        _ordinal: usize,
        _field_offset: u64,
        _buffer: Option<&mut [u8]>,
        _buffer_offset: usize,
        _length: usize,
    ) -> Result<u64, ReaderError> {
        Err(ReaderError::unsupported("get_bytes"))
    }

    /// Char-range extraction is not supported.
    #[allow(clippy::unused_self)]
    pub fn get_chars(
        &self,
        _ordinal: usize,
        _field_offset: u64,
        _buffer: Option<&mut [char]>,
        _buffer_offset: usize,
        _length: usize,
    ) -> Result<u64, ReaderError> {
        Err(ReaderError::unsupported("get_chars"))
    }

    /// Iterate the remaining rows as value vectors, advancing the reader.
    pub fn rows(&mut self) -> Rows<'_, T, I> {
        Rows {
            reader: self,
            done: false,
        }
    }

    ///
    /// INTERNALS
    ///

    fn column(&self, ordinal: usize) -> Result<&Column<T>, ReaderError> {
        self.columns
            .get(ordinal)
            .ok_or(ReaderError::OrdinalOutOfRange {
                ordinal,
                count: self.columns.len(),
            })
    }

    fn read(&self, column: &Column<T>) -> Result<Value, ReaderError> {
        match (self.current(), self.config.missing_row) {
            (Some(record), _) => Ok(column.value(record)),
            (None, MissingRowPolicy::Error) => Err(ReaderError::NoCurrentRow),
            (None, MissingRowPolicy::TypeDefault) => Ok(column.column_type().default_value()),
        }
    }

    fn build_lookup(&self) -> HashMap<String, usize> {
        let mut lookup = HashMap::with_capacity(self.columns.len());

        for (ordinal, column) in self.columns.iter().enumerate() {
            let key = match self.config.name_match {
                NameMatch::Exact => column.name().to_string(),
                NameMatch::IgnoreAsciiCase => column.name().to_ascii_lowercase(),
            };
            lookup.entry(key).or_insert(ordinal);
        }

        lookup
    }
}

impl<T, I: Iterator> RecordReader<T, I> {
    /// Release the source iterator. Later calls are no-ops.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }

        self.closed = true;
        self.source = None;
        self.current = None;

        tracing::debug!(
            record = type_name::<T>(),
            rows_read = self.rows_read,
            "record reader closed"
        );
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<T, I: Iterator> Drop for RecordReader<T, I> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T, I: Iterator> fmt::Debug for RecordReader<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordReader")
            .field("columns", &self.columns)
            .field("config", &self.config)
            .field("rows_read", &self.rows_read)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

///
/// Rows
///
/// Row-at-a-time view of a reader; see [`RecordReader::rows`].
/// Stops after the first error.
///

pub struct Rows<'r, T, I: Iterator> {
    reader: &'r mut RecordReader<T, I>,
    done: bool,
}

impl<T, I> Iterator for Rows<'_, T, I>
where
    I: Iterator,
    I::Item: Borrow<T>,
{
    type Item = Result<Vec<Value>, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.advance() {
            Ok(true) => Some(self.reader.current_values()),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
