use crate::{
    column::{ColumnSet, Columns},
    error::ReaderError,
    reader::RecordReader,
    traits::Record,
};
use std::borrow::Borrow;

///
/// IntoRecordReader
///
/// Open a `RecordReader` directly from any sequence.
///
/// ```ignore
/// let reader = rows.into_record_reader_with(|m| {
///     m.member(member!(|r: Sample| r.name))?
///         .column("Const", ColumnType::Int32, |_| -1)
/// })?;
/// ```
///

pub trait IntoRecordReader: IntoIterator + Sized {
    /// Reader using the automatic mapping of the item type.
    fn into_record_reader(self) -> RecordReader<Self::Item, Self::IntoIter>
    where
        Self::Item: Record,
    {
        RecordReader::new(self.into_iter(), Columns::automatic())
    }

    /// Reader using the mapping built by `configure`. A configurator that adds
    /// nothing falls back to the automatic mapping.
    fn into_record_reader_with<F>(
        self,
        configure: F,
    ) -> Result<RecordReader<Self::Item, Self::IntoIter>, ReaderError>
    where
        Self::Item: Record,
        F: FnOnce(ColumnSet<Self::Item>) -> Result<ColumnSet<Self::Item>, ReaderError>,
    {
        let columns = configure(ColumnSet::new())?.resolve();

        Ok(RecordReader::new(self.into_iter(), columns))
    }

    /// Reader over an already resolved mapping. Items only need to borrow as
    /// the mapped record type, so `iter()` over a collection works too.
    fn into_record_reader_from<T>(self, columns: Columns<T>) -> RecordReader<T, Self::IntoIter>
    where
        Self::Item: Borrow<T>,
    {
        RecordReader::new(self.into_iter(), columns)
    }
}

impl<S: IntoIterator> IntoRecordReader for S {}
