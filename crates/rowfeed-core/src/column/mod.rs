//! Column descriptors and the mapping resolver.
//!
//! A `ColumnSet` is the mutable, building form of a mapping. Freezing it
//! (`resolve` / `freeze`) consumes the set and yields `Columns`, the immutable
//! ordered descriptor array a reader walks. Empty sets resolve to the cached
//! automatic mapping of a `Record` type.

mod cache;
mod member;


use crate::{
    error::ReaderError,
    traits::{FieldValue, Record},
    value::{ColumnType, Value},
};
use derive_more::Deref;
use std::{fmt, sync::Arc};

// re-exports
pub use member::MemberRef;

/// Shared value-extraction function of one column.
pub type Getter<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;

///
/// Column
///
/// One mapped column: name, declared type, and the getter evaluated against
/// a record at read time.
///

pub struct Column<T> {
    name: String,
    column_type: ColumnType,
    getter: Getter<T>,
}

impl<T: 'static> Column<T> {
    /// Build an explicit column. Fails if `name` is empty or blank.
    ///
    /// `column_type` is reported as declared and is not checked against the
    /// values `getter` produces; it also picks the zero value returned under
    /// `MissingRowPolicy::TypeDefault`.
    pub fn new<G, V>(
        name: impl Into<String>,
        column_type: ColumnType,
        getter: G,
    ) -> Result<Self, ReaderError>
    where
        G: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ReaderError::invalid_argument(
                "column name cannot be empty or blank",
            ));
        }

        Ok(Self {
            name,
            column_type,
            getter: Arc::new(move |record: &T| getter(record).into()),
        })
    }

    /// Column backed by a direct field read. Used by `#[derive(Record)]`.
    #[doc(hidden)]
    #[must_use]
    pub fn from_field<F>(name: &'static str, accessor: fn(&T) -> &F) -> Self
    where
        F: FieldValue + 'static,
    {
        Self {
            name: name.to_string(),
            column_type: F::column_type(),
            getter: Arc::new(move |record: &T| accessor(record).to_value()),
        }
    }

    pub(crate) fn from_parts(name: String, column_type: ColumnType, getter: Getter<T>) -> Self {
        Self {
            name,
            column_type,
            getter,
        }
    }
}

impl<T> Column<T> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Evaluate the getter against `record`.
    #[must_use]
    pub fn value(&self, record: &T) -> Value {
        (self.getter)(record)
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            column_type: self.column_type,
            getter: Arc::clone(&self.getter),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("column_type", &self.column_type)
            .finish_non_exhaustive()
    }
}

///
/// Columns
///
/// Frozen, ordered, name-unique descriptor array.
/// Cheap to clone; shared between readers and the automatic-mapping cache.
///

#[derive(Deref)]
#[deref(forward)]
pub struct Columns<T>(Arc<[Column<T>]>);

impl<T: Record> Columns<T> {
    /// Automatic mapping of `T`, built on first use and cached for the
    /// lifetime of the process.
    #[must_use]
    pub fn automatic() -> Self {
        cache::automatic::<T>()
    }
}

impl<T> Columns<T> {
    fn from_vec(columns: Vec<Column<T>>) -> Self {
        Self(columns.into())
    }

    /// Position of the column named `name`; linear scan.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|column| column.name == name)
    }

    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Column<T>> {
        self.0.iter().find(|column| column.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(Column::name)
    }
}

impl<T> Clone for Columns<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Columns<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

///
/// ColumnSet
///
/// Mapping under construction. Columns are kept in insertion order and
/// names must be unique; the first duplicate is rejected.
///

pub struct ColumnSet<T> {
    columns: Vec<Column<T>>,
}

impl<T> ColumnSet<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column.name == name)
    }

    /// Append a prebuilt column.
    pub fn push(&mut self, column: Column<T>) -> Result<&mut Self, ReaderError> {
        if self.contains(&column.name) {
            return Err(ReaderError::invalid_argument(format!(
                "column name {} is already mapped",
                column.name
            )));
        }

        self.columns.push(column);

        Ok(self)
    }

    /// Freeze a non-empty set.
    /// Types without an automatic mapping cannot fall back to one, so an
    /// empty set is an error here.
    pub fn freeze(self) -> Result<Columns<T>, ReaderError> {
        if self.columns.is_empty() {
            return Err(ReaderError::invalid_argument(
                "column set is empty and the record type has no automatic mapping",
            ));
        }

        Ok(Columns::from_vec(self.columns))
    }
}

impl<T: 'static> ColumnSet<T> {
    /// Append an explicit `(name, type, getter)` column. The declared type
    /// is taken as given; see [`Column::new`].
    pub fn add<G, V>(
        &mut self,
        name: impl Into<String>,
        column_type: ColumnType,
        getter: G,
    ) -> Result<&mut Self, ReaderError>
    where
        G: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        self.push(Column::new(name, column_type, getter)?)
    }

    /// Append a column derived from a member reference; see [`member!`](crate::member).
    pub fn add_member(&mut self, member: MemberRef<T>) -> Result<&mut Self, ReaderError> {
        self.push(member.into_column()?)
    }

    /// Builder form of [`Self::add`].
    pub fn column<G, V>(
        mut self,
        name: impl Into<String>,
        column_type: ColumnType,
        getter: G,
    ) -> Result<Self, ReaderError>
    where
        G: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        self.add(name, column_type, getter)?;

        Ok(self)
    }

    /// Builder form of [`Self::add_member`].
    pub fn member(mut self, member: MemberRef<T>) -> Result<Self, ReaderError> {
        self.add_member(member)?;

        Ok(self)
    }
}

impl<T: Record> ColumnSet<T> {
    /// Freeze this set, or fall back to `T`'s automatic mapping when nothing
    /// was added.
    #[must_use]
    pub fn resolve(self) -> Columns<T> {
        if self.columns.is_empty() {
            Columns::automatic()
        } else {
            Columns::from_vec(self.columns)
        }
    }
}

impl<T> Default for ColumnSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ColumnSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}
