use crate::{
    column::{Column, Getter},
    error::ReaderError,
    traits::FieldValue,
    value::ColumnType,
};
use std::{fmt, sync::Arc};

///
/// MemberRef
///
/// A member-reference column, captured by [`member!`](crate::member).
///
/// Holds the source text of the closure body next to a typed accessor.
/// The text is checked when the reference is added to a `ColumnSet`: only a
/// direct member access rooted at the closure parameter (`r.field`, or a
/// chain such as `r.inner.field`) is accepted, and the column takes the name
/// of the last member.
///

pub struct MemberRef<T> {
    param: &'static str,
    body: &'static str,
    column_type: ColumnType,
    getter: Getter<T>,
}

impl<T: 'static> MemberRef<T> {
    #[doc(hidden)]
    #[must_use]
    pub fn new<F>(param: &'static str, body: &'static str, accessor: fn(&T) -> &F) -> Self
    where
        F: FieldValue + 'static,
    {
        Self {
            param,
            body,
            column_type: F::column_type(),
            getter: Arc::new(move |record: &T| accessor(record).to_value()),
        }
    }

    pub(super) fn into_column(self) -> Result<Column<T>, ReaderError> {
        let name = member_name(self.param, self.body)?;

        Ok(Column::from_parts(
            name.to_string(),
            self.column_type,
            self.getter,
        ))
    }
}

impl<T> MemberRef<T> {
    /// Source text of the referenced expression.
    #[must_use]
    pub const fn body(&self) -> &'static str {
        self.body
    }

    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }
}

impl<T> fmt::Debug for MemberRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberRef")
            .field("param", &self.param)
            .field("body", &self.body)
            .field("column_type", &self.column_type)
            .finish_non_exhaustive()
    }
}

// Last member identifier of `body`, when `body` is `param.member(.member)*`.
fn member_name<'a>(param: &str, body: &'a str) -> Result<&'a str, ReaderError> {
    let not_member = || {
        ReaderError::invalid_argument(format!(
            "expected a member expression on '{param}', found '{body}'"
        ))
    };

    let mut expr = body.trim();
    while let Some(inner) = expr.strip_prefix('(').and_then(|e| e.strip_suffix(')')) {
        expr = inner.trim();
    }

    let mut segments = expr.split('.').map(str::trim);
    if segments.next() != Some(param) {
        return Err(not_member());
    }

    let mut last = None;
    for segment in segments {
        if !is_identifier(segment) {
            return Err(not_member());
        }
        last = Some(segment);
    }

    last.map(|name| name.strip_prefix("r#").unwrap_or(name))
        .ok_or_else(not_member)
}

fn is_identifier(segment: &str) -> bool {
    let segment = segment.strip_prefix("r#").unwrap_or(segment);
    let mut chars = segment.chars();

    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
        && segment != "_"
}

///
/// member
///
/// Build a [`MemberRef`] from a closure-like member access:
///
/// ```ignore
/// ColumnSet::new().member(member!(|d: Sample| d.string_field))?
/// ```
///
/// The column is named after the member and typed after its declared field
/// type. Bodies that are not a direct member access are rejected when the
/// reference is added to a set.
///

#[macro_export]
macro_rules! member {
    (|$param:ident : $record:ty| $body:expr) => {
        $crate::column::MemberRef::<$record>::new(
            stringify!($param),
            stringify!($body),
            |$param: &$record| {
                let _ = $param;
                &$body
            },
        )
    };
}
