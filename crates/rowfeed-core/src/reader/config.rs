use crate::error::ReaderError;
use serde::Deserialize;

///
/// MissingRowPolicy
///
/// What value reads return when the reader has no current row: before the
/// first `advance`, after exhaustion, or after `close`.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MissingRowPolicy {
    /// Fail with `ReaderError::NoCurrentRow`.
    #[default]
    Error,

    /// Return the declared type's zero value (`Null` for dynamic columns).
    TypeDefault,
}

///
/// NameMatch
///
/// Comparison used when resolving a column name to its ordinal.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum NameMatch {
    #[default]
    Exact,

    /// ASCII case-insensitive; the lowest ordinal wins on collisions.
    IgnoreAsciiCase,
}

///
/// ReaderConfig
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    pub missing_row: MissingRowPolicy,
    pub name_match: NameMatch,
}

impl ReaderConfig {
    /// Parse a config table such as:
    ///
    /// ```toml
    /// missing_row = "type_default"
    /// name_match = "ignore_ascii_case"
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ReaderError> {
        toml::from_str(source).map_err(|err| ReaderError::Config {
            message: err.to_string(),
        })
    }

    #[must_use]
    pub const fn with_missing_row(mut self, policy: MissingRowPolicy) -> Self {
        self.missing_row = policy;
        self
    }

    #[must_use]
    pub const fn with_name_match(mut self, name_match: NameMatch) -> Self {
        self.name_match = name_match;
        self
    }
}
