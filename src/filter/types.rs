use serde_json::{Map, Value};

use crate::database::params::SqlParam;

/// Coerced query-string parameters, keyed by their public names.
pub type FilterParams = Map<String, Value>;

/// Body of a `WHERE` clause whose placeholders run `$1..$n` over `params`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl WhereClause {
    /// Bind the next parameter and return its placeholder.
    pub fn param(&mut self, value: impl Into<SqlParam>) -> String {
        self.params.push(value.into());
        format!("${}", self.params.len())
    }

    /// Append a predicate, joining with `AND` only when one precedes it.
    pub fn and(&mut self, predicate: &str) {
        if !self.sql.is_empty() {
            self.sql.push_str(" AND ");
        }
        self.sql.push_str(predicate);
    }
}

/// `%needle%` pattern for a case-insensitive substring match against `LOWER(col)`.
pub fn contains_pattern(needle: &str) -> String {
    format!("%{}%", needle.to_lowercase())
}
