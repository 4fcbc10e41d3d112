//! Column/value builder for single-row partial updates.
//!
//! Turns a sparse map of logical field names to new values into the `SET`
//! fragment of an `UPDATE` plus the values to bind, in the same order:
//!
//! ```text
//! {firstName: "Aliya", age: 32}  =>  "first_name"=$1, "age"=$2   ["Aliya", 32]
//! ```
//!
//! The caller splices the fragment into
//! `UPDATE <table> SET <set_cols> WHERE <key> = $<values.len() + 1>`.

use indexmap::IndexMap;

use crate::database::params::SqlParam;
use crate::models::ModelError;

/// Ordered logical-field → value map; iteration order is insertion order.
pub type FieldUpdates = IndexMap<String, SqlParam>;

/// Logical → physical column names, for fields whose names differ.
pub type ColumnMap = &'static [(&'static str, &'static str)];

#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    pub set_cols: String,
    pub values: Vec<SqlParam>,
}

impl PartialUpdate {
    /// Placeholder position for the row key that follows the assignments.
    pub fn key_index(&self) -> usize {
        self.values.len() + 1
    }
}

pub fn sql_for_partial_update(data: FieldUpdates, js_to_sql: ColumnMap) -> Result<PartialUpdate, ModelError> {
    if data.is_empty() {
        return Err(ModelError::BadRequest("No data".to_string()));
    }

    let mut cols = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());

    for (idx, (field, value)) in data.into_iter().enumerate() {
        let column = physical_name(&field, js_to_sql);
        cols.push(format!("\"{}\"=${}", column, idx + 1));
        values.push(value);
    }

    Ok(PartialUpdate {
        set_cols: cols.join(", "),
        values,
    })
}

fn physical_name<'a>(field: &'a str, js_to_sql: ColumnMap) -> &'a str {
    js_to_sql
        .iter()
        .find(|(logical, _)| *logical == field)
        .map(|(_, physical)| *physical)
        .unwrap_or(field)
}
