use serde_json::Value;

use super::error::FilterError;
use super::types::{contains_pattern, FilterParams, WhereClause};
use crate::database::params::SqlParam;

pub const COMPANY_FILTER_KEYS: [&str; 3] = ["name", "minEmployees", "maxEmployees"];

/// Build the company search predicate.
///
/// Returns `Ok(None)` when no filter key is present; callers then select
/// without any `WHERE` clause.
pub fn company_filter(params: &FilterParams) -> Result<Option<WhereClause>, FilterError> {
    if let Some(key) = params.keys().find(|k| !COMPANY_FILTER_KEYS.contains(&k.as_str())) {
        return Err(FilterError::UnknownKey(key.clone()));
    }

    let name = params.get("name");
    let min = number_param(params, "minEmployees")?;
    let max = number_param(params, "maxEmployees")?;

    if name.is_none() && min.is_none() && max.is_none() {
        return Ok(None);
    }

    let mut clause = WhereClause::default();

    if let Some(name) = name {
        let pattern = match name {
            Value::String(s) => contains_pattern(s),
            other => contains_pattern(&other.to_string()),
        };
        let placeholder = clause.param(pattern);
        clause.and(&format!("LOWER(name) LIKE {}", placeholder));
    }

    employee_range(&mut clause, min, max)?;

    tracing::debug!(sql = %clause.sql, params = clause.params.len(), "compiled company filter");
    Ok(Some(clause))
}

/// Append the `num_employees` bounds, rejecting an inverted range.
pub fn employee_range(
    clause: &mut WhereClause,
    min: Option<SqlParam>,
    max: Option<SqlParam>,
) -> Result<(), FilterError> {
    if let (Some(lo), Some(hi)) = (&min, &max) {
        let (lo, hi) = (as_f64(lo), as_f64(hi));
        if lo > hi {
            return Err(FilterError::InvertedRange { min: lo, max: hi });
        }
    }

    if let Some(min) = min {
        let placeholder = clause.param(min);
        clause.and(&format!("num_employees >= {}", placeholder));
    }
    if let Some(max) = max {
        let placeholder = clause.param(max);
        clause.and(&format!("num_employees <= {}", placeholder));
    }
    Ok(())
}

fn number_param(params: &FilterParams, key: &str) -> Result<Option<SqlParam>, FilterError> {
    match params.get(key) {
        None => Ok(None),
        Some(Value::Number(n)) => {
            let param = match n.as_i64() {
                Some(i) => SqlParam::Int(i),
                None => SqlParam::Float(n.as_f64().unwrap_or_default()),
            };
            Ok(Some(param))
        }
        Some(_) => Err(FilterError::InvalidValue(key.to_string())),
    }
}

fn as_f64(param: &SqlParam) -> f64 {
    match param {
        SqlParam::Int(i) => *i as f64,
        SqlParam::Float(f) => *f,
        _ => f64::NAN,
    }
}
