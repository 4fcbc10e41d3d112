use serde_json::Value;

use super::types::{contains_pattern, FilterParams, WhereClause};
use crate::database::params::SqlParam;

/// Build the job search predicate from `title`, `minSalary` and `hasEquity`.
///
/// Keys outside that set are ignored; request validation rejects them
/// before this point. Returns `None` for the unfiltered path: no title, no
/// minimum salary and `hasEquity` false or absent.
pub fn job_filter(params: &FilterParams) -> Option<WhereClause> {
    let title = params.get("title");
    let min_salary = params.get("minSalary").and_then(SqlParam::from_json);
    let has_equity = matches!(params.get("hasEquity"), Some(Value::Bool(true)));

    if title.is_none() && min_salary.is_none() && !has_equity {
        return None;
    }

    let mut clause = WhereClause::default();

    if let Some(title) = title {
        let pattern = match title {
            Value::String(s) => contains_pattern(s),
            other => contains_pattern(&other.to_string()),
        };
        let placeholder = clause.param(pattern);
        clause.and(&format!("LOWER(title) LIKE {}", placeholder));
    }

    if let Some(min_salary) = min_salary {
        let placeholder = clause.param(min_salary);
        clause.and(&format!("salary >= {}", placeholder));
    }

    if has_equity {
        clause.and("equity != '0'");
    }

    tracing::debug!(sql = %clause.sql, params = clause.params.len(), "compiled job filter");
    Some(clause)
}
