use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, Postgres};

/// A value bound to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
}

impl SqlParam {
    /// Map a scalar JSON value onto a bind parameter. Arrays and objects have
    /// no column to land in and are rejected.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(SqlParam::Null),
            Value::Bool(b) => Some(SqlParam::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(SqlParam::Int(i))
                } else {
                    n.as_f64().map(SqlParam::Float)
                }
            }
            Value::String(s) => Some(SqlParam::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value as i64)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        SqlParam::Bool(value)
    }
}

impl From<Decimal> for SqlParam {
    fn from(value: Decimal) -> Self {
        SqlParam::Decimal(value)
    }
}

/// Bind one parameter onto a typed query, in placeholder order.
pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    v: &SqlParam,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        SqlParam::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        SqlParam::Bool(b) => q.bind(*b),
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Float(f) => q.bind(*f),
        SqlParam::Decimal(d) => q.bind(*d),
        SqlParam::Text(s) => q.bind(s.clone()),
    }
}
