use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::database::{FieldUpdates, SqlParam};

/// `POST /jobs`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    #[validate(length(min = 1))]
    pub title: String,

    #[validate(range(min = 0))]
    pub salary: Option<i32>,

    #[validate(custom(function = "validate_equity"))]
    pub equity: Option<Decimal>,

    #[validate(length(min = 1, max = 25))]
    pub company_handle: String,
}

/// `PATCH /jobs/:id`; neither the id nor the owning company can change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    #[validate(length(min = 1))]
    pub title: Option<String>,

    #[validate(range(min = 0))]
    pub salary: Option<i32>,

    #[validate(custom(function = "validate_equity"))]
    pub equity: Option<Decimal>,
}

impl JobUpdate {
    pub fn into_updates(self) -> FieldUpdates {
        let mut updates = FieldUpdates::new();
        if let Some(v) = self.title {
            updates.insert("title".into(), SqlParam::from(v));
        }
        if let Some(v) = self.salary {
            updates.insert("salary".into(), SqlParam::from(v));
        }
        if let Some(v) = self.equity {
            updates.insert("equity".into(), SqlParam::from(v));
        }
        updates
    }
}

/// `GET /jobs` query parameters, after coercion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobSearch {
    #[validate(length(min = 1))]
    pub title: Option<String>,

    #[validate(range(min = 0))]
    pub min_salary: Option<i64>,

    pub has_equity: Option<bool>,
}

/// Equity is a fraction of the company: 0 through 1 inclusive.
fn validate_equity(equity: &Decimal) -> Result<(), ValidationError> {
    if equity.is_sign_negative() || *equity > Decimal::ONE {
        let mut error = ValidationError::new("equity");
        error.message = Some("must be between 0 and 1".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equity_accepts_decimal_strings() {
        let job: NewJob = serde_json::from_value(json!({
            "title": "J",
            "equity": "0.05",
            "companyHandle": "c1"
        }))
        .unwrap();
        assert!(job.validate().is_ok());
        assert_eq!(job.equity, Some(Decimal::new(5, 2)));
    }

    #[test]
    fn equity_above_one_fails() {
        let job = JobUpdate { equity: Some(Decimal::new(15, 1)), ..Default::default() };
        assert!(job.validate().is_err());
    }

    #[test]
    fn update_rejects_company_handle() {
        assert!(serde_json::from_value::<JobUpdate>(json!({"companyHandle": "c2"})).is_err());
        assert!(serde_json::from_value::<JobUpdate>(json!({"id": 3})).is_err());
    }

    #[test]
    fn search_rejects_unknown_keys() {
        assert!(serde_json::from_value::<JobSearch>(json!({"nope": 1})).is_err());
        assert!(serde_json::from_value::<JobSearch>(json!({"hasEquity": true, "minSalary": 10})).is_ok());
    }
}
