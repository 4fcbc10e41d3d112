use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::database::{FieldUpdates, SqlParam};

/// `POST /companies`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    #[validate(length(min = 1, max = 25), custom(function = "validate_handle"))]
    pub handle: String,

    #[validate(length(min = 1))]
    pub name: String,

    pub description: String,

    #[validate(range(min = 0))]
    pub num_employees: Option<i32>,

    #[validate(url)]
    pub logo_url: Option<String>,
}

/// `PATCH /companies/:handle`; the handle itself cannot change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub num_employees: Option<i32>,

    #[validate(url)]
    pub logo_url: Option<String>,
}

impl CompanyUpdate {
    /// Supplied fields only, under their public names.
    pub fn into_updates(self) -> FieldUpdates {
        let mut updates = FieldUpdates::new();
        if let Some(v) = self.name {
            updates.insert("name".into(), SqlParam::from(v));
        }
        if let Some(v) = self.description {
            updates.insert("description".into(), SqlParam::from(v));
        }
        if let Some(v) = self.num_employees {
            updates.insert("numEmployees".into(), SqlParam::from(v));
        }
        if let Some(v) = self.logo_url {
            updates.insert("logoUrl".into(), SqlParam::from(v));
        }
        updates
    }
}

/// `GET /companies` query parameters, after coercion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanySearch {
    #[validate(length(min = 1))]
    pub name: Option<String>,

    #[validate(range(min = 0))]
    pub min_employees: Option<i64>,

    #[validate(range(min = 0))]
    pub max_employees: Option<i64>,
}

/// Handles are stored lowercase only.
fn validate_handle(handle: &str) -> Result<(), ValidationError> {
    if handle.chars().any(char::is_uppercase) {
        let mut error = ValidationError::new("handle");
        error.message = Some("must be lowercase".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::error::ApiError;

    #[test]
    fn update_keeps_field_order_and_skips_absent() {
        let update = CompanyUpdate {
            name: Some("New".into()),
            num_employees: Some(10),
            ..Default::default()
        };
        let keys: Vec<String> = update.into_updates().keys().cloned().collect();
        assert_eq!(keys, vec!["name", "numEmployees"]);
    }

    #[test]
    fn update_rejects_handle() {
        let parsed = serde_json::from_value::<CompanyUpdate>(json!({"handle": "nope"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn new_company_validates_fields() {
        let company: NewCompany = serde_json::from_value(json!({
            "handle": "new",
            "name": "New",
            "description": "desc",
            "numEmployees": -1,
            "logoUrl": "not-a-url"
        }))
        .unwrap();
        let errors = company.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn new_company_rejects_uppercase_handle() {
        let company: NewCompany = serde_json::from_value(json!({
            "handle": "PC2",
            "name": "Upper",
            "description": "d"
        }))
        .unwrap();
        let errors = company.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
        assert!(ApiError::from(errors).message().contains("lowercase"));

        let lower = NewCompany {
            handle: "pc2".into(),
            ..company
        };
        assert!(lower.validate().is_ok());
    }

    #[test]
    fn search_rejects_numeric_name() {
        // "123" arrives coerced to a number and fails the string schema
        let parsed = serde_json::from_value::<CompanySearch>(json!({"name": 123}));
        assert!(parsed.is_err());
    }
}
