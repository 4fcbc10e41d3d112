//! Request payload schemas.
//!
//! Bodies and coerced query parameters are deserialized into these structs
//! (unknown keys rejected) and then checked with `validator`; both failures
//! surface as a 400 listing every message.

use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::error::ApiError;
use crate::filter::FilterParams;

pub mod company;
pub mod job;
pub mod user;

pub use company::{CompanySearch, CompanyUpdate, NewCompany};
pub use job::{JobSearch, JobUpdate, NewJob};
pub use user::{NewUser, UserAuth, UserRegister, UserUpdate};

/// Validate coerced search parameters against a schema without consuming
/// them; the filter compilers work from the same map afterwards.
pub fn validate_params<T>(params: &FilterParams) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    let schema: T = serde_json::from_value(Value::Object(params.clone()))
        .map_err(|e| ApiError::validation_error(vec![e.to_string()]))?;
    schema.validate()?;
    Ok(schema)
}
