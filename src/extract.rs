//! Request extractors that fail with the API error envelope.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use validator::Validate;

use crate::error::ApiError;
use crate::filter::{coerce_query_params, FilterParams};

/// JSON body that has been deserialized and then checked with `validator`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        data.validate()?;
        Ok(Self(data))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    match rejection {
        // unknown or mistyped fields; keep serde's message so the client sees which
        JsonRejection::JsonDataError(e) => ApiError::validation_error(vec![e.body_text()]),
        other => ApiError::bad_request(other.body_text()),
    }
}

/// Query string with numeric and boolean strings coerced to JSON values.
#[derive(Debug, Clone, Default)]
pub struct SearchParams(pub FilterParams);

#[async_trait]
impl<S> FromRequestParts<S> for SearchParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        Ok(Self(coerce_query_params(raw)))
    }
}

/// Integer `:id` route parameter; anything else is a bad request.
#[derive(Debug, Clone, Copy)]
pub struct JobId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for JobId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        let raw = params.get("id").map(String::as_str).unwrap_or_default();
        parse_id(raw).map(Self)
    }
}

pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::bad_request(format!("Invalid job id: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    #[serde(deny_unknown_fields)]
    struct Payload {
        #[validate(length(min = 3))]
        name: String,
    }

    fn json_request(body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let ValidatedJson(payload) = ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"acme"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.name, "acme");
    }

    #[tokio::test]
    async fn rule_failures_are_validation_errors() {
        let err = ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"a"}"#), &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(ref messages) if messages.len() == 1));
    }

    #[tokio::test]
    async fn unknown_fields_and_bad_json_are_rejected() {
        let err = ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"acme","x":1}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);

        let err = ValidatedJson::<Payload>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("").is_err());
    }
}
