use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Successful response body keyed by resource name, e.g. `{"company": {...}}`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub key: Option<&'static str>,
    pub data: T,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with `data` under `key`
    pub fn success(key: &'static str, data: T) -> Self {
        Self {
            key: Some(key),
            data,
            status_code: StatusCode::OK,
        }
    }

    /// 201 with `data` under `key`
    pub fn created(key: &'static str, data: T) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            ..Self::success(key, data)
        }
    }

    /// `data` is already an object with its own keys.
    pub fn object(data: T, status_code: StatusCode) -> Self {
        Self {
            key: None,
            data,
            status_code,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return ApiError::internal_server_error("Failed to serialize response data").into_response();
            }
        };

        let body = match self.key {
            Some(key) => {
                let mut envelope = Map::new();
                envelope.insert(key.to_string(), data_value);
                Value::Object(envelope)
            }
            None => data_value,
        };

        (self.status_code, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
