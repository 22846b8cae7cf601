use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::Result;

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

/// Either the full record or `{"error": ...}`, never both.
pub fn outcome<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(data) => success(data).into_response(),
        Err(err) => err.into_response(),
    }
}
