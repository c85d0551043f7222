use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_types::CoreError;
use query::QueryError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid filter: {0}")]
    InvalidFilter(#[from] CoreError),
    #[error("Invalid trade history query: {0}")]
    InvalidQuery(#[from] QueryError),
    #[error("Invalid {name} parameter: {value:?}")]
    InvalidParameter { name: &'static str, value: String },
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Rejected request.");
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
