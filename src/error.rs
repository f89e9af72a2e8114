use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::datasource::{ParseError, SourceError};
use crate::engine::TaxSettingsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    /// The uploaded CSV could not be parsed; nothing was computed.
    #[error("{0}")]
    Unprocessable(String),
    /// An upstream fetch (sample data) failed.
    #[error("Unable to load sample data: {0}")]
    BadGateway(String),
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::Unprocessable(err.to_string())
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::BadGateway(err.to_string())
    }
}

impl From<TaxSettingsError> for AppError {
    fn from(err: TaxSettingsError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        };
        let error_message = match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Unprocessable(msg) => msg,
            other @ AppError::BadGateway(_) => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
