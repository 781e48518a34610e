use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::DomainError;

/// Everything a handler can fail with, mapped onto an HTTP status and a
/// JSON error body.
#[derive(Debug)]
pub enum AppError {
    Domain(DomainError),
    Unauthorized,
    Internal(&'static str),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Domain(DomainError::Validation(_))
            | Self::Domain(DomainError::MalformedSubmission(_)) => StatusCode::BAD_REQUEST,
            Self::Domain(DomainError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Domain(DomainError::Forbidden(_)) => StatusCode::FORBIDDEN,
            Self::Domain(DomainError::StateConflict(_)) => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Domain(err) => err.to_string(),
            Self::Unauthorized => "Authentication required.".to_owned(),
            Self::Internal(context) => (*context).to_owned(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({
            "status": "error",
            "message": self.message(),
        });
        (self.status(), Json(body)).into_response()
    }
}

/// Log-and-convert adapter for fallible storage calls inside handlers.
pub trait ResultExt<T> {
    fn reject(self, context: &'static str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject(self, context: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{context}: {e}");
            AppError::Internal(context)
        })
    }
}
