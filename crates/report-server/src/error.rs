//! Error types for the report service

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Result type for page rendering
pub type Result<T> = std::result::Result<T, PageError>;

/// Errors that can occur while loading or rendering pages
#[derive(Error, Debug)]
pub enum PageError {
    /// Template not registered
    #[error("Template '{name}' not found: {detail}")]
    TemplateNotFound { name: String, detail: String },

    /// Template parsing failed
    #[error("Failed to parse template '{name}': {detail}")]
    TemplateParseFailed { name: String, detail: String },

    /// Template rendering failed
    #[error("Failed to render template '{name}': {detail}")]
    RenderError { name: String, detail: String },

    /// File loading error
    #[error("Failed to load template file '{path}': {detail}")]
    FileLoadError { path: String, detail: String },
}

/// Invalid server settings
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Error body of the JSON API: `{"detail": "..."}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::BadRequest(detail) | Self::NotFound(detail) | Self::Internal(detail) => detail,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status() {
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_response_status() {
        let response = ApiError::NotFound("Ticker 'ABC' não encontrado.".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_page_error_display() {
        let err = PageError::TemplateNotFound {
            name: "relatorio.html".to_string(),
            detail: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "Template 'relatorio.html' not found: missing");
    }
}
