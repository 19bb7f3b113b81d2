//! Error types for the HTTP boundary and configuration loading

use lambda_http::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Request-shape failures, surfaced before any business rule runs
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("Missing query parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("Invalid value '{value}' for query parameter '{name}'")]
    InvalidParameter { name: &'static str, value: String },

    #[error("No route for {0}")]
    NotFound(String),

    #[error("Method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    #[error("Failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_)
            | ApiError::MissingParameter(_)
            | ApiError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingParameter("period").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("/nope".into()).status(), StatusCode::NOT_FOUND);
        let err = ApiError::MethodNotAllowed { method: "GET".into(), path: "/x".into() };
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_invalid_body_message() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ApiError::from(source);
        assert!(err.to_string().starts_with("Invalid request body"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
