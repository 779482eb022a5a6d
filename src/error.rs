//! Error types shared by the content layer and the content API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// A content item that does not match its collection schema
#[derive(Debug, Error)]
#[error("Invalid entry `{entry}` in collection `{collection}`: {message}")]
pub struct SchemaError {
    pub collection: String,
    pub entry: String,
    pub message: String,
}

impl SchemaError {
    pub fn new(
        collection: impl Into<String>,
        entry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            entry: entry.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while loading a collection
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Unexpected response from {url}: {message}")]
    Response { url: String, message: String },
}

/// Errors returned by the content API, rendered as JSON error bodies
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "ValidationError",
            ApiError::NotFound => "NotFoundError",
            ApiError::Internal(_) => "InternalServerError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("API error: {}", self);
        }
        let body = json!({
            "data": null,
            "error": {
                "status": status.as_u16(),
                "name": self.name(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}
