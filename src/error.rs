use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Maximum 10 requests per minute.";

// Failure from one of the outbound mail transports
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0} transport is not configured")]
    NotConfigured(&'static str),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("smtp error: {0}")]
    Smtp(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl From<lettre::address::AddressError> for TransportError {
    fn from(e: lettre::address::AddressError) -> Self {
        TransportError::InvalidAddress(e.to_string())
    }
}

impl From<lettre::error::Error> for TransportError {
    fn from(e: lettre::error::Error) -> Self {
        TransportError::Build(e.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for TransportError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        TransportError::Smtp(e.to_string())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Http(e.to_string())
    }
}

// Everything that can be returned to an HTTP client
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,

    #[error("validation failed")]
    Validation(BTreeMap<&'static str, &'static str>),

    #[error("malformed request body: {0}")]
    BadRequest(String),

    #[error("failed to send email via {method}")]
    Transport {
        method: &'static str,
        #[source]
        source: TransportError,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": RATE_LIMIT_MESSAGE })),
            )
                .into_response(),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "Validation failed",
                    "status": "error",
                    "errors": errors,
                })),
            )
                .into_response(),
            AppError::BadRequest(reason) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": reason,
                    "status": "error",
                })),
            )
                .into_response(),
            AppError::Transport { method, source } => {
                // cause stays in the logs, the client only learns which transport failed
                tracing::error!(method, error = %source, "email dispatch failed");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "message": format!("Failed to send email via {method}"),
                        "status": "error",
                        "method": method,
                    })),
                )
                    .into_response()
            }
        }
    }
}
