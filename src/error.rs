use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::cache::StoreError;
use crate::sink::SinkError;

pub const MSG_RATE_LIMITED: &str = "Terlalu banyak percobaan gagal. Coba lagi setelah sesaat.";
pub const MSG_BAD_CREDENTIAL: &str = "Kode akses salah.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("too many login attempts")]
    RateLimited,
    #[error("wrong access key")]
    BadCredential,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Validation(String),
    #[error("file too large")]
    PayloadTooLarge,
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("not found")]
    NotFound,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn json_error(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn plain_text(status: StatusCode, body: &'static str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

/// 通用 500 响应，不暴露内部信息
pub fn internal_error_response() -> Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::Validation(err.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::RateLimited => plain_text(StatusCode::TOO_MANY_REQUESTS, MSG_RATE_LIMITED),
            AppError::BadCredential => plain_text(StatusCode::UNAUTHORIZED, MSG_BAD_CREDENTIAL),
            AppError::Store(e) => {
                tracing::error!("key-value store failure: {}", e);
                internal_error_response()
            }
            AppError::Validation(message) => json_error(StatusCode::BAD_REQUEST, message),
            AppError::PayloadTooLarge => json_error(StatusCode::PAYLOAD_TOO_LARGE, "file too large"),
            AppError::Sink(e) => {
                tracing::error!("record sink failure: {}", e);
                json_error(StatusCode::BAD_GATEWAY, "upstream service failed")
            }
            AppError::NotFound => json_error(StatusCode::NOT_FOUND, "not found"),
        }
    }
}
