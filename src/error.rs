// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::forum::ForumError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "forbidden", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "conflict", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = code;
        self
    }
}

impl From<ForumError> for ApiError {
    fn from(err: ForumError) -> Self {
        let message = err.to_string();
        match err {
            ForumError::InvalidCredentials => {
                ApiError::unauthorized(message).with_code("invalid_credentials")
            }
            ForumError::DuplicateLogin(_) => ApiError::conflict(message).with_code("duplicate_login"),
            ForumError::DuplicateTopic => ApiError::conflict(message).with_code("duplicate_topic"),
            ForumError::NotFound { .. } => ApiError::not_found(message),
            ForumError::Unauthorized { .. } => ApiError::forbidden(message).with_code("not_author"),
            ForumError::InvalidStatus(_) => ApiError::bad_request(message).with_code("invalid_status"),
            ForumError::Validation(_) => ApiError::bad_request(message).with_code("validation_error"),
            ForumError::PasswordHash(_) | ForumError::Store(_) => {
                tracing::error!(error = %message, "Internal error while handling request");
                ApiError::internal("Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.code.to_string(),
        });
        (self.status, body).into_response()
    }
}
