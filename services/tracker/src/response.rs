//! Response envelope shared by every endpoint

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// `{success, message, data}` wrapper around every API payload
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying `data`
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Failed response without data
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

impl ApiResponse<()> {
    /// Successful response with `data: null`
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Envelope paired with a status code
pub struct Envelope<T: Serialize>(pub StatusCode, pub ApiResponse<T>);

impl<T: Serialize> Envelope<T> {
    /// 200 OK with data
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self(StatusCode::OK, ApiResponse::success(data, message))
    }

    /// 201 Created with data
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self(StatusCode::CREATED, ApiResponse::success(data, message))
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}
