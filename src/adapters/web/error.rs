//! HTTP error responses for the web adapter.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::error::HousewatchError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl From<HousewatchError> for WebError {
    fn from(err: HousewatchError) -> Self {
        let status = match &err {
            HousewatchError::ConfigParse { .. }
            | HousewatchError::ConfigMissing { .. }
            | HousewatchError::ConfigInvalid { .. } => StatusCode::BAD_REQUEST,
            HousewatchError::FeedUnauthorized | HousewatchError::Feed { .. } => {
                StatusCode::BAD_GATEWAY
            }
            HousewatchError::Database { .. }
            | HousewatchError::DatabaseQuery { .. }
            | HousewatchError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
