//! Unified Error Handling
//!
//! Every API endpoint answers with the same envelope:
//! `{success, message, data?, details?}`. Logical failures (validation,
//! authorization, remote rejection) are HTTP 200 with `success: false`;
//! the status code never carries the outcome. `AppError` is the single
//! boundary converting any unhandled error into that envelope.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use monitor_client::ClientError;
use serde::Serialize;
use shared::BulkReport;
use tracing::error;

/// Uniform API response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T = ()> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BulkDetails>,
}

/// Per-id accounting attached to bulk responses
#[derive(Debug, Serialize)]
pub struct BulkDetails {
    pub success_count: usize,
    pub failed_count: usize,
    pub failed_items: Vec<u64>,
}

impl From<&BulkReport> for BulkDetails {
    fn from(report: &BulkReport) -> Self {
        Self {
            success_count: report.success,
            failed_count: report.failed,
            failed_items: report.errors.clone(),
        }
    }
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad tag/id input, rejected before any remote call
    #[error("{0}")]
    Validation(String),

    /// Could not authenticate against the remote platform
    #[error("Authorization error")]
    Unauthorized,

    /// Requested object does not exist on the remote platform
    #[error("{0}")]
    NotFound(String),

    /// Remote platform call failed (transport or API error)
    #[error("Cannot retrieve data from the monitoring API")]
    Upstream(String),

    /// Anything unexpected
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn upstream(e: ClientError) -> Self {
        match e {
            ClientError::Auth(_) => AppError::Unauthorized,
            ClientError::Validation(msg) => AppError::Validation(msg),
            ClientError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Unauthorized => "Authorization error".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Upstream(detail) => {
                error!(target: "upstream", error = %detail, "Remote API call failed");
                "Cannot retrieve data from the monitoring API".to_string()
            }
            AppError::Internal(detail) => {
                error!(target: "internal", error = %detail, "Internal error occurred");
                "Internal server error".to_string()
            }
        };

        Json(ApiResponse::<()> {
            success: false,
            message,
            data: None,
            details: None,
        })
        .into_response()
    }
}

/// Application-level Result type for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;

// ========== Helper constructors ==========

/// Successful response with a message only
pub fn ok_message(message: impl Into<String>) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success: true,
        message: message.into(),
        data: None,
        details: None,
    })
}

/// Successful response carrying data
pub fn ok_data<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: "Success".to_string(),
        data: Some(data),
        details: None,
    })
}

/// Logical failure (HTTP 200, success=false)
pub fn fail(message: impl Into<String>) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success: false,
        message: message.into(),
        data: None,
        details: None,
    })
}

/// Bulk outcome: always `success: true` with per-id accounting attached
pub fn bulk_outcome(message: String, report: &BulkReport) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success: true,
        message,
        data: None,
        details: Some(BulkDetails::from(report)),
    })
}
