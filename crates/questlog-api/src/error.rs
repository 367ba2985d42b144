//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("conflict: {message}")]
  Conflict {
    message:     String,
    /// Machine-readable discriminant, e.g. `"on_cooldown"`.
    reason:      &'static str,
    /// When the caller may retry, for cooldown conflicts.
    retry_after: Option<DateTime<Utc>>,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<questlog_core::Error> for ApiError {
  fn from(e: questlog_core::Error) -> Self {
    use questlog_core::Error as E;
    match e {
      E::UserNotFound(_) | E::TaskNotFound(_) | E::ClanNotFound(_) => {
        ApiError::NotFound(e.to_string())
      }
      E::Forbidden { .. } => ApiError::Forbidden(e.to_string()),
      E::HandleTaken(_) => ApiError::Conflict {
        message:     e.to_string(),
        reason:      "handle_taken",
        retry_after: None,
      },
      E::AlreadyCompleted(_) => ApiError::Conflict {
        message:     e.to_string(),
        reason:      "already_completed",
        retry_after: None,
      },
      E::OnCooldown { available_at } => ApiError::Conflict {
        message:     e.to_string(),
        reason:      "on_cooldown",
        retry_after: Some(available_at),
      },
      E::Storage(inner) => ApiError::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Forbidden(m) => {
        (StatusCode::FORBIDDEN, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Conflict { message, reason, retry_after } => (
        StatusCode::CONFLICT,
        Json(json!({
          "error":       message,
          "reason":      reason,
          "retry_after": retry_after,
        })),
      )
        .into_response(),
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response(),
    }
  }
}
