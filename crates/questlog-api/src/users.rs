//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Body: [`RegisterBody`]; returns 201 + user, seeds starter tasks |
//! | `GET`  | `/users/:id` | 404 if not found |
//! | `GET`  | `/users/:id/completions` | Completion history, most recent first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use questlog_core::{
  completion::CompletionRecord,
  store::GameStore,
  user::{NewUser, User},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Register ─────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /users`.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub handle:   String,
  pub nickname: String,
}

/// `POST /users` — returns 201 + the stored [`User`].
///
/// Registration also seeds the user's starter tasks; 409 if the handle is
/// already registered.
pub async fn register<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GameStore,
{
  let user = store
    .create_user(NewUser {
      handle:   body.handle,
      nickname: body.nickname,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
  S: GameStore,
{
  let user = store
    .get_user(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(user))
}

// ─── Completion history ───────────────────────────────────────────────────────

/// `GET /users/:id/completions`
pub async fn completions<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<CompletionRecord>>, ApiError>
where
  S: GameStore,
{
  store
    .get_user(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;

  let history = store.completions_for(id).await?;
  Ok(Json(history))
}
