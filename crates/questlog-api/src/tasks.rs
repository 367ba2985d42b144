//! Handlers for `/tasks` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/tasks` | `?user_id` required; tasks visible to that user |
//! | `GET`  | `/tasks/:id` | Single task definition |
//! | `POST` | `/tasks` | Body: [`NewTaskBody`]; returns 201 + stored task |
//! | `POST` | `/tasks/complete` | Body: [`CompleteBody`]; the completion workflow |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use questlog_core::{
  store::GameStore,
  task::{NewTask, Repeat, Task, TaskScope},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Required: the user whose visible tasks to return.
  pub user_id: Uuid,
}

/// `GET /tasks?user_id=<id>`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Task>>, ApiError>
where
  S: GameStore,
{
  let tasks = store.list_tasks_for(params.user_id).await?;
  Ok(Json(tasks))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /tasks/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError>
where
  S: GameStore,
{
  let task = store
    .get_task(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("task {id} not found")))?;
  Ok(Json(task))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /tasks`.
#[derive(Debug, Deserialize)]
pub struct NewTaskBody {
  pub text:         String,
  pub scope:        TaskScope,
  pub repeat:       Repeat,
  #[serde(default)]
  pub reward_exp:   i64,
  #[serde(default)]
  pub reward_coins: i64,
  #[serde(default)]
  pub penalty:      i64,
}

impl From<NewTaskBody> for NewTask {
  fn from(b: NewTaskBody) -> Self {
    NewTask {
      text:         b.text,
      scope:        b.scope,
      repeat:       b.repeat,
      reward_exp:   b.reward_exp,
      reward_coins: b.reward_coins,
      penalty:      b.penalty,
    }
  }
}

/// `POST /tasks` — returns 201 + the stored [`Task`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewTaskBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GameStore,
{
  let task = store.create_task(NewTask::from(body)).await?;
  Ok((StatusCode::CREATED, Json(task)))
}

// ─── Complete ─────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /tasks/complete`.
#[derive(Debug, Deserialize)]
pub struct CompleteBody {
  pub user_id: Uuid,
  pub task_id: Uuid,
}

/// The success payload of `POST /tasks/complete`.
#[derive(Debug, Serialize)]
pub struct CompleteResponse {
  pub success:        bool,
  pub new_level:      i64,
  /// The user's balances after the grant.
  pub exp:            i64,
  pub coins:          i64,
  pub exp_gained:     i64,
  pub coins_gained:   i64,
  pub leveled_up:     bool,
  /// When the task can be completed again, for cooldown tasks.
  pub next_available: Option<DateTime<Utc>>,
}

/// `POST /tasks/complete` — runs the completion workflow.
///
/// 404 if the user or task is unknown, 403 if the task is out of the
/// caller's scope, 409 with a machine-readable reason (and `retry_after`
/// for cooldowns) if the task is not currently completable.
pub async fn complete<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CompleteBody>,
) -> Result<Json<CompleteResponse>, ApiError>
where
  S: GameStore,
{
  let out = store.complete_task(body.user_id, body.task_id).await?;

  Ok(Json(CompleteResponse {
    success:        true,
    new_level:      out.reward.new_level,
    exp:            out.user.exp,
    coins:          out.user.coins,
    exp_gained:     out.reward.exp_gained,
    coins_gained:   out.reward.coins_gained,
    leveled_up:     out.reward.leveled_up,
    next_available: out.record.next_available,
  }))
}
