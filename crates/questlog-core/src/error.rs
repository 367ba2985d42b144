//! Error types for `questlog-core`.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("handle {0:?} is already registered")]
  HandleTaken(String),

  #[error("task not found: {0}")]
  TaskNotFound(Uuid),

  #[error("clan not found: {0}")]
  ClanNotFound(Uuid),

  #[error("user {user} may not complete task {task}")]
  Forbidden { user: Uuid, task: Uuid },

  #[error("task {0} has already been completed")]
  AlreadyCompleted(Uuid),

  #[error("task is on cooldown until {available_at}")]
  OnCooldown { available_at: DateTime<Utc> },

  /// A backend failure (connection loss, constraint violation, decode
  /// error). The transaction that produced it has been rolled back.
  #[error("storage failure: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
