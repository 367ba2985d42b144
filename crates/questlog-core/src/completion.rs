//! Completion records — the append-only log of successful task
//! completions. One row per completion event; rows are never updated
//! or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One successful completion of a task by a user, with the reward that
/// was actually granted at the time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
  pub completion_id:  Uuid,
  pub user_id:        Uuid,
  pub task_id:        Uuid,
  /// Server-assigned; never changes after creation.
  pub completed_at:   DateTime<Utc>,
  /// `completed_at + cooldown` at write time, for cooldown tasks.
  /// Informational only — the cooldown gate recomputes eligibility from
  /// `completed_at` and the task's current cooldown, so this value can go
  /// stale when a task is reconfigured.
  pub next_available: Option<DateTime<Utc>>,
  pub exp_granted:    i64,
  pub coins_granted:  i64,
}
