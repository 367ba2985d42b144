//! The completion workflow — the decision pipeline a store runs inside
//! its transaction before committing a completion.
//!
//! Everything here is pure: the store resolves the user, the task, the
//! latest completion row, and scope membership, calls [`evaluate`], and
//! then persists the result (updated user + new completion row) as one
//! atomic unit. If any precondition fails, nothing is written.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  completion::CompletionRecord,
  cooldown::{self, CooldownDecision, DenialReason},
  error::{Error, Result},
  ledger::{self, RewardResult},
  leveling::LevelCurve,
  task::{Task, TaskScope},
  user::User,
};

/// A successful evaluation: the post-reward user, the new completion row,
/// and the reward summary. The first two must be committed together.
#[derive(Debug, Clone)]
pub struct CompletionResult {
  pub user:   User,
  pub record: CompletionRecord,
  pub reward: RewardResult,
}

/// Check that `user` may complete `task` at all.
///
/// `caller_in_scope` is the answer from the membership lookup and is only
/// consulted for clan-scoped tasks.
pub fn authorize(user: &User, task: &Task, caller_in_scope: bool) -> Result<()> {
  let allowed = match task.scope {
    TaskScope::Personal { owner } => owner == user.user_id,
    TaskScope::Clan { .. } => caller_in_scope,
    TaskScope::System => true,
  };

  if allowed {
    Ok(())
  } else {
    Err(Error::Forbidden {
      user: user.user_id,
      task: task.task_id,
    })
  }
}

/// Run the full precondition pipeline and compute the post-completion
/// state: authorization, cooldown gate, reward grant, completion row.
pub fn evaluate(
  user:            &User,
  task:            &Task,
  last:            Option<&CompletionRecord>,
  caller_in_scope: bool,
  curve:           &LevelCurve,
  now:             DateTime<Utc>,
) -> Result<CompletionResult> {
  authorize(user, task, caller_in_scope)?;

  match cooldown::check(task, last, now) {
    CooldownDecision::Allowed => {}
    CooldownDecision::Denied { reason: DenialReason::AlreadyCompleted, .. } => {
      return Err(Error::AlreadyCompleted(task.task_id));
    }
    CooldownDecision::Denied { reason: DenialReason::OnCooldown, retry_after } => {
      // OnCooldown denials always carry a retry-after timestamp.
      return Err(Error::OnCooldown {
        available_at: retry_after.unwrap_or(now),
      });
    }
  }

  let mut user = user.clone();
  let reward = ledger::grant(&mut user, task, curve, now);

  let next_available = task.repeat.cooldown().map(|cooldown| now + cooldown);

  let record = CompletionRecord {
    completion_id: Uuid::new_v4(),
    user_id: user.user_id,
    task_id: task.task_id,
    completed_at: now,
    next_available,
    exp_granted: reward.exp_gained,
    coins_granted: reward.coins_gained,
  };

  Ok(CompletionResult { user, record, reward })
}
