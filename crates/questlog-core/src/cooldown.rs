//! The cooldown policy — decides whether a task is currently completable
//! by a given user.
//!
//! Eligibility is recomputed from the latest completion's timestamp plus
//! the task's *current* cooldown. The `next_available` column stored on
//! completion rows is never consulted, so reconfiguring a task's cooldown
//! takes effect immediately.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
  completion::CompletionRecord,
  task::{Repeat, Task},
};

/// Why an attempt was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
  /// One-shot task already completed by this user; never retryable.
  AlreadyCompleted,
  /// The cooldown has not elapsed; retryable at `retry_after`.
  OnCooldown,
}

/// The policy's verdict for one (user, task) attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
  Allowed,
  Denied {
    reason:      DenialReason,
    retry_after: Option<DateTime<Utc>>,
  },
}

/// Decide whether `task` may be completed at `now`, given the most recent
/// completion record for this (user, task) pair.
pub fn check(
  task: &Task,
  last: Option<&CompletionRecord>,
  now:  DateTime<Utc>,
) -> CooldownDecision {
  let Some(last) = last else {
    return CooldownDecision::Allowed;
  };

  match task.repeat {
    Repeat::OneShot => CooldownDecision::Denied {
      reason:      DenialReason::AlreadyCompleted,
      retry_after: None,
    },
    Repeat::Every { cooldown } => {
      // A negative elapsed span (server clock moved backwards) compares
      // below the cooldown and therefore still denies.
      let elapsed = now.signed_duration_since(last.completed_at);
      if elapsed < cooldown {
        CooldownDecision::Denied {
          reason:      DenialReason::OnCooldown,
          retry_after: Some(last.completed_at + cooldown),
        }
      } else {
        CooldownDecision::Allowed
      }
    }
    Repeat::Unlimited => CooldownDecision::Allowed,
  }
}
