//! The reward ledger — applies a task's reward deltas to a user record.
//!
//! The ledger mutates the caller's copy of the user and nothing else.
//! Persisting the updated record is the caller's responsibility, which
//! keeps this logic storage-agnostic and unit-testable in isolation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{leveling::LevelCurve, task::Task, user::User};

/// What a single grant did to the user.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RewardResult {
  pub exp_gained:   i64,
  pub coins_gained: i64,
  pub new_level:    i64,
  pub new_balance:  i64,
  pub leveled_up:   bool,
}

/// Apply `task`'s reward to `user` in place.
///
/// Experience and level/HP growth are delegated to `curve`; coins are
/// added directly. Negative reward configuration is treated as zero —
/// the ledger never decreases a balance.
pub fn grant(
  user:  &mut User,
  task:  &Task,
  curve: &LevelCurve,
  now:   DateTime<Utc>,
) -> RewardResult {
  let exp_before = user.exp;
  let coins_before = user.coins;

  let p = curve.apply_experience(user.level, user.exp, user.max_hp, task.reward_exp);
  user.level = p.level;
  user.exp = p.exp;
  user.max_hp = p.max_hp;
  user.coins += task.reward_coins.max(0);
  user.updated_at = now;

  RewardResult {
    exp_gained:   user.exp - exp_before,
    coins_gained: user.coins - coins_before,
    new_level:    user.level,
    new_balance:  user.coins,
    leveled_up:   p.levels_gained > 0,
  }
}
