//! Task definitions — the one-shot or repeatable units of work users
//! complete for rewards.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Scope ───────────────────────────────────────────────────────────────────

/// Who a task belongs to. The scope doubles as the authorization rule for
/// completion attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskScope {
  /// Created by a single user; only the owner may complete it.
  Personal { owner: Uuid },
  /// Shared within a clan; any member may complete it.
  Clan { clan_id: Uuid },
  /// Issued by the system; anyone may complete it.
  System,
}

// ─── Repeat ──────────────────────────────────────────────────────────────────

/// How often the same user may complete a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Repeat {
  /// At most once per user, ever.
  OneShot,
  /// Again once `cooldown` has elapsed since the user's last completion.
  Every {
    #[serde(with = "cooldown_secs")]
    cooldown: Duration,
  },
  /// No waiting period.
  Unlimited,
}

impl Repeat {
  /// The configured cooldown, if this repeat mode has one.
  pub fn cooldown(&self) -> Option<Duration> {
    match self {
      Repeat::Every { cooldown } => Some(*cooldown),
      Repeat::OneShot | Repeat::Unlimited => None,
    }
  }
}

/// Cooldowns travel over the wire as a whole number of seconds.
mod cooldown_secs {
  use chrono::Duration;
  use serde::{Deserialize as _, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(d.num_seconds())
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
    let secs = i64::deserialize(d)?;
    if secs < 0 {
      return Err(serde::de::Error::custom("cooldown must be non-negative"));
    }
    Ok(Duration::seconds(secs))
  }
}

// ─── Task ────────────────────────────────────────────────────────────────────

/// A unit of work. Task definitions are immutable apart from their
/// cooldown configuration; completion state lives in the append-only
/// completion log, never on the task row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
  pub task_id:      Uuid,
  pub text:         String,
  pub scope:        TaskScope,
  pub repeat:       Repeat,
  pub reward_exp:   i64,
  pub reward_coins: i64,
  /// Deducted on failure paths; the completion workflow never applies it.
  pub penalty:      i64,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::GameStore::create_task`].
/// `task_id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewTask {
  pub text:         String,
  pub scope:        TaskScope,
  pub repeat:       Repeat,
  pub reward_exp:   i64,
  pub reward_coins: i64,
  pub penalty:      i64,
}

impl NewTask {
  /// Convenience constructor for a zero-penalty task.
  pub fn new(text: impl Into<String>, scope: TaskScope, repeat: Repeat) -> Self {
    Self {
      text: text.into(),
      scope,
      repeat,
      reward_exp: 0,
      reward_coins: 0,
      penalty: 0,
    }
  }
}
