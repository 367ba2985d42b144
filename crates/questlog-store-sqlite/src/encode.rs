//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated
//! lowercase strings. Task scope and repeat mode are stored as a
//! discriminant column plus the variant's payload columns.

use chrono::{DateTime, Duration, Utc};
use questlog_core::{
  completion::CompletionRecord,
  task::{Repeat, Task, TaskScope},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── TaskScope ───────────────────────────────────────────────────────────────

/// Split a scope into its `(scope, owner_id, clan_id)` columns.
pub fn encode_scope(scope: TaskScope) -> (&'static str, Option<String>, Option<String>) {
  match scope {
    TaskScope::Personal { owner } => ("personal", Some(encode_uuid(owner)), None),
    TaskScope::Clan { clan_id } => ("clan", None, Some(encode_uuid(clan_id))),
    TaskScope::System => ("system", None, None),
  }
}

pub fn decode_scope(
  kind:     &str,
  owner_id: Option<&str>,
  clan_id:  Option<&str>,
) -> Result<TaskScope> {
  match kind {
    "personal" => {
      let owner = owner_id
        .ok_or_else(|| Error::Decode("personal task without owner_id".into()))?;
      Ok(TaskScope::Personal { owner: decode_uuid(owner)? })
    }
    "clan" => {
      let clan = clan_id
        .ok_or_else(|| Error::Decode("clan task without clan_id".into()))?;
      Ok(TaskScope::Clan { clan_id: decode_uuid(clan)? })
    }
    "system" => Ok(TaskScope::System),
    other => Err(Error::Decode(format!("unknown task scope: {other:?}"))),
  }
}

// ─── Repeat ──────────────────────────────────────────────────────────────────

/// Split a repeat mode into its `(repeat, cooldown_secs)` columns.
pub fn encode_repeat(repeat: Repeat) -> (&'static str, Option<i64>) {
  match repeat {
    Repeat::OneShot => ("one_shot", None),
    Repeat::Every { cooldown } => ("every", Some(cooldown.num_seconds())),
    Repeat::Unlimited => ("unlimited", None),
  }
}

pub fn decode_repeat(kind: &str, cooldown_secs: Option<i64>) -> Result<Repeat> {
  match kind {
    "one_shot" => Ok(Repeat::OneShot),
    "every" => {
      let secs = cooldown_secs
        .ok_or_else(|| Error::Decode("repeat 'every' without cooldown_secs".into()))?;
      Ok(Repeat::Every { cooldown: Duration::seconds(secs) })
    }
    "unlimited" => Ok(Repeat::Unlimited),
    other => Err(Error::Decode(format!("unknown repeat mode: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub handle:     String,
  pub nickname:   String,
  pub level:      i64,
  pub exp:        i64,
  pub coins:      i64,
  pub hp:         i64,
  pub max_hp:     i64,
  pub created_at: String,
  pub updated_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      handle:     self.handle,
      nickname:   self.nickname,
      level:      self.level,
      exp:        self.exp,
      coins:      self.coins,
      hp:         self.hp,
      max_hp:     self.max_hp,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `tasks` row.
pub struct RawTask {
  pub task_id:       String,
  pub text:          String,
  pub scope:         String,
  pub owner_id:      Option<String>,
  pub clan_id:       Option<String>,
  pub repeat:        String,
  pub cooldown_secs: Option<i64>,
  pub reward_exp:    i64,
  pub reward_coins:  i64,
  pub penalty:       i64,
  pub created_at:    String,
}

impl RawTask {
  pub fn into_task(self) -> Result<Task> {
    Ok(Task {
      task_id:      decode_uuid(&self.task_id)?,
      text:         self.text,
      scope:        decode_scope(
        &self.scope,
        self.owner_id.as_deref(),
        self.clan_id.as_deref(),
      )?,
      repeat:       decode_repeat(&self.repeat, self.cooldown_secs)?,
      reward_exp:   self.reward_exp,
      reward_coins: self.reward_coins,
      penalty:      self.penalty,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `completions` row.
pub struct RawCompletion {
  pub completion_id:  String,
  pub user_id:        String,
  pub task_id:        String,
  pub completed_at:   String,
  pub next_available: Option<String>,
  pub exp_granted:    i64,
  pub coins_granted:  i64,
}

impl RawCompletion {
  pub fn into_completion(self) -> Result<CompletionRecord> {
    Ok(CompletionRecord {
      completion_id:  decode_uuid(&self.completion_id)?,
      user_id:        decode_uuid(&self.user_id)?,
      task_id:        decode_uuid(&self.task_id)?,
      completed_at:   decode_dt(&self.completed_at)?,
      next_available: self.next_available.as_deref().map(decode_dt).transpose()?,
      exp_granted:    self.exp_granted,
      coins_granted:  self.coins_granted,
    })
  }
}
