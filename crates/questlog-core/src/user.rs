//! User — the mutable balance/level record the reward ledger operates on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered player.
///
/// `level`, `exp`, `coins`, and `max_hp` only ever move upward, and only
/// through the reward ledger. Users are never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  /// Unique external identity (e.g. a messenger account id).
  pub handle:     String,
  pub nickname:   String,
  pub level:      i64,
  pub exp:        i64,
  pub coins:      i64,
  pub hp:         i64,
  pub max_hp:     i64,
  pub created_at: DateTime<Utc>,
  /// Server-assigned; bumped by every ledger grant.
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::GameStore::create_user`].
/// Ids, timestamps, and starting stats are always set by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub handle:   String,
  pub nickname: String,
}
