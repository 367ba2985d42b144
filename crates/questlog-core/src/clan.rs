//! Clan — the scope grouping that may share tasks among its members.
//!
//! Only the membership lookup matters to this crate; clan management
//! (join requests, leadership) lives outside the completion core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named group of users. A user belongs to at most one clan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clan {
  pub clan_id:    Uuid,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}
