//! The `GameStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `questlog-store-sqlite`). Higher layers (`questlog-api`,
//! `questlog-server`) depend on this abstraction, not on any concrete
//! backend.
//!
//! All methods return [`crate::Result`]: domain failures (not-found,
//! forbidden, cooldown conflicts) surface as their specific
//! [`crate::Error`] variant, backend failures as
//! [`crate::Error::Storage`]. All futures are `Send` so the trait can be
//! used in multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  Result,
  clan::Clan,
  completion::CompletionRecord,
  task::{NewTask, Task},
  user::{NewUser, User},
  workflow::CompletionResult,
};

/// Abstraction over a Questlog storage backend.
///
/// Completion rows are append-only. `complete_task` is the one compound
/// operation: the implementation must run the whole
/// read–decide–write sequence inside a single atomic transaction so that
/// concurrent attempts for the same (user, task) pair serialize, and the
/// user mutation and the history insert commit together or not at all.
pub trait GameStore: Send + Sync {
  // ── Users ─────────────────────────────────────────────────────────────

  /// Register a new user with starting stats and seed their starter
  /// tasks. Fails with [`crate::Error::HandleTaken`] if the handle is
  /// already registered.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>>> + Send + '_;

  // ── Tasks ─────────────────────────────────────────────────────────────

  /// Create and persist a new task definition.
  fn create_task(
    &self,
    input: NewTask,
  ) -> impl Future<Output = Result<Task>> + Send + '_;

  /// Retrieve a task by id. Returns `None` if not found.
  fn get_task(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Task>>> + Send + '_;

  /// All tasks visible to `user_id`: their own personal tasks, their
  /// clan's tasks, and system tasks.
  fn list_tasks_for(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Task>>> + Send + '_;

  // ── Completion ────────────────────────────────────────────────────────

  /// Complete `task_id` as `user_id`: authorize, enforce the cooldown
  /// policy, apply the reward, and append the completion record — all in
  /// one transaction. No side effect occurs on any failure path.
  fn complete_task(
    &self,
    user_id: Uuid,
    task_id: Uuid,
  ) -> impl Future<Output = Result<CompletionResult>> + Send + '_;

  /// A user's completion history, most recent first.
  fn completions_for(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CompletionRecord>>> + Send + '_;

  // ── Clans (scope membership only) ─────────────────────────────────────

  /// Create a clan. Clan management beyond membership is out of scope;
  /// this exists so clan-scoped tasks have something to point at.
  fn create_clan(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Clan>> + Send + '_;

  /// Add a user to a clan. A user belongs to at most one clan.
  fn add_clan_member(
    &self,
    clan_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;
}
