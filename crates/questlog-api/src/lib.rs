//! JSON REST API for Questlog.
//!
//! Exposes an axum [`Router`] backed by any
//! [`questlog_core::store::GameStore`]. Identity is taken on trust —
//! callers are assumed to be authenticated upstream; transport and TLS
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", questlog_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod tasks;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use questlog_core::store::GameStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: GameStore + 'static,
{
  Router::new()
    // Users
    .route("/users", post(users::register::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    .route("/users/{id}/completions", get(users::completions::<S>))
    // Tasks
    .route("/tasks", get(tasks::list::<S>).post(tasks::create::<S>))
    .route("/tasks/complete", post(tasks::complete::<S>))
    .route("/tasks/{id}", get(tasks::get_one::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
