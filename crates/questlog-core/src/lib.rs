//! Core types and trait definitions for the Questlog gamification backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod clan;
pub mod completion;
pub mod cooldown;
pub mod error;
pub mod ledger;
pub mod leveling;
pub mod store;
pub mod task;
pub mod user;
pub mod workflow;

pub use error::{Error, Result};
