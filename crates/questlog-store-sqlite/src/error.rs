//! Error type for `questlog-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] questlog_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored discriminant or column combination that no longer decodes.
  #[error("decode error: {0}")]
  Decode(String),
}

/// Collapse into the core taxonomy at the [`GameStore`] boundary: domain
/// errors pass through, everything else becomes `Storage`.
///
/// [`GameStore`]: questlog_core::store::GameStore
impl From<Error> for questlog_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(c) => c,
      other => questlog_core::Error::Storage(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
