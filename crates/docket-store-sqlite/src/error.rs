//! Error type for `docket-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored enum column held a spelling this build does not know.
  #[error("decode error: {0}")]
  Decode(String),

  #[error("case number {0:?} already exists")]
  DuplicateCaseNumber(String),

  #[error("a user with email {0:?} already exists")]
  DuplicateEmail(String),
}

/// Uniqueness violations are conflicts; everything else is opaque to callers.
impl From<Error> for docket_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::DuplicateCaseNumber(_) | Error::DuplicateEmail(_) => {
        docket_core::Error::Conflict(err.to_string())
      }
      other => docket_core::Error::store(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
