//! Error types for `docket-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::validate::FieldError;

/// The kinds of entity an identifier can fail to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
  User,
  Client,
  Case,
}

impl std::fmt::Display for Entity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Self::User => "user",
      Self::Client => "client",
      Self::Case => "case",
    })
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// No acting identity could be established for the call.
  #[error("unauthorized")]
  Unauthorized,

  #[error("validation failed: {}", field_list(.0))]
  Validation(Vec<FieldError>),

  #[error("{entity} not found: {id}")]
  NotFound { entity: Entity, id: Uuid },

  #[error("{0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(entity: Entity, id: Uuid) -> Self {
    Self::NotFound { entity, id }
  }

  /// Wrap any backend failure as an opaque store error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

fn field_list(errors: &[FieldError]) -> String {
  errors
    .iter()
    .map(|e| e.field.as_str())
    .collect::<Vec<_>>()
    .join(", ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
