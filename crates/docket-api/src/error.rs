//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, QueryRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use docket_core::{Entity, Error};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] Error),

  /// The request body was not JSON of the expected shape.
  #[error("malformed body: {0}")]
  MalformedBody(String),

  #[error("malformed query: {0}")]
  MalformedQuery(String),

  /// A path segment that cannot be an identifier of any record.
  #[error("{entity} not found: {raw:?}")]
  UnknownId { entity: Entity, raw: String },
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::MalformedBody(rejection.body_text())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    Self::MalformedQuery(rejection.body_text())
  }
}

fn noun(entity: Entity) -> &'static str {
  match entity {
    Entity::User => "User",
    Entity::Client => "Client",
    Entity::Case => "Case",
  }
}

fn message(status: StatusCode, message: impl Into<String>) -> Response {
  (status, Json(json!({ "message": message.into() }))).into_response()
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Core(Error::Unauthorized) => {
        let mut res = message(StatusCode::UNAUTHORIZED, "Authentication required");
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"docket\""),
        );
        res
      }
      ApiError::Core(Error::Validation(errors)) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
      }
      ApiError::Core(Error::NotFound { entity, .. })
      | ApiError::UnknownId { entity, .. } => {
        message(StatusCode::NOT_FOUND, format!("{} not found", noun(entity)))
      }
      ApiError::Core(Error::Conflict(msg)) => message(StatusCode::CONFLICT, msg),
      ApiError::Core(Error::Store(e)) => {
        tracing::error!(error = %e, "store failure");
        message(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
      }
      ApiError::MalformedBody(msg) | ApiError::MalformedQuery(msg) => {
        message(StatusCode::BAD_REQUEST, msg)
      }
    }
  }
}
