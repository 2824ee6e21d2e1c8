//! HTTP Basic credential resolution.
//!
//! Requests carry `Authorization: Basic base64(email:password)`. Resolution
//! never rejects on bad credentials: anything short of a verified password
//! yields [`Caller::Anonymous`], and the gate inside every [`Office`]
//! operation turns that into a 401.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use docket_core::{
  identity::{Caller, User},
  service::Office,
  store::OfficeStore,
};
use serde_json::json;
use tracing::debug;

use crate::error::ApiError;

/// The resolved caller of a request.
pub struct Identity(pub Caller);

/// `(email, password)` from a well-formed Basic header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let encoded = value.strip_prefix("Basic ")?;
  let decoded = B64.decode(encoded.trim()).ok()?;
  let creds = String::from_utf8(decoded).ok()?;
  let (email, password) = creds.split_once(':')?;
  Some((email.to_owned(), password.to_owned()))
}

fn password_matches(password: &str, hash: &str) -> bool {
  PasswordHash::new(hash)
    .is_ok_and(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Resolve the acting identity from request headers.
///
/// Only a store failure during the lookup is an error.
pub async fn resolve_caller<S: OfficeStore>(
  headers: &HeaderMap,
  office: &Office<S>,
) -> Result<Caller, ApiError> {
  let Some((email, password)) = basic_credentials(headers) else {
    return Ok(Caller::Anonymous);
  };

  let found: Option<(User, String)> = office
    .store()
    .user_credentials(&email)
    .await
    .map_err(|e| ApiError::Core(e.into()))?;

  Ok(match found {
    Some((user, hash)) if password_matches(&password, &hash) => Caller::Authenticated(user),
    _ => {
      debug!("credentials rejected");
      Caller::Anonymous
    }
  })
}

impl<S> FromRequestParts<Office<S>> for Identity
where
  S: OfficeStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    office: &Office<S>,
  ) -> Result<Self, Self::Rejection> {
    resolve_caller(&parts.headers, office).await.map(Identity)
  }
}

/// `GET /me`
pub async fn me<S: OfficeStore>(
  State(office): State<Office<S>>,
  Identity(caller): Identity,
) -> Result<Json<serde_json::Value>, ApiError> {
  let user = office.whoami(&caller)?;
  Ok(Json(json!({ "user": user })))
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::http::HeaderValue;

  fn headers(value: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    map
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  #[test]
  fn parses_basic_header() {
    let creds = basic_credentials(&headers(&basic("grace@example.com", "s3:cret")));
    assert_eq!(
      creds,
      Some(("grace@example.com".to_owned(), "s3:cret".to_owned()))
    );
  }

  #[test]
  fn rejects_malformed_headers() {
    assert_eq!(basic_credentials(&HeaderMap::new()), None);
    assert_eq!(basic_credentials(&headers("Bearer abc")), None);
    assert_eq!(basic_credentials(&headers("Basic !!!not-base64!!!")), None);
    let no_colon = format!("Basic {}", B64.encode("grace"));
    assert_eq!(basic_credentials(&headers(&no_colon)), None);
  }

  #[test]
  fn garbage_hash_never_matches() {
    assert!(!password_matches("secret", "not-a-phc-string"));
  }
}
