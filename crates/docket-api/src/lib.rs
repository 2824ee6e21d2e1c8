//! JSON REST API for Docket.
//!
//! Exposes an axum [`Router`] over an [`Office`] backed by any
//! [`docket_core::store::OfficeStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", docket_api::api_router(office.clone()))
//! ```

pub mod auth;
pub mod cases;
pub mod clients;
pub mod error;

use axum::{
  Router,
  routing::{get, post},
};
use docket_core::{Entity, identity::Caller, service::Office, store::OfficeStore};
use uuid::Uuid;

pub use error::ApiError;

/// Build a fully-materialised API router for `office`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(office: Office<S>) -> Router<()>
where
  S: OfficeStore + 'static,
{
  Router::new()
    // Clients
    .route("/clients", get(clients::list::<S>).post(clients::create::<S>))
    .route(
      "/clients/{id}",
      get(clients::get_one::<S>)
        .put(clients::update::<S>)
        .delete(clients::delete::<S>),
    )
    // Cases
    .route("/cases", get(cases::list::<S>).post(cases::create::<S>))
    .route("/cases/stats/overview", get(cases::stats::<S>))
    .route(
      "/cases/{id}",
      get(cases::get_one::<S>)
        .put(cases::update::<S>)
        .delete(cases::delete::<S>),
    )
    .route("/cases/{id}/notes", post(cases::add_note::<S>))
    // Identity
    .route("/me", get(auth::me::<S>))
    .with_state(office)
}

/// Surface an input error only to callers past the gate, so anonymous
/// requests are always answered with 401.
pub(crate) fn gated<T, E>(caller: &Caller, input: Result<T, E>) -> Result<T, ApiError>
where
  E: Into<ApiError>,
{
  input.or_else(|err| {
    caller.require()?;
    Err(err.into())
  })
}

/// Parse a record id from the path. A segment that is not a UUID cannot
/// name any record.
pub(crate) fn record_id(caller: &Caller, entity: Entity, raw: &str) -> Result<Uuid, ApiError> {
  gated(
    caller,
    Uuid::parse_str(raw).map_err(|_| ApiError::UnknownId { entity, raw: raw.to_owned() }),
  )
}
