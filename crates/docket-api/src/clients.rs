//! Handlers for `/clients` endpoints.
//!
//! | Method   | Path            | Notes |
//! |----------|-----------------|-------|
//! | `GET`    | `/clients`      | Newest first |
//! | `POST`   | `/clients`      | Body: [`NewClient`]; returns 201 |
//! | `GET`    | `/clients/{id}` | 404 if not found |
//! | `PUT`    | `/clients/{id}` | Body: [`ClientUpdate`] |
//! | `DELETE` | `/clients/{id}` | Cases keep their dangling reference |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use docket_core::{
  Entity,
  client::{ClientUpdate, NewClient},
  service::Office,
  store::OfficeStore,
};
use serde_json::{Value, json};

use crate::{auth::Identity, error::ApiError, gated, record_id};

/// `GET /clients`
pub async fn list<S: OfficeStore>(
  State(office): State<Office<S>>,
  Identity(caller): Identity,
) -> Result<Json<Value>, ApiError> {
  let clients = office.list_clients(&caller).await?;
  Ok(Json(json!({ "count": clients.len(), "clients": clients })))
}

/// `POST /clients`
pub async fn create<S: OfficeStore>(
  State(office): State<Office<S>>,
  Identity(caller): Identity,
  body: Result<Json<NewClient>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = gated(&caller, body)?;
  let client = office.create_client(&caller, input).await?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "Client created successfully", "client": client })),
  ))
}

/// `GET /clients/{id}`
pub async fn get_one<S: OfficeStore>(
  State(office): State<Office<S>>,
  Identity(caller): Identity,
  Path(raw): Path<String>,
) -> Result<Json<Value>, ApiError> {
  let id = record_id(&caller, Entity::Client, &raw)?;
  let client = office.get_client(&caller, id).await?;
  Ok(Json(json!({ "client": client })))
}

/// `PUT /clients/{id}`
pub async fn update<S: OfficeStore>(
  State(office): State<Office<S>>,
  Identity(caller): Identity,
  Path(raw): Path<String>,
  body: Result<Json<ClientUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
  let id = record_id(&caller, Entity::Client, &raw)?;
  let Json(update) = gated(&caller, body)?;
  let client = office.update_client(&caller, id, update).await?;
  Ok(Json(json!({ "message": "Client updated successfully", "client": client })))
}

/// `DELETE /clients/{id}`
pub async fn delete<S: OfficeStore>(
  State(office): State<Office<S>>,
  Identity(caller): Identity,
  Path(raw): Path<String>,
) -> Result<Json<Value>, ApiError> {
  let id = record_id(&caller, Entity::Client, &raw)?;
  office.delete_client(&caller, id).await?;
  Ok(Json(json!({ "message": "Client deleted successfully" })))
}
