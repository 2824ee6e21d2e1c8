//! Handlers for `/cases` endpoints.
//!
//! | Method   | Path                    | Notes |
//! |----------|-------------------------|-------|
//! | `GET`    | `/cases`                | Optional `?status=&caseType=&priority=`, all must match |
//! | `POST`   | `/cases`                | Body: [`NewCase`]; returns 201, 409 on a taken case number |
//! | `GET`    | `/cases/stats/overview` | Aggregation over every case |
//! | `GET`    | `/cases/{id}`           | Client address and lawyer phone included |
//! | `PUT`    | `/cases/{id}`           | Body: [`CaseUpdate`]; notes cannot be changed here |
//! | `POST`   | `/cases/{id}/notes`     | Body: `{"content":"..."}` |
//! | `DELETE` | `/cases/{id}`           | Removes the case and its notes |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use docket_core::{
  Entity,
  case::{CaseFilter, CaseUpdate, NewCase},
  service::Office,
  stats::CaseStats,
  store::OfficeStore,
  validate::Checklist,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{auth::Identity, error::ApiError, gated, record_id};

// ─── List ─────────────────────────────────────────────────────────────────────

/// Raw filter values; an empty string imposes no constraint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub status:    Option<String>,
  pub case_type: Option<String>,
  pub priority:  Option<String>,
}

impl ListParams {
  /// Fails with a validation error naming every unrecognised value.
  pub fn into_filter(self) -> docket_core::Result<CaseFilter> {
    let mut check = Checklist::new();
    let filter = CaseFilter {
      status:    check.parse("status", self.status.as_deref()),
      case_type: check.parse("caseType", self.case_type.as_deref()),
      priority:  check.parse("priority", self.priority.as_deref()),
    };
    check.finish()?;
    Ok(filter)
  }
}

/// `GET /cases[?status=...][&caseType=...][&priority=...]`
pub async fn list<S: OfficeStore>(
  State(office): State<Office<S>>,
  Identity(caller): Identity,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
  let Query(params) = gated(&caller, params)?;
  let filter = gated(&caller, params.into_filter())?;
  let cases = office.list_cases(&caller, &filter).await?;
  Ok(Json(json!({ "count": cases.len(), "cases": cases })))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /cases`
pub async fn create<S: OfficeStore>(
  State(office): State<Office<S>>,
  Identity(caller): Identity,
  body: Result<Json<NewCase>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = gated(&caller, body)?;
  let case = office.create_case(&caller, input).await?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "message": "Case created successfully", "case": case })),
  ))
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /cases/{id}`
pub async fn get_one<S: OfficeStore>(
  State(office): State<Office<S>>,
  Identity(caller): Identity,
  Path(raw): Path<String>,
) -> Result<Json<Value>, ApiError> {
  let id = record_id(&caller, Entity::Case, &raw)?;
  let case = office.get_case(&caller, id).await?;
  Ok(Json(json!({ "case": case })))
}

/// `GET /cases/stats/overview`
pub async fn stats<S: OfficeStore>(
  State(office): State<Office<S>>,
  Identity(caller): Identity,
) -> Result<Json<CaseStats>, ApiError> {
  Ok(Json(office.stats(&caller).await?))
}

// ─── Mutations ────────────────────────────────────────────────────────────────

/// `PUT /cases/{id}`
pub async fn update<S: OfficeStore>(
  State(office): State<Office<S>>,
  Identity(caller): Identity,
  Path(raw): Path<String>,
  body: Result<Json<CaseUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
  let id = record_id(&caller, Entity::Case, &raw)?;
  let Json(update) = gated(&caller, body)?;
  let case = office.update_case(&caller, id, update).await?;
  Ok(Json(json!({ "message": "Case updated successfully", "case": case })))
}

#[derive(Debug, Deserialize)]
pub struct NoteBody {
  #[serde(default)]
  pub content: String,
}

/// `POST /cases/{id}/notes`
pub async fn add_note<S: OfficeStore>(
  State(office): State<Office<S>>,
  Identity(caller): Identity,
  Path(raw): Path<String>,
  body: Result<Json<NoteBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
  let id = record_id(&caller, Entity::Case, &raw)?;
  let Json(NoteBody { content }) = gated(&caller, body)?;
  let case = office.add_note(&caller, id, content).await?;
  Ok(Json(json!({ "message": "Note added successfully", "case": case })))
}

/// `DELETE /cases/{id}`
pub async fn delete<S: OfficeStore>(
  State(office): State<Office<S>>,
  Identity(caller): Identity,
  Path(raw): Path<String>,
) -> Result<Json<Value>, ApiError> {
  let id = record_id(&caller, Entity::Case, &raw)?;
  office.delete_case(&caller, id).await?;
  Ok(Json(json!({ "message": "Case deleted successfully" })))
}

#[cfg(test)]
mod tests {
  use docket_core::case::{CaseStatus, CaseType, Priority};

  use super::*;

  fn params(status: &str, case_type: &str, priority: &str) -> ListParams {
    ListParams {
      status:    Some(status.to_owned()),
      case_type: Some(case_type.to_owned()),
      priority:  Some(priority.to_owned()),
    }
  }

  #[test]
  fn empty_values_impose_no_constraint() {
    assert_eq!(params("", "", "").into_filter().unwrap(), CaseFilter::default());
    assert_eq!(ListParams::default().into_filter().unwrap(), CaseFilter::default());
  }

  #[test]
  fn exact_spellings_parse() {
    let filter = params("In Progress", "Real Estate", "Urgent").into_filter().unwrap();
    assert_eq!(filter.status, Some(CaseStatus::InProgress));
    assert_eq!(filter.case_type, Some(CaseType::RealEstate));
    assert_eq!(filter.priority, Some(Priority::Urgent));
  }

  #[test]
  fn unknown_values_are_reported_per_field() {
    let Err(docket_core::Error::Validation(errors)) =
      params("open", "Civil", "Critical").into_filter()
    else {
      panic!("expected validation error");
    };
    let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, ["status", "priority"]);
  }
}
