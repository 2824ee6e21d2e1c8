//! Read models with weak references resolved.
//!
//! A reference whose target no longer exists resolves to `None` and is
//! serialised as `null`; it never fails the read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  case::{Case, CaseStatus, CaseType, Document, Priority},
  client::{Address, Client},
  identity::User,
};

/// How much of a referenced entity to surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
  /// The columns shown in listings.
  Summary,
  /// Listing columns plus contact details (client address, lawyer phone).
  Full,
}

// ─── Summaries ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
  pub id:    Uuid,
  pub name:  String,
  pub email: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
}

impl UserSummary {
  pub fn of(user: &User, detail: Detail) -> Self {
    Self {
      id:    user.id,
      name:  user.name.clone(),
      email: user.email.clone(),
      phone: match detail {
        Detail::Full => user.phone.clone(),
        Detail::Summary => None,
      },
    }
  }
}

/// Only the author's name is surfaced on notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
  pub id:   Uuid,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
  pub id:         Uuid,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub phone:      String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub address:    Option<Address>,
}

impl ClientSummary {
  pub fn of(client: &Client, detail: Detail) -> Self {
    Self {
      id:         client.id,
      first_name: client.first_name.clone(),
      last_name:  client.last_name.clone(),
      email:      client.email.clone(),
      phone:      client.phone.clone(),
      address:    match detail {
        Detail::Full => client.address.clone(),
        Detail::Summary => None,
      },
    }
  }
}

// ─── Client view ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
  pub id:            Uuid,
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  pub phone:         String,
  pub date_of_birth: Option<NaiveDate>,
  pub id_number:     Option<String>,
  pub address:       Option<Address>,
  pub notes:         Option<String>,
  pub created_by:    Option<UserSummary>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl ClientView {
  pub fn new(client: Client, created_by: Option<UserSummary>) -> Self {
    Self {
      id: client.id,
      first_name: client.first_name,
      last_name: client.last_name,
      email: client.email,
      phone: client.phone,
      date_of_birth: client.date_of_birth,
      id_number: client.id_number,
      address: client.address,
      notes: client.notes,
      created_by,
      created_at: client.created_at,
      updated_at: client.updated_at,
    }
  }
}

// ─── Case view ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteView {
  pub content:  String,
  pub added_by: Option<AuthorSummary>,
  pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseView {
  pub id:                Uuid,
  pub case_number:       String,
  pub title:             String,
  pub description:       String,
  pub client:            Option<ClientSummary>,
  pub assigned_lawyer:   Option<UserSummary>,
  pub case_type:         CaseType,
  pub status:            CaseStatus,
  pub priority:          Priority,
  pub court_name:        Option<String>,
  pub judge_assigned:    Option<String>,
  pub filing_date:       Option<NaiveDate>,
  pub next_hearing_date: Option<NaiveDate>,
  pub closing_date:      Option<NaiveDate>,
  pub billing_amount:    f64,
  pub documents:         Vec<Document>,
  pub notes:             Vec<NoteView>,
  pub created_by:        Option<UserSummary>,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
}

/// The resolved references of one case, gathered by the service.
#[derive(Debug, Default)]
pub struct CaseRefs {
  pub client:          Option<ClientSummary>,
  pub assigned_lawyer: Option<UserSummary>,
  pub created_by:      Option<UserSummary>,
  /// One entry per note, in log order.
  pub note_authors:    Vec<Option<AuthorSummary>>,
}

impl CaseView {
  pub fn new(case: Case, refs: CaseRefs) -> Self {
    let mut authors = refs.note_authors.into_iter();
    let notes = case
      .notes
      .iter()
      .map(|note| NoteView {
        content:  note.content.clone(),
        added_by: authors.next().flatten(),
        added_at: note.added_at,
      })
      .collect();

    Self {
      id: case.id,
      case_number: case.case_number,
      title: case.title,
      description: case.description,
      client: refs.client,
      assigned_lawyer: refs.assigned_lawyer,
      case_type: case.case_type,
      status: case.status,
      priority: case.priority,
      court_name: case.court_name,
      judge_assigned: case.judge_assigned,
      filing_date: case.filing_date,
      next_hearing_date: case.next_hearing_date,
      closing_date: case.closing_date,
      billing_amount: case.billing_amount,
      documents: case.documents,
      notes,
      created_by: refs.created_by,
      created_at: case.created_at,
      updated_at: case.updated_at,
    }
  }
}
