//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! width, so that lexical order is chronological order. Calendar dates are
//! `YYYY-MM-DD`. Enumerations use their exact wire spelling. Structured
//! fields (address, documents) are stored as compact JSON. UUIDs are stored
//! as hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use docket_core::{
  case::{Case, Document, Note},
  client::{Address, Client},
  identity::User,
  reference::Ref,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_ref<T>(s: &str) -> Result<Ref<T>> { decode_uuid(s).map(Ref::new) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

// ─── Enumerations ────────────────────────────────────────────────────────────

pub fn decode_enum<T>(s: &str) -> Result<T>
where
  T: FromStr<Err = String>,
{
  s.parse().map_err(Error::Decode)
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_address(a: &Address) -> Result<String> { Ok(serde_json::to_string(a)?) }

pub fn encode_documents(docs: &[Document]) -> Result<String> {
  Ok(serde_json::to_string(docs)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub name:       String,
  pub email:      String,
  pub role:       String,
  pub phone:      Option<String>,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         decode_uuid(&self.user_id)?,
      name:       self.name,
      email:      self.email,
      role:       decode_enum(&self.role)?,
      phone:      self.phone,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `clients` row.
pub struct RawClient {
  pub client_id:     String,
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  pub phone:         String,
  pub date_of_birth: Option<String>,
  pub id_number:     Option<String>,
  pub address_json:  Option<String>,
  pub notes:         Option<String>,
  pub created_by:    String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawClient {
  pub fn into_client(self) -> Result<Client> {
    let address = self
      .address_json
      .as_deref()
      .map(serde_json::from_str::<Address>)
      .transpose()?;

    Ok(Client {
      id: decode_uuid(&self.client_id)?,
      first_name: self.first_name,
      last_name: self.last_name,
      email: self.email,
      phone: self.phone,
      date_of_birth: decode_opt_date(self.date_of_birth)?,
      id_number: self.id_number,
      address,
      notes: self.notes,
      created_by: decode_ref(&self.created_by)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `case_notes` row.
pub struct RawNote {
  pub content:  String,
  pub added_by: String,
  pub added_at: String,
}

impl RawNote {
  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      content:  self.content,
      added_by: decode_ref(&self.added_by)?,
      added_at: decode_dt(&self.added_at)?,
    })
  }
}

/// Raw strings read directly from a `cases` row.
pub struct RawCase {
  pub case_id:           String,
  pub case_number:       String,
  pub title:             String,
  pub description:       String,
  pub client_id:         String,
  pub assigned_lawyer:   String,
  pub case_type:         String,
  pub status:            String,
  pub priority:          String,
  pub court_name:        Option<String>,
  pub judge_assigned:    Option<String>,
  pub filing_date:       Option<String>,
  pub next_hearing_date: Option<String>,
  pub closing_date:      Option<String>,
  pub billing_amount:    f64,
  pub documents_json:    String,
  pub created_by:        String,
  pub created_at:        String,
  pub updated_at:        String,
}

impl RawCase {
  /// Assemble the case with its note log, given in log order.
  pub fn into_case(self, notes: Vec<RawNote>) -> Result<Case> {
    let notes = notes
      .into_iter()
      .map(RawNote::into_note)
      .collect::<Result<_>>()?;
    let documents: Vec<Document> = serde_json::from_str(&self.documents_json)?;

    Ok(Case {
      id: decode_uuid(&self.case_id)?,
      case_number: self.case_number,
      title: self.title,
      description: self.description,
      client: decode_ref(&self.client_id)?,
      assigned_lawyer: decode_ref(&self.assigned_lawyer)?,
      case_type: decode_enum(&self.case_type)?,
      status: decode_enum(&self.status)?,
      priority: decode_enum(&self.priority)?,
      court_name: self.court_name,
      judge_assigned: self.judge_assigned,
      filing_date: decode_opt_date(self.filing_date)?,
      next_hearing_date: decode_opt_date(self.next_hearing_date)?,
      closing_date: decode_opt_date(self.closing_date)?,
      billing_amount: self.billing_amount,
      documents,
      notes,
      created_by: decode_ref(&self.created_by)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

// ─── Write-side rows ─────────────────────────────────────────────────────────

/// Column values for writing a `clients` row, owned so they can move onto
/// the database thread.
pub struct ClientRow {
  pub client_id:     String,
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  pub phone:         String,
  pub date_of_birth: Option<String>,
  pub id_number:     Option<String>,
  pub address_json:  Option<String>,
  pub notes:         Option<String>,
  pub created_by:    String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl ClientRow {
  pub fn encode(client: &Client) -> Result<Self> {
    Ok(Self {
      client_id:     encode_uuid(client.id),
      first_name:    client.first_name.clone(),
      last_name:     client.last_name.clone(),
      email:         client.email.clone(),
      phone:         client.phone.clone(),
      date_of_birth: client.date_of_birth.map(encode_date),
      id_number:     client.id_number.clone(),
      address_json:  client.address.as_ref().map(encode_address).transpose()?,
      notes:         client.notes.clone(),
      created_by:    encode_uuid(client.created_by.id()),
      created_at:    encode_dt(client.created_at),
      updated_at:    encode_dt(client.updated_at),
    })
  }
}

/// Column values for writing a `cases` row. Notes live in their own table.
pub struct CaseRow {
  pub case_id:           String,
  pub case_number:       String,
  pub title:             String,
  pub description:       String,
  pub client_id:         String,
  pub assigned_lawyer:   String,
  pub case_type:         &'static str,
  pub status:            &'static str,
  pub priority:          &'static str,
  pub court_name:        Option<String>,
  pub judge_assigned:    Option<String>,
  pub filing_date:       Option<String>,
  pub next_hearing_date: Option<String>,
  pub closing_date:      Option<String>,
  pub billing_amount:    f64,
  pub documents_json:    String,
  pub created_by:        String,
  pub created_at:        String,
  pub updated_at:        String,
}

impl CaseRow {
  pub fn encode(case: &Case) -> Result<Self> {
    Ok(Self {
      case_id:           encode_uuid(case.id),
      case_number:       case.case_number.clone(),
      title:             case.title.clone(),
      description:       case.description.clone(),
      client_id:         encode_uuid(case.client.id()),
      assigned_lawyer:   encode_uuid(case.assigned_lawyer.id()),
      case_type:         case.case_type.as_str(),
      status:            case.status.as_str(),
      priority:          case.priority.as_str(),
      court_name:        case.court_name.clone(),
      judge_assigned:    case.judge_assigned.clone(),
      filing_date:       case.filing_date.map(encode_date),
      next_hearing_date: case.next_hearing_date.map(encode_date),
      closing_date:      case.closing_date.map(encode_date),
      billing_amount:    case.billing_amount,
      documents_json:    encode_documents(&case.documents)?,
      created_by:        encode_uuid(case.created_by.id()),
      created_at:        encode_dt(case.created_at),
      updated_at:        encode_dt(case.updated_at),
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let whole = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let later = whole + chrono::Duration::microseconds(500_000);
    let (a, b) = (encode_dt(whole), encode_dt(later));
    assert_eq!(a.len(), b.len());
    assert!(a < b);
    assert_eq!(decode_dt(&b).unwrap(), later);
  }

  #[test]
  fn unknown_enum_spelling_is_a_decode_error() {
    let err = decode_enum::<docket_core::case::CaseStatus>("Archived").unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
  }
}
