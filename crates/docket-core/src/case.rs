//! Case records, their enumerations, documents, and the append-only note log.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  client::Client,
  identity::User,
  patch::{self, apply},
  reference::Ref,
  validate::Checklist,
};

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Declares a closed string enumeration whose wire spelling is exact
/// (including spaces) and whose declaration order is its sort order.
macro_rules! spelled_enum {
  (
    $(#[$meta:meta])*
    $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
  ) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    pub enum $name {
      $($(#[$vmeta])* #[serde(rename = $text)] $variant,)+
    }

    impl $name {
      pub fn as_str(self) -> &'static str {
        match self {
          $(Self::$variant => $text,)+
        }
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
      }
    }

    impl FromStr for $name {
      type Err = String;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
          $($text => Ok(Self::$variant),)+
          other => Err(format!(
            concat!("unknown ", stringify!($name), ": {:?}"),
            other
          )),
        }
      }
    }
  };
}

spelled_enum! {
  /// The area of law a case falls under.
  CaseType {
    Criminal => "Criminal",
    Civil => "Civil",
    Family => "Family",
    Corporate => "Corporate",
    RealEstate => "Real Estate",
    Immigration => "Immigration",
    IntellectualProperty => "Intellectual Property",
    Labor => "Labor",
    Tax => "Tax",
    Other => "Other",
  }
}

spelled_enum! {
  /// Where a case stands.
  #[derive(Default)]
  CaseStatus {
    #[default]
    Open => "Open",
    InProgress => "In Progress",
    Pending => "Pending",
    Closed => "Closed",
    Won => "Won",
    Lost => "Lost",
    Settled => "Settled",
  }
}

spelled_enum! {
  #[derive(Default)]
  Priority {
    Low => "Low",
    #[default]
    Medium => "Medium",
    High => "High",
    Urgent => "Urgent",
  }
}

// ─── Documents ───────────────────────────────────────────────────────────────

/// A reference to a document kept elsewhere; only the URL is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
  pub name:        String,
  pub url:         String,
  pub uploaded_at: DateTime<Utc>,
}

/// A document as supplied by a caller; `uploadedAt` defaults to now.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
  #[serde(default)]
  pub name:        String,
  #[serde(default)]
  pub url:         String,
  pub uploaded_at: Option<DateTime<Utc>>,
}

impl DocumentInput {
  pub fn into_document(self, now: DateTime<Utc>) -> Document {
    Document {
      name:        self.name,
      url:         self.url,
      uploaded_at: self.uploaded_at.unwrap_or(now),
    }
  }
}

fn documents(inputs: Vec<DocumentInput>, now: DateTime<Utc>) -> Vec<Document> {
  inputs.into_iter().map(|d| d.into_document(now)).collect()
}

// ─── Notes ───────────────────────────────────────────────────────────────────

/// A timestamped, attributed entry in a case's note log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
  pub content:  String,
  pub added_by: Ref<User>,
  pub added_at: DateTime<Utc>,
}

/// An ordered log of notes.
///
/// Entries cannot be removed, edited, or reordered; new ones are appended
/// by [`crate::store::OfficeStore::append_note`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteLog(Vec<Note>);

impl NoteLog {
  pub fn new() -> Self { Self::default() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn iter(&self) -> std::slice::Iter<'_, Note> { self.0.iter() }
}

/// Rehydrates a log from storage, preserving order.
impl FromIterator<Note> for NoteLog {
  fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

impl<'a> IntoIterator for &'a NoteLog {
  type Item = &'a Note;
  type IntoIter = std::slice::Iter<'a, Note>;

  fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

// ─── Case ────────────────────────────────────────────────────────────────────

/// A stored case.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
  pub id:                Uuid,
  /// Unique across all cases.
  pub case_number:       String,
  pub title:             String,
  pub description:       String,
  pub client:            Ref<Client>,
  pub assigned_lawyer:   Ref<User>,
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
  pub notes:             NoteLog,
  pub created_by:        Ref<User>,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
}

fn trimmed(s: String) -> String {
  let t = s.trim();
  if t.len() == s.len() { s } else { t.to_owned() }
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// Input to [`crate::service::Office::create_case`].
///
/// References and enumerations arrive as text so that a bad value is
/// reported alongside every other invalid field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCase {
  #[serde(default)]
  pub case_number:       String,
  #[serde(default)]
  pub title:             String,
  #[serde(default)]
  pub description:       String,
  pub client:            Option<String>,
  /// Defaults to the acting identity.
  pub assigned_lawyer:   Option<String>,
  pub case_type:         Option<String>,
  pub status:            Option<String>,
  pub priority:          Option<String>,
  pub court_name:        Option<String>,
  pub judge_assigned:    Option<String>,
  pub filing_date:       Option<NaiveDate>,
  pub next_hearing_date: Option<NaiveDate>,
  pub closing_date:      Option<NaiveDate>,
  pub billing_amount:    Option<f64>,
  #[serde(default)]
  pub documents:         Vec<DocumentInput>,
}

impl NewCase {
  /// Validate and build the stored record on behalf of `actor`, who becomes
  /// `createdBy` and, unless one was given, the assigned lawyer.
  pub fn into_case(self, actor: Ref<User>, now: DateTime<Utc>) -> Result<Case> {
    let mut check = Checklist::new();
    check.required("caseNumber", &self.case_number, "Case number is required");
    check.required("title", &self.title, "Case title is required");
    check.required("description", &self.description, "Case description is required");
    let client = check.parse_required::<Ref<Client>>(
      "client",
      self.client.as_deref(),
      "Client is required",
    );
    let assigned_lawyer =
      check.parse::<Ref<User>>("assignedLawyer", self.assigned_lawyer.as_deref());
    let case_type = check.parse_required::<CaseType>(
      "caseType",
      self.case_type.as_deref(),
      "Case type is required",
    );
    let status = check.parse::<CaseStatus>("status", self.status.as_deref());
    let priority = check.parse::<Priority>("priority", self.priority.as_deref());
    check.non_negative("billingAmount", self.billing_amount);

    let (Some(client), Some(case_type)) = (client, case_type) else {
      return Err(check.into_error());
    };
    check.finish()?;

    Ok(Case {
      id: Uuid::new_v4(),
      case_number: trimmed(self.case_number),
      title: trimmed(self.title),
      description: self.description,
      client,
      assigned_lawyer: assigned_lawyer.unwrap_or(actor),
      case_type,
      status: status.unwrap_or_default(),
      priority: priority.unwrap_or_default(),
      court_name: self.court_name.map(trimmed),
      judge_assigned: self.judge_assigned.map(trimmed),
      filing_date: self.filing_date,
      next_hearing_date: self.next_hearing_date,
      closing_date: self.closing_date,
      billing_amount: self.billing_amount.unwrap_or(0.0),
      documents: documents(self.documents, now),
      notes: NoteLog::new(),
      created_by: actor,
      created_at: now,
      updated_at: now,
    })
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Input to [`crate::service::Office::update_case`], as received.
///
/// Supplied fields replace stored ones. `notes` and `createdBy` are not part
/// of the update surface. References may be re-pointed but not cleared; a
/// blank reference or enumeration is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseUpdate {
  pub case_number:       Option<String>,
  pub title:             Option<String>,
  pub description:       Option<String>,
  pub client:            Option<String>,
  pub assigned_lawyer:   Option<String>,
  pub case_type:         Option<String>,
  pub status:            Option<String>,
  pub priority:          Option<String>,
  #[serde(default, deserialize_with = "patch::nullable")]
  pub court_name:        Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::nullable")]
  pub judge_assigned:    Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::nullable")]
  pub filing_date:       Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "patch::nullable")]
  pub next_hearing_date: Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "patch::nullable")]
  pub closing_date:      Option<Option<NaiveDate>>,
  pub billing_amount:    Option<f64>,
  pub documents:         Option<Vec<DocumentInput>>,
}

impl CaseUpdate {
  /// Field-level checks only; the create checklist is not re-run.
  pub fn parse(self) -> Result<CaseChanges> {
    let mut check = Checklist::new();
    let client = check.parse("client", self.client.as_deref());
    let assigned_lawyer = check.parse("assignedLawyer", self.assigned_lawyer.as_deref());
    let case_type = check.parse("caseType", self.case_type.as_deref());
    let status = check.parse("status", self.status.as_deref());
    let priority = check.parse("priority", self.priority.as_deref());
    check.non_negative("billingAmount", self.billing_amount);
    check.finish()?;

    Ok(CaseChanges {
      case_number: self.case_number,
      title: self.title,
      description: self.description,
      client,
      assigned_lawyer,
      case_type,
      status,
      priority,
      court_name: self.court_name,
      judge_assigned: self.judge_assigned,
      filing_date: self.filing_date,
      next_hearing_date: self.next_hearing_date,
      closing_date: self.closing_date,
      billing_amount: self.billing_amount,
      documents: self.documents,
    })
  }
}

/// A checked [`CaseUpdate`].
#[derive(Debug, Clone, Default)]
pub struct CaseChanges {
  pub case_number:       Option<String>,
  pub title:             Option<String>,
  pub description:       Option<String>,
  pub client:            Option<Ref<Client>>,
  pub assigned_lawyer:   Option<Ref<User>>,
  pub case_type:         Option<CaseType>,
  pub status:            Option<CaseStatus>,
  pub priority:          Option<Priority>,
  pub court_name:        Option<Option<String>>,
  pub judge_assigned:    Option<Option<String>>,
  pub filing_date:       Option<Option<NaiveDate>>,
  pub next_hearing_date: Option<Option<NaiveDate>>,
  pub closing_date:      Option<Option<NaiveDate>>,
  pub billing_amount:    Option<f64>,
  pub documents:         Option<Vec<DocumentInput>>,
}

impl CaseChanges {
  pub fn apply_to(self, case: &mut Case, now: DateTime<Utc>) {
    apply(&mut case.case_number, self.case_number.map(trimmed));
    apply(&mut case.title, self.title.map(trimmed));
    apply(&mut case.description, self.description);
    apply(&mut case.client, self.client);
    apply(&mut case.assigned_lawyer, self.assigned_lawyer);
    apply(&mut case.case_type, self.case_type);
    apply(&mut case.status, self.status);
    apply(&mut case.priority, self.priority);
    apply(&mut case.court_name, self.court_name.map(|v| v.map(trimmed)));
    apply(&mut case.judge_assigned, self.judge_assigned.map(|v| v.map(trimmed)));
    apply(&mut case.filing_date, self.filing_date);
    apply(&mut case.next_hearing_date, self.next_hearing_date);
    apply(&mut case.closing_date, self.closing_date);
    apply(&mut case.billing_amount, self.billing_amount);
    apply(&mut case.documents, self.documents.map(|d| documents(d, now)));
    case.updated_at = now;
  }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Exact-match filter for listing cases; unset fields impose no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseFilter {
  pub status:    Option<CaseStatus>,
  pub case_type: Option<CaseType>,
  pub priority:  Option<Priority>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn input() -> NewCase {
    NewCase {
      case_number: "  C-001 ".into(),
      title: "T".into(),
      description: "D".into(),
      client: Some(Uuid::new_v4().to_string()),
      case_type: Some("Civil".into()),
      ..NewCase::default()
    }
  }

  #[test]
  fn enum_spellings_are_exact() {
    assert_eq!(
      serde_json::to_string(&CaseStatus::InProgress).unwrap(),
      "\"In Progress\""
    );
    assert_eq!(
      serde_json::from_str::<CaseType>("\"Intellectual Property\"").unwrap(),
      CaseType::IntellectualProperty
    );
    assert_eq!("Real Estate".parse::<CaseType>().unwrap(), CaseType::RealEstate);
    assert!("in progress".parse::<CaseStatus>().is_err());
    assert!(serde_json::from_str::<Priority>("\"Critical\"").is_err());
    assert_eq!(CaseStatus::default(), CaseStatus::Open);
    assert_eq!(Priority::default(), Priority::Medium);
  }

  #[test]
  fn create_applies_defaults() {
    let actor = Ref::new(Uuid::new_v4());
    let now = Utc::now();
    let case = input().into_case(actor, now).unwrap();

    assert_eq!(case.case_number, "C-001");
    assert_eq!(case.status, CaseStatus::Open);
    assert_eq!(case.priority, Priority::Medium);
    assert_eq!(case.assigned_lawyer, actor);
    assert_eq!(case.created_by, actor);
    assert_eq!(case.billing_amount, 0.0);
    assert!(case.notes.is_empty());
    assert_eq!(case.created_at, case.updated_at);
  }

  #[test]
  fn explicit_assignee_is_kept() {
    let actor = Ref::new(Uuid::new_v4());
    let lawyer = Ref::new(Uuid::new_v4());
    let case = NewCase { assigned_lawyer: Some(lawyer.to_string()), ..input() }
      .into_case(actor, Utc::now())
      .unwrap();
    assert_eq!(case.assigned_lawyer, lawyer);
    assert_eq!(case.created_by, actor);
  }

  #[test]
  fn create_reports_every_missing_field() {
    let err = NewCase { billing_amount: Some(-5.0), ..NewCase::default() }
      .into_case(Ref::new(Uuid::new_v4()), Utc::now())
      .unwrap_err();
    let crate::Error::Validation(errors) = err else { panic!("{err:?}") };
    let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(
      fields,
      ["caseNumber", "title", "description", "client", "caseType", "billingAmount"]
    );
  }

  #[test]
  fn unknown_spellings_are_field_errors() {
    let input: NewCase = serde_json::from_str(
      r#"{"caseType":"Maritime","client":"","status":"Archived","priority":"High"}"#,
    )
    .unwrap();
    let err = input.into_case(Ref::new(Uuid::new_v4()), Utc::now()).unwrap_err();
    let crate::Error::Validation(errors) = err else { panic!("{err:?}") };
    let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, ["caseNumber", "title", "description", "client", "caseType", "status"]);
    assert_eq!(errors[4].message, "Invalid caseType: \"Maritime\"");
  }

  #[test]
  fn malformed_client_reference_is_a_field_error() {
    let err = NewCase { client: Some("not-a-uuid".into()), ..input() }
      .into_case(Ref::new(Uuid::new_v4()), Utc::now())
      .unwrap_err();
    let crate::Error::Validation(errors) = err else { panic!("{err:?}") };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "client");
  }

  #[test]
  fn document_upload_time_defaults_to_now() {
    let now = Utc::now();
    let docs: Vec<DocumentInput> =
      serde_json::from_str(r#"[{"name":"brief.pdf","url":"https://files/x"}]"#).unwrap();
    let case = NewCase { documents: docs, ..input() }
      .into_case(Ref::new(Uuid::new_v4()), now)
      .unwrap();
    assert_eq!(case.documents[0].uploaded_at, now);
  }

  #[test]
  fn update_touches_only_supplied_fields() {
    let now = Utc::now();
    let mut case = NewCase { court_name: Some("High Court".into()), ..input() }
      .into_case(Ref::new(Uuid::new_v4()), now)
      .unwrap();
    let later = now + chrono::Duration::seconds(5);

    let update: CaseUpdate = serde_json::from_str(
      r#"{"status":"In Progress","courtName":null,"title":" New title "}"#,
    )
    .unwrap();
    update.parse().unwrap().apply_to(&mut case, later);

    assert_eq!(case.status, CaseStatus::InProgress);
    assert_eq!(case.court_name, None);
    assert_eq!(case.title, "New title");
    assert_eq!(case.priority, Priority::Medium);
    assert_eq!(case.updated_at, later);
  }

  #[test]
  fn update_reports_every_bad_field() {
    let update: CaseUpdate = serde_json::from_str(
      r#"{"status":"Archived","priority":"Critical","client":"x","billingAmount":-1}"#,
    )
    .unwrap();
    let Err(crate::Error::Validation(errors)) = update.parse() else {
      panic!("expected validation error");
    };
    let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, ["client", "status", "priority", "billingAmount"]);
  }

  #[test]
  fn blank_update_values_change_nothing() {
    let mut case = input().into_case(Ref::new(Uuid::new_v4()), Utc::now()).unwrap();
    let before = case.clone();
    let update: CaseUpdate =
      serde_json::from_str(r#"{"status":"","client":" "}"#).unwrap();
    update.parse().unwrap().apply_to(&mut case, before.updated_at);
    assert_eq!(case, before);
  }

  #[test]
  fn note_log_keeps_storage_order() {
    let author = Ref::new(Uuid::new_v4());
    let log: NoteLog = ["one", "two", "three"]
      .into_iter()
      .map(|content| Note { content: content.into(), added_by: author, added_at: Utc::now() })
      .collect();
    let contents: Vec<_> = log.iter().map(|n| n.content.as_str()).collect();
    assert_eq!(contents, ["one", "two", "three"]);
    assert_eq!(log.len(), 3);
  }
}
