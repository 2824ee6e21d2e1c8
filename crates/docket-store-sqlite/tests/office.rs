//! End-to-end tests of the `Office` service over an in-memory SQLite store.

use std::sync::Arc;

use docket_core::{
  Error,
  case::{CaseFilter, CaseStatus, CaseType, CaseUpdate, NewCase, Priority},
  client::{ClientUpdate, NewClient},
  identity::{Caller, NewUser, Role, User},
  service::Office,
  store::OfficeStore,
};
use docket_store_sqlite::SqliteStore;
use uuid::Uuid;

struct Fixture {
  office: Office<SqliteStore>,
  lawyer: Caller,
  user:   User,
}

async fn fixture() -> Fixture {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  let user = store
    .add_user(NewUser {
      name:          "Grace Okafor".into(),
      email:         "grace@example.com".into(),
      role:          Role::Lawyer,
      phone:         Some("+1 555 0100".into()),
      password_hash: "unused".into(),
    })
    .await
    .unwrap();
  Fixture {
    office: Office::new(Arc::new(store)),
    lawyer: Caller::Authenticated(user.clone()),
    user,
  }
}

fn amina() -> NewClient {
  NewClient {
    first_name: "Amina".into(),
    last_name: "Yusuf".into(),
    email: "amina@example.com".into(),
    phone: "+1 555 0199".into(),
    ..NewClient::default()
  }
}

fn new_case(number: &str, client: Uuid) -> NewCase {
  NewCase {
    case_number: number.into(),
    title: "Yusuf v. Harbor Logistics".into(),
    description: "Unpaid freight invoices".into(),
    client: Some(client.to_string()),
    case_type: Some("Civil".into()),
    ..NewCase::default()
  }
}

// ─── Authorization gate ──────────────────────────────────────────────────────

#[tokio::test]
async fn anonymous_callers_change_nothing() {
  let f = fixture().await;
  let anon = Caller::Anonymous;

  let err = f.office.create_client(&anon, amina()).await.unwrap_err();
  assert!(matches!(err, Error::Unauthorized));
  let err = f.office.create_case(&anon, new_case("C-1", Uuid::new_v4())).await.unwrap_err();
  assert!(matches!(err, Error::Unauthorized));
  assert!(matches!(f.office.stats(&anon).await, Err(Error::Unauthorized)));
  assert!(matches!(f.office.whoami(&anon), Err(Error::Unauthorized)));

  assert!(f.office.list_clients(&f.lawyer).await.unwrap().is_empty());
  assert!(f.office.list_cases(&f.lawyer, &CaseFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn gate_runs_before_existence_checks() {
  let f = fixture().await;
  let err = f.office.get_case(&Caller::Anonymous, Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::Unauthorized));
}

// ─── Clients ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn invalid_client_reports_every_field() {
  let f = fixture().await;
  let input = NewClient { email: "not-an-email".into(), ..NewClient::default() };

  let Err(Error::Validation(errors)) = f.office.create_client(&f.lawyer, input).await
  else {
    panic!("expected validation error");
  };
  let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
  assert_eq!(fields, ["firstName", "lastName", "email", "phone"]);
  assert!(f.office.list_clients(&f.lawyer).await.unwrap().is_empty());
}

#[tokio::test]
async fn client_records_its_creator() {
  let f = fixture().await;
  let view = f.office.create_client(&f.lawyer, amina()).await.unwrap();

  let creator = view.created_by.expect("creator resolves");
  assert_eq!(creator.id, f.user.id);
  assert_eq!(creator.name, "Grace Okafor");
  assert_eq!(view.created_at, view.updated_at);
}

#[tokio::test]
async fn update_client_touches_only_supplied_fields() {
  let f = fixture().await;
  let created = f.office.create_client(&f.lawyer, amina()).await.unwrap();
  let id = created.id;

  let update = ClientUpdate { phone: Some("+1 555 0142".into()), ..ClientUpdate::default() };
  let updated = f.office.update_client(&f.lawyer, id, update).await.unwrap();

  assert_eq!(updated.phone, "+1 555 0142");
  assert_eq!(updated.first_name, "Amina");
  assert_eq!(updated.created_at, created.created_at);
  assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn missing_client_is_not_found() {
  let f = fixture().await;
  let id = Uuid::new_v4();
  assert!(matches!(
    f.office.get_client(&f.lawyer, id).await,
    Err(Error::NotFound { id: missing, .. }) if missing == id
  ));
  assert!(matches!(
    f.office.delete_client(&f.lawyer, id).await,
    Err(Error::NotFound { .. })
  ));
}

// ─── Cases ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_case_defaults_and_assignment() {
  let f = fixture().await;
  let client = f.office.create_client(&f.lawyer, amina()).await.unwrap();

  let view = f
    .office
    .create_case(&f.lawyer, new_case("  C-2024-001 ", client.id))
    .await
    .unwrap();

  assert_eq!(view.case_number, "C-2024-001");
  assert_eq!(view.status, CaseStatus::Open);
  assert_eq!(view.priority, Priority::Medium);
  assert_eq!(view.billing_amount, 0.0);
  assert!(view.notes.is_empty());
  assert_eq!(view.assigned_lawyer.as_ref().map(|u| u.id), Some(f.user.id));
  assert_eq!(view.created_by.as_ref().map(|u| u.id), Some(f.user.id));
  assert_eq!(view.client.as_ref().map(|c| c.id), Some(client.id));
}

#[tokio::test]
async fn duplicate_case_number_conflicts_without_side_effects() {
  let f = fixture().await;
  let client_id = Uuid::new_v4();
  f.office.create_case(&f.lawyer, new_case("C-1", client_id)).await.unwrap();

  let err = f
    .office
    .create_case(&f.lawyer, new_case("C-1", client_id))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));

  let all = f.office.list_cases(&f.lawyer, &CaseFilter::default()).await.unwrap();
  assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn negative_billing_is_rejected_on_create_and_update() {
  let f = fixture().await;
  let mut input = new_case("C-1", Uuid::new_v4());
  input.billing_amount = Some(-10.0);
  assert!(matches!(
    f.office.create_case(&f.lawyer, input).await,
    Err(Error::Validation(_))
  ));

  let created = f
    .office
    .create_case(&f.lawyer, new_case("C-1", Uuid::new_v4()))
    .await
    .unwrap();
  let update = CaseUpdate { billing_amount: Some(-1.0), ..CaseUpdate::default() };
  assert!(matches!(
    f.office.update_case(&f.lawyer, created.id, update).await,
    Err(Error::Validation(_))
  ));
}

#[tokio::test]
async fn bad_spellings_are_reported_with_missing_fields() {
  let f = fixture().await;
  let input = NewCase {
    client: Some(String::new()),
    case_type: Some("Maritime".into()),
    ..NewCase::default()
  };
  let Err(Error::Validation(errors)) = f.office.create_case(&f.lawyer, input).await else {
    panic!("expected validation error");
  };
  let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
  assert_eq!(fields, ["caseNumber", "title", "description", "client", "caseType"]);

  let created = f
    .office
    .create_case(&f.lawyer, new_case("C-1", Uuid::new_v4()))
    .await
    .unwrap();
  let update = CaseUpdate { status: Some("Archived".into()), ..CaseUpdate::default() };
  let Err(Error::Validation(errors)) = f.office.update_case(&f.lawyer, created.id, update).await
  else {
    panic!("expected validation error");
  };
  assert_eq!(errors[0].field, "status");
  let view = f.office.get_case(&f.lawyer, created.id).await.unwrap();
  assert_eq!(view.status, CaseStatus::Open);
}

#[tokio::test]
async fn notes_are_append_only_and_attributed() {
  let f = fixture().await;
  let created = f
    .office
    .create_case(&f.lawyer, new_case("C-1", Uuid::new_v4()))
    .await
    .unwrap();

  f.office.add_note(&f.lawyer, created.id, "first".into()).await.unwrap();
  let view = f.office.add_note(&f.lawyer, created.id, "second".into()).await.unwrap();

  let contents: Vec<_> = view.notes.iter().map(|n| n.content.as_str()).collect();
  assert_eq!(contents, ["first", "second"]);
  let last = view.notes.last().unwrap();
  assert_eq!(last.added_by.as_ref().map(|a| a.id), Some(f.user.id));
  assert_eq!(view.updated_at, last.added_at);

  // An update cannot rewrite the log.
  let update = CaseUpdate { title: Some("Renamed".into()), ..CaseUpdate::default() };
  let after = f.office.update_case(&f.lawyer, created.id, update).await.unwrap();
  assert_eq!(after.title, "Renamed");
  assert_eq!(after.notes.len(), 2);
}

#[tokio::test]
async fn blank_note_is_rejected() {
  let f = fixture().await;
  let created = f
    .office
    .create_case(&f.lawyer, new_case("C-1", Uuid::new_v4()))
    .await
    .unwrap();

  let err = f.office.add_note(&f.lawyer, created.id, "   ".into()).await.unwrap_err();
  let Error::Validation(errors) = err else { panic!("expected validation error") };
  assert_eq!(errors[0].message, "Note content is required");

  let view = f.office.get_case(&f.lawyer, created.id).await.unwrap();
  assert!(view.notes.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn notes_survive_concurrent_appends() {
  let f = fixture().await;
  let created = f
    .office
    .create_case(&f.lawyer, new_case("C-1", Uuid::new_v4()))
    .await
    .unwrap();
  let id = created.id;

  let tasks: Vec<_> = (0..20)
    .map(|i| {
      let office = f.office.clone();
      let caller = f.lawyer.clone();
      tokio::spawn(async move {
        office.add_note(&caller, id, format!("note {i}")).await
      })
    })
    .collect();
  for task in tasks {
    task.await.unwrap().unwrap();
  }

  let view = f.office.get_case(&f.lawyer, id).await.unwrap();
  assert_eq!(view.notes.len(), 20);
  let mut contents: Vec<_> = view.notes.iter().map(|n| n.content.clone()).collect();
  contents.sort();
  let mut expected: Vec<_> = (0..20).map(|i| format!("note {i}")).collect();
  expected.sort();
  assert_eq!(contents, expected);
}

#[tokio::test]
async fn note_on_missing_case_is_not_found() {
  let f = fixture().await;
  let err = f.office.add_note(&f.lawyer, Uuid::new_v4(), "x".into()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn stats_agree_with_listing() {
  let f = fixture().await;
  let client_id = Uuid::new_v4();
  let specs = [
    ("C-1", CaseType::Civil, CaseStatus::Open, Priority::High),
    ("C-2", CaseType::Criminal, CaseStatus::InProgress, Priority::High),
    ("C-3", CaseType::Civil, CaseStatus::Closed, Priority::Low),
    ("C-4", CaseType::Family, CaseStatus::Pending, Priority::Urgent),
  ];
  for (number, case_type, status, priority) in specs {
    let mut input = new_case(number, client_id);
    input.case_type = Some(case_type.to_string());
    input.status = Some(status.to_string());
    input.priority = Some(priority.to_string());
    f.office.create_case(&f.lawyer, input).await.unwrap();
  }

  let stats = f.office.stats(&f.lawyer).await.unwrap();
  let listed = f.office.list_cases(&f.lawyer, &CaseFilter::default()).await.unwrap();
  assert_eq!(stats.total_cases, listed.len());
  assert_eq!(stats.open_cases, 1);
  assert_eq!(stats.in_progress_cases, 1);
  assert_eq!(stats.closed_cases, 1);

  let by_type: usize = stats.cases_by_type.iter().map(|t| t.count).sum();
  let by_priority: usize = stats.cases_by_priority.iter().map(|p| p.count).sum();
  assert_eq!(by_type, 4);
  assert_eq!(by_priority, 4);
  assert!(stats.cases_by_type.iter().all(|t| t.count > 0));

  let high = CaseFilter { priority: Some(Priority::High), ..CaseFilter::default() };
  let high_count = f.office.list_cases(&f.lawyer, &high).await.unwrap().len();
  let tallied = stats
    .cases_by_priority
    .iter()
    .find(|p| p.priority == Priority::High)
    .map(|p| p.count);
  assert_eq!(tallied, Some(high_count));
}

#[tokio::test]
async fn case_outlives_its_client() {
  let f = fixture().await;
  let client = f.office.create_client(&f.lawyer, amina()).await.unwrap();
  let case = f
    .office
    .create_case(&f.lawyer, new_case("C-1", client.id))
    .await
    .unwrap();
  f.office.add_note(&f.lawyer, case.id, "Intake call".into()).await.unwrap();

  f.office.delete_client(&f.lawyer, client.id).await.unwrap();

  let view = f.office.get_case(&f.lawyer, case.id).await.unwrap();
  assert!(view.client.is_none());
  assert_eq!(view.notes.len(), 1);

  f.office.delete_case(&f.lawyer, case.id).await.unwrap();
  assert!(matches!(
    f.office.get_case(&f.lawyer, case.id).await,
    Err(Error::NotFound { .. })
  ));
}
