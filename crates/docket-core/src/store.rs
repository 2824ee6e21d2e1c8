//! The `OfficeStore` trait.
//!
//! Implemented by storage backends (e.g. `docket-store-sqlite`). The service
//! layer in [`crate::service`] depends on this abstraction only.
//!
//! References between records are never checked by the store: a case may
//! point at a client or user that does not exist.

use std::future::Future;

use uuid::Uuid;

use crate::{
  case::{Case, CaseFilter, Note},
  client::Client,
  identity::{NewUser, User},
};

/// Abstraction over a record-keeping backend.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded runtime (e.g. tokio with `axum`).
pub trait OfficeStore: Send + Sync {
  /// Backend error. Converting into [`crate::Error`] decides which
  /// failures are conflicts and which are opaque store errors.
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new staff account. Fails if the email is already taken.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look up an account and its password hash by email.
  fn user_credentials<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<(User, String)>, Self::Error>> + Send + 'a;

  // ── Clients ───────────────────────────────────────────────────────────

  fn insert_client(
    &self,
    client: Client,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_client(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Client>, Self::Error>> + Send + '_;

  /// All clients, newest first; ties keep a stable order.
  fn list_clients(
    &self,
  ) -> impl Future<Output = Result<Vec<Client>, Self::Error>> + Send + '_;

  /// Overwrite a stored client. Returns `false` if it does not exist.
  fn replace_client(
    &self,
    client: Client,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Returns `false` if the client did not exist.
  fn delete_client(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Cases ─────────────────────────────────────────────────────────────

  /// Persist a new case. A duplicate case number must fail at the
  /// uniqueness constraint and leave the store untouched.
  fn insert_case(
    &self,
    case: Case,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  /// Cases matching every set field of `filter`, newest first.
  fn list_cases<'a>(
    &'a self,
    filter: &'a CaseFilter,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + 'a;

  /// Overwrite every field of a stored case except its notes. Returns
  /// `false` if it does not exist.
  fn replace_case(
    &self,
    case: Case,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Atomically append `note` to the case's log and set its `updatedAt` to
  /// the note's `addedAt`. Returns the updated case, or `None` if it does
  /// not exist.
  fn append_note(
    &self,
    case_id: Uuid,
    note: Note,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  /// Returns `false` if the case did not exist.
  fn delete_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
