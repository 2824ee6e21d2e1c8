//! [`Office`], the operations staff perform on clients and cases.
//!
//! Every operation takes the [`Caller`] and passes the authorization gate
//! before reading or writing anything. Reads resolve weak references on a
//! best-effort basis: a dangling reference becomes `None`, never an error.

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
  Entity, Error, Result,
  case::{Case, CaseFilter, CaseUpdate, NewCase, Note},
  client::{Client, ClientUpdate, NewClient},
  identity::{Caller, User},
  now,
  reference::Ref,
  stats::CaseStats,
  store::OfficeStore,
  validate::Checklist,
  view::{
    AuthorSummary, CaseRefs, CaseView, ClientSummary, ClientView, Detail,
    UserSummary,
  },
};

/// The record-keeping service, generic over its backing store.
///
/// Cloning shares the store.
pub struct Office<S> {
  store: Arc<S>,
}

impl<S> Clone for Office<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: OfficeStore> Office<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// The acting identity itself.
  pub fn whoami(&self, caller: &Caller) -> Result<User> {
    caller.require().cloned()
  }

  // ── Client registry ───────────────────────────────────────────────────

  /// All clients, newest first.
  pub async fn list_clients(&self, caller: &Caller) -> Result<Vec<ClientView>> {
    caller.require()?;
    let clients = self.store.list_clients().await.map_err(backend)?;

    let mut resolver = Resolver::new(&*self.store);
    let mut views = Vec::with_capacity(clients.len());
    for client in clients {
      views.push(resolver.client_view(client).await?);
    }
    Ok(views)
  }

  pub async fn get_client(&self, caller: &Caller, id: Uuid) -> Result<ClientView> {
    caller.require()?;
    let client = self.load_client(id).await?;
    Resolver::new(&*self.store).client_view(client).await
  }

  pub async fn create_client(
    &self,
    caller: &Caller,
    input: NewClient,
  ) -> Result<ClientView> {
    let actor = caller.require()?;
    input.validate()?;

    let client = input.into_client(Ref::new(actor.id), now());
    self
      .store
      .insert_client(client.clone())
      .await
      .map_err(backend)?;
    debug!(client_id = %client.id, actor = %actor.id, "client created");

    Ok(ClientView::new(client, Some(UserSummary::of(actor, Detail::Summary))))
  }

  pub async fn update_client(
    &self,
    caller: &Caller,
    id: Uuid,
    update: ClientUpdate,
  ) -> Result<ClientView> {
    let actor = caller.require()?;
    let mut client = self.load_client(id).await?;
    update.apply_to(&mut client, now());

    if !self
      .store
      .replace_client(client.clone())
      .await
      .map_err(backend)?
    {
      return Err(Error::not_found(Entity::Client, id));
    }
    debug!(client_id = %id, actor = %actor.id, "client updated");

    Resolver::new(&*self.store).client_view(client).await
  }

  /// Removes the client only; cases referring to it keep a dangling
  /// reference.
  pub async fn delete_client(&self, caller: &Caller, id: Uuid) -> Result<()> {
    let actor = caller.require()?;
    if !self.store.delete_client(id).await.map_err(backend)? {
      return Err(Error::not_found(Entity::Client, id));
    }
    debug!(client_id = %id, actor = %actor.id, "client deleted");
    Ok(())
  }

  async fn load_client(&self, id: Uuid) -> Result<Client> {
    self
      .store
      .get_client(id)
      .await
      .map_err(backend)?
      .ok_or_else(|| Error::not_found(Entity::Client, id))
  }

  // ── Case ledger ───────────────────────────────────────────────────────

  /// Cases matching every set field of `filter`, newest first.
  pub async fn list_cases(
    &self,
    caller: &Caller,
    filter: &CaseFilter,
  ) -> Result<Vec<CaseView>> {
    caller.require()?;
    let cases = self.store.list_cases(filter).await.map_err(backend)?;

    let mut resolver = Resolver::new(&*self.store);
    let mut views = Vec::with_capacity(cases.len());
    for case in cases {
      views.push(resolver.case_view(case, Detail::Summary).await?);
    }
    Ok(views)
  }

  pub async fn get_case(&self, caller: &Caller, id: Uuid) -> Result<CaseView> {
    caller.require()?;
    let case = self.load_case(id).await?;
    Resolver::new(&*self.store).case_view(case, Detail::Full).await
  }

  /// Fails with [`Error::Conflict`] if the case number is taken.
  pub async fn create_case(&self, caller: &Caller, input: NewCase) -> Result<CaseView> {
    let actor = caller.require()?;
    let case = input.into_case(Ref::new(actor.id), now())?;

    let number = case.case_number.clone();
    self
      .store
      .insert_case(case.clone())
      .await
      .map_err(backend)
      .inspect_err(|e| {
        if matches!(e, Error::Conflict(_)) {
          warn!(case_number = %number, "duplicate case number rejected");
        }
      })?;
    debug!(case_id = %case.id, actor = %actor.id, "case created");

    Resolver::new(&*self.store).case_view(case, Detail::Summary).await
  }

  /// Replaces the supplied fields. Notes are never touched.
  pub async fn update_case(
    &self,
    caller: &Caller,
    id: Uuid,
    update: CaseUpdate,
  ) -> Result<CaseView> {
    let actor = caller.require()?;
    let changes = update.parse()?;
    let mut case = self.load_case(id).await?;
    changes.apply_to(&mut case, now());

    let replaced = self
      .store
      .replace_case(case.clone())
      .await
      .map_err(backend)
      .inspect_err(|e| {
        if matches!(e, Error::Conflict(_)) {
          warn!(case_id = %id, "case number change rejected as duplicate");
        }
      })?;
    if !replaced {
      return Err(Error::not_found(Entity::Case, id));
    }
    debug!(case_id = %id, actor = %actor.id, "case updated");

    // Re-read so the returned notes include any appended concurrently.
    let case = self.load_case(id).await?;
    Resolver::new(&*self.store).case_view(case, Detail::Summary).await
  }

  /// Appends a note attributed to the caller at the current time.
  pub async fn add_note(
    &self,
    caller: &Caller,
    id: Uuid,
    content: String,
  ) -> Result<CaseView> {
    let actor = caller.require()?;
    let mut check = Checklist::new();
    check.required("content", &content, "Note content is required");
    check.finish()?;

    let note = Note { content, added_by: Ref::new(actor.id), added_at: now() };
    let case = self
      .store
      .append_note(id, note)
      .await
      .map_err(backend)?
      .ok_or_else(|| Error::not_found(Entity::Case, id))?;
    debug!(case_id = %id, actor = %actor.id, notes = case.notes.len(), "note added");

    Resolver::new(&*self.store).case_view(case, Detail::Full).await
  }

  pub async fn delete_case(&self, caller: &Caller, id: Uuid) -> Result<()> {
    let actor = caller.require()?;
    if !self.store.delete_case(id).await.map_err(backend)? {
      return Err(Error::not_found(Entity::Case, id));
    }
    debug!(case_id = %id, actor = %actor.id, "case deleted");
    Ok(())
  }

  // ── Aggregation view ──────────────────────────────────────────────────

  /// Recomputed from a full scan on every call.
  pub async fn stats(&self, caller: &Caller) -> Result<CaseStats> {
    caller.require()?;
    let cases = self
      .store
      .list_cases(&CaseFilter::default())
      .await
      .map_err(backend)?;
    Ok(CaseStats::tally(&cases))
  }

  async fn load_case(&self, id: Uuid) -> Result<Case> {
    self
      .store
      .get_case(id)
      .await
      .map_err(backend)?
      .ok_or_else(|| Error::not_found(Entity::Case, id))
  }
}

fn backend<E: Into<Error>>(err: E) -> Error { err.into() }

// ─── Reference resolution ────────────────────────────────────────────────────

/// Resolves weak references for the duration of one operation, fetching each
/// target at most once.
struct Resolver<'s, S> {
  store:   &'s S,
  users:   HashMap<Uuid, Option<User>>,
  clients: HashMap<Uuid, Option<Client>>,
}

impl<'s, S: OfficeStore> Resolver<'s, S> {
  fn new(store: &'s S) -> Self {
    Self { store, users: HashMap::new(), clients: HashMap::new() }
  }

  async fn user(&mut self, r: Ref<User>) -> Result<Option<&User>> {
    let id = r.id();
    if !self.users.contains_key(&id) {
      let found = self.store.get_user(id).await.map_err(backend)?;
      self.users.insert(id, found);
    }
    Ok(self.users.get(&id).and_then(Option::as_ref))
  }

  async fn client(&mut self, r: Ref<Client>) -> Result<Option<&Client>> {
    let id = r.id();
    if !self.clients.contains_key(&id) {
      let found = self.store.get_client(id).await.map_err(backend)?;
      self.clients.insert(id, found);
    }
    Ok(self.clients.get(&id).and_then(Option::as_ref))
  }

  async fn user_summary(
    &mut self,
    r: Ref<User>,
    detail: Detail,
  ) -> Result<Option<UserSummary>> {
    Ok(self.user(r).await?.map(|u| UserSummary::of(u, detail)))
  }

  async fn client_view(&mut self, client: Client) -> Result<ClientView> {
    let created_by = self.user_summary(client.created_by, Detail::Summary).await?;
    Ok(ClientView::new(client, created_by))
  }

  async fn case_view(&mut self, case: Case, detail: Detail) -> Result<CaseView> {
    let client = self
      .client(case.client)
      .await?
      .map(|c| ClientSummary::of(c, detail));
    let assigned_lawyer = self.user_summary(case.assigned_lawyer, detail).await?;
    let created_by = self.user_summary(case.created_by, Detail::Summary).await?;

    let mut note_authors = Vec::with_capacity(case.notes.len());
    for note in &case.notes {
      let author = self
        .user(note.added_by)
        .await?
        .map(|u| AuthorSummary { id: u.id, name: u.name.clone() });
      note_authors.push(author);
    }

    let refs = CaseRefs { client, assigned_lawyer, created_by, note_authors };
    Ok(CaseView::new(case, refs))
  }
}
