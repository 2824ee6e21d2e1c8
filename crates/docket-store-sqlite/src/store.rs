//! [`SqliteStore`], the SQLite implementation of [`OfficeStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use docket_core::{
  case::{Case, CaseFilter, Note},
  client::Client,
  identity::{NewUser, User},
  now,
  store::OfficeStore,
};

use crate::{
  Error, Result,
  encode::{
    CaseRow, ClientRow, RawCase, RawClient, RawNote, RawUser, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

const USER_COLUMNS: &str = "user_id, name, email, role, phone, created_at";

const CLIENT_COLUMNS: &str = "client_id, first_name, last_name, email, phone, \
                              date_of_birth, id_number, address_json, notes, \
                              created_by, created_at, updated_at";

const CASE_COLUMNS: &str = "case_id, case_number, title, description, \
                            client_id, assigned_lawyer, case_type, status, \
                            priority, court_name, judge_assigned, filing_date, \
                            next_hearing_date, closing_date, billing_amount, \
                            documents_json, created_by, created_at, updated_at";

/// Newest first; rows created in the same microsecond fall back to insertion
/// order, newest first.
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, rowid DESC";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Docket record store backed by a single SQLite file.
///
/// Clones share one connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, as the tests do.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row readers ─────────────────────────────────────────────────────────────

fn read_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:    row.get(0)?,
    name:       row.get(1)?,
    email:      row.get(2)?,
    role:       row.get(3)?,
    phone:      row.get(4)?,
    created_at: row.get(5)?,
  })
}

fn read_client(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawClient> {
  Ok(RawClient {
    client_id:     row.get(0)?,
    first_name:    row.get(1)?,
    last_name:     row.get(2)?,
    email:         row.get(3)?,
    phone:         row.get(4)?,
    date_of_birth: row.get(5)?,
    id_number:     row.get(6)?,
    address_json:  row.get(7)?,
    notes:         row.get(8)?,
    created_by:    row.get(9)?,
    created_at:    row.get(10)?,
    updated_at:    row.get(11)?,
  })
}

fn read_case(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCase> {
  Ok(RawCase {
    case_id:           row.get(0)?,
    case_number:       row.get(1)?,
    title:             row.get(2)?,
    description:       row.get(3)?,
    client_id:         row.get(4)?,
    assigned_lawyer:   row.get(5)?,
    case_type:         row.get(6)?,
    status:            row.get(7)?,
    priority:          row.get(8)?,
    court_name:        row.get(9)?,
    judge_assigned:    row.get(10)?,
    filing_date:       row.get(11)?,
    next_hearing_date: row.get(12)?,
    closing_date:      row.get(13)?,
    billing_amount:    row.get(14)?,
    documents_json:    row.get(15)?,
    created_by:        row.get(16)?,
    created_at:        row.get(17)?,
    updated_at:        row.get(18)?,
  })
}

/// The case's notes in log order.
fn load_notes(
  conn: &rusqlite::Connection,
  case_id: &str,
) -> rusqlite::Result<Vec<RawNote>> {
  let mut stmt = conn.prepare_cached(
    "SELECT content, added_by, added_at FROM case_notes
     WHERE case_id = ?1 ORDER BY note_seq",
  )?;
  stmt
    .query_map(rusqlite::params![case_id], |row| {
      Ok(RawNote {
        content:  row.get(0)?,
        added_by: row.get(1)?,
        added_at: row.get(2)?,
      })
    })?
    .collect()
}

fn load_case(
  conn: &rusqlite::Connection,
  case_id: &str,
) -> rusqlite::Result<Option<(RawCase, Vec<RawNote>)>> {
  let raw = conn
    .query_row(
      &format!("SELECT {CASE_COLUMNS} FROM cases WHERE case_id = ?1"),
      rusqlite::params![case_id],
      read_case,
    )
    .optional()?;
  let Some(raw) = raw else { return Ok(None) };
  let notes = load_notes(conn, case_id)?;
  Ok(Some((raw, notes)))
}

/// Maps a UNIQUE constraint violation to `Ok(None)`; other errors pass
/// through.
fn unless_duplicate<T>(res: rusqlite::Result<T>) -> rusqlite::Result<Option<T>> {
  match res {
    Ok(v) => Ok(Some(v)),
    Err(rusqlite::Error::SqliteFailure(err, _))
      if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
    {
      Ok(None)
    }
    Err(e) => Err(e),
  }
}

fn execute_case_write(
  conn: &rusqlite::Connection,
  sql: &str,
  row: &CaseRow,
) -> rusqlite::Result<Option<usize>> {
  unless_duplicate(conn.execute(
    sql,
    rusqlite::params![
      row.case_id,
      row.case_number,
      row.title,
      row.description,
      row.client_id,
      row.assigned_lawyer,
      row.case_type,
      row.status,
      row.priority,
      row.court_name,
      row.judge_assigned,
      row.filing_date,
      row.next_hearing_date,
      row.closing_date,
      row.billing_amount,
      row.documents_json,
      row.created_by,
      row.created_at,
      row.updated_at,
    ],
  ))
}

fn execute_client_write(
  conn: &rusqlite::Connection,
  sql: &str,
  row: &ClientRow,
) -> rusqlite::Result<usize> {
  conn.execute(
    sql,
    rusqlite::params![
      row.client_id,
      row.first_name,
      row.last_name,
      row.email,
      row.phone,
      row.date_of_birth,
      row.id_number,
      row.address_json,
      row.notes,
      row.created_by,
      row.created_at,
      row.updated_at,
    ],
  )
}

// ─── OfficeStore impl ────────────────────────────────────────────────────────

impl OfficeStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      id:         Uuid::new_v4(),
      name:       input.name,
      email:      input.email,
      role:       input.role,
      phone:      input.phone,
      created_at: now(),
    };

    let id_str   = encode_uuid(user.id);
    let name     = user.name.clone();
    let email    = user.email.clone();
    let role_str = user.role.as_str();
    let phone    = user.phone.clone();
    let hash     = input.password_hash;
    let at_str   = encode_dt(user.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(unless_duplicate(conn.execute(
          "INSERT INTO users (
             user_id, name, email, role, phone, password_hash, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![id_str, name, email, role_str, phone, hash, at_str],
        ))?)
      })
      .await?;

    match inserted {
      Some(_) => Ok(user),
      None => Err(Error::DuplicateEmail(user.email)),
    }
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
            rusqlite::params![id_str],
            read_user,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn user_credentials(&self, email: &str) -> Result<Option<(User, String)>> {
    let email = email.to_owned();

    let raw: Option<(RawUser, String)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?1"
            ),
            rusqlite::params![email],
            |row| Ok((read_user(row)?, row.get(6)?)),
          )
          .optional()?)
      })
      .await?;

    raw
      .map(|(user, hash)| user.into_user().map(|user| (user, hash)))
      .transpose()
  }

  // ── Clients ───────────────────────────────────────────────────────────────

  async fn insert_client(&self, client: Client) -> Result<()> {
    let row = ClientRow::encode(&client)?;

    self
      .conn
      .call(move |conn| {
        execute_client_write(
          conn,
          "INSERT INTO clients (
             client_id, first_name, last_name, email, phone, date_of_birth,
             id_number, address_json, notes, created_by, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          &row,
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_client(&self, id: Uuid) -> Result<Option<Client>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawClient> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE client_id = ?1"),
            rusqlite::params![id_str],
            read_client,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawClient::into_client).transpose()
  }

  async fn list_clients(&self) -> Result<Vec<Client>> {
    let raws: Vec<RawClient> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {CLIENT_COLUMNS} FROM clients {NEWEST_FIRST}"))?;
        let rows = stmt
          .query_map([], read_client)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawClient::into_client).collect()
  }

  async fn replace_client(&self, client: Client) -> Result<bool> {
    let row = ClientRow::encode(&client)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(execute_client_write(
          conn,
          "UPDATE clients SET
             first_name = ?2, last_name = ?3, email = ?4, phone = ?5,
             date_of_birth = ?6, id_number = ?7, address_json = ?8, notes = ?9,
             created_by = ?10, created_at = ?11, updated_at = ?12
           WHERE client_id = ?1",
          &row,
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete_client(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM clients WHERE client_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  // ── Cases ─────────────────────────────────────────────────────────────────

  async fn insert_case(&self, case: Case) -> Result<()> {
    let row = CaseRow::encode(&case)?;

    // The log of a brand-new case is normally empty, but whatever it holds
    // is written in the same transaction as the case row.
    let notes: Vec<(String, String, String)> = case
      .notes
      .iter()
      .map(|n| (n.content.clone(), encode_uuid(n.added_by.id()), encode_dt(n.added_at)))
      .collect();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let written = execute_case_write(
          &tx,
          &format!(
            "INSERT INTO cases ({CASE_COLUMNS}) VALUES (
               ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
               ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19
             )"
          ),
          &row,
        )?;
        if written.is_none() {
          return Ok(false);
        }
        for (content, added_by, added_at) in &notes {
          tx.execute(
            "INSERT INTO case_notes (case_id, content, added_by, added_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![row.case_id, content, added_by, added_at],
          )?;
        }
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if inserted {
      Ok(())
    } else {
      Err(Error::DuplicateCaseNumber(case.case_number))
    }
  }

  async fn get_case(&self, id: Uuid) -> Result<Option<Case>> {
    let id_str = encode_uuid(id);

    let raw = self
      .conn
      .call(move |conn| Ok(load_case(conn, &id_str)?))
      .await?;

    raw.map(|(case, notes)| case.into_case(notes)).transpose()
  }

  async fn list_cases(&self, filter: &CaseFilter) -> Result<Vec<Case>> {
    let mut conds: Vec<&'static str> = Vec::new();
    let mut args: Vec<&'static str> = Vec::new();
    if let Some(status) = filter.status {
      conds.push("status = ?");
      args.push(status.as_str());
    }
    if let Some(case_type) = filter.case_type {
      conds.push("case_type = ?");
      args.push(case_type.as_str());
    }
    if let Some(priority) = filter.priority {
      conds.push("priority = ?");
      args.push(priority.as_str());
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };
    let sql = format!("SELECT {CASE_COLUMNS} FROM cases {where_clause} {NEWEST_FIRST}");

    let raws: Vec<(RawCase, Vec<RawNote>)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let cases = stmt
          .query_map(rusqlite::params_from_iter(args), read_case)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut rows = Vec::with_capacity(cases.len());
        for case in cases {
          let notes = load_notes(conn, &case.case_id)?;
          rows.push((case, notes));
        }
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(case, notes)| case.into_case(notes))
      .collect()
  }

  async fn replace_case(&self, case: Case) -> Result<bool> {
    let row = CaseRow::encode(&case)?;

    let written = self
      .conn
      .call(move |conn| {
        Ok(execute_case_write(
          conn,
          "UPDATE cases SET
             case_number = ?2, title = ?3, description = ?4, client_id = ?5,
             assigned_lawyer = ?6, case_type = ?7, status = ?8, priority = ?9,
             court_name = ?10, judge_assigned = ?11, filing_date = ?12,
             next_hearing_date = ?13, closing_date = ?14, billing_amount = ?15,
             documents_json = ?16, created_by = ?17, created_at = ?18,
             updated_at = ?19
           WHERE case_id = ?1",
          &row,
        )?)
      })
      .await?;

    match written {
      Some(changed) => Ok(changed > 0),
      None => Err(Error::DuplicateCaseNumber(case.case_number)),
    }
  }

  async fn append_note(&self, case_id: Uuid, note: Note) -> Result<Option<Case>> {
    let id_str   = encode_uuid(case_id);
    let content  = note.content;
    let added_by = encode_uuid(note.added_by.id());
    let at_str   = encode_dt(note.added_at);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let touched = tx.execute(
          "UPDATE cases SET updated_at = ?2 WHERE case_id = ?1",
          rusqlite::params![id_str, at_str],
        )?;
        if touched == 0 {
          return Ok(None);
        }
        tx.execute(
          "INSERT INTO case_notes (case_id, content, added_by, added_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, content, added_by, at_str],
        )?;
        let case = load_case(&tx, &id_str)?;
        tx.commit()?;
        Ok(case)
      })
      .await?;

    raw.map(|(case, notes)| case.into_case(notes)).transpose()
  }

  async fn delete_case(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM case_notes WHERE case_id = ?1",
          rusqlite::params![id_str],
        )?;
        let n = tx.execute(
          "DELETE FROM cases WHERE case_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(n)
      })
      .await?;

    Ok(deleted > 0)
  }
}
