//! Staff identities and the authorization gate.
//!
//! Credential storage and verification live outside this crate. All this
//! crate sees is the outcome: a [`Caller`] that is either anonymous or bound
//! to a [`User`].

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A staff member's role.
///
/// Stored and surfaced, but no operation in this crate branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Lawyer,
  Paralegal,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Admin => "admin",
      Self::Lawyer => "lawyer",
      Self::Paralegal => "paralegal",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "admin" => Ok(Self::Admin),
      "lawyer" => Ok(Self::Lawyer),
      "paralegal" => Ok(Self::Paralegal),
      other => Err(format!("unknown role: {other:?}")),
    }
  }
}

/// A staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:         Uuid,
  pub name:       String,
  pub email:      String,
  pub role:       Role,
  pub phone:      Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::OfficeStore::add_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub role:          Role,
  pub phone:         Option<String>,
  /// Argon2 PHC string; hashing happens before the store sees it.
  pub password_hash: String,
}

/// Who is making a call.
#[derive(Debug, Clone, Default)]
pub enum Caller {
  #[default]
  Anonymous,
  Authenticated(User),
}

impl Caller {
  /// The acting identity, or [`Error::Unauthorized`].
  ///
  /// Every operation in [`crate::service::Office`] goes through here before
  /// any store access.
  pub fn require(&self) -> Result<&User> {
    match self {
      Self::Authenticated(user) => Ok(user),
      Self::Anonymous => Err(Error::Unauthorized),
    }
  }
}
