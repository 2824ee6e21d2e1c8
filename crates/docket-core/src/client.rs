//! Client records: the people the office represents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  identity::User,
  patch::{self, apply},
  reference::Ref,
  validate::Checklist,
};

/// A postal address. Every part is optional; the model does not require
/// them to be filled in together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
  pub street:   Option<String>,
  pub city:     Option<String>,
  pub state:    Option<String>,
  pub zip_code: Option<String>,
  pub country:  Option<String>,
}

/// A stored client.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
  pub id:            Uuid,
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  pub phone:         String,
  pub date_of_birth: Option<NaiveDate>,
  pub id_number:     Option<String>,
  pub address:       Option<Address>,
  pub notes:         Option<String>,
  pub created_by:    Ref<User>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// Input to [`crate::service::Office::create_client`].
///
/// Required fields default to empty so that a missing field surfaces as a
/// validation error alongside any others, rather than as a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
  #[serde(default)]
  pub first_name:    String,
  #[serde(default)]
  pub last_name:     String,
  #[serde(default)]
  pub email:         String,
  #[serde(default)]
  pub phone:         String,
  pub date_of_birth: Option<NaiveDate>,
  pub id_number:     Option<String>,
  pub address:       Option<Address>,
  pub notes:         Option<String>,
}

impl NewClient {
  pub fn validate(&self) -> Result<()> {
    let mut check = Checklist::new();
    check.required("firstName", &self.first_name, "First name is required");
    check.required("lastName", &self.last_name, "Last name is required");
    check.email("email", &self.email, "Valid email is required");
    check.required("phone", &self.phone, "Phone is required");
    check.finish()
  }

  /// Build the stored record. Does not validate.
  pub fn into_client(self, created_by: Ref<User>, now: DateTime<Utc>) -> Client {
    Client {
      id: Uuid::new_v4(),
      first_name: self.first_name,
      last_name: self.last_name,
      email: self.email,
      phone: self.phone,
      date_of_birth: self.date_of_birth,
      id_number: self.id_number,
      address: self.address,
      notes: self.notes,
      created_by,
      created_at: now,
      updated_at: now,
    }
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Input to [`crate::service::Office::update_client`].
///
/// Each supplied field replaces the stored one; `address` is replaced as a
/// whole. Nullable fields accept `null` to clear. The create-time checklist
/// is not re-run here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  #[serde(default, deserialize_with = "patch::nullable")]
  pub date_of_birth: Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "patch::nullable")]
  pub id_number:     Option<Option<String>>,
  #[serde(default, deserialize_with = "patch::nullable")]
  pub address:       Option<Option<Address>>,
  #[serde(default, deserialize_with = "patch::nullable")]
  pub notes:         Option<Option<String>>,
}

impl ClientUpdate {
  pub fn apply_to(self, client: &mut Client, now: DateTime<Utc>) {
    apply(&mut client.first_name, self.first_name);
    apply(&mut client.last_name, self.last_name);
    apply(&mut client.email, self.email);
    apply(&mut client.phone, self.phone);
    apply(&mut client.date_of_birth, self.date_of_birth);
    apply(&mut client.id_number, self.id_number);
    apply(&mut client.address, self.address);
    apply(&mut client.notes, self.notes);
    client.updated_at = now;
  }
}
