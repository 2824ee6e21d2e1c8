//! Input validation that reports every violated field at once.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One violated field and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  /// Wire name of the field, e.g. `firstName`.
  pub field:   String,
  pub message: String,
}

/// Accumulates field errors; [`Checklist::finish`] turns them into
/// [`Error::Validation`] if any were recorded.
#[derive(Debug, Default)]
pub struct Checklist {
  errors: Vec<FieldError>,
}

impl Checklist {
  pub fn new() -> Self { Self::default() }

  pub fn fail(&mut self, field: &str, message: impl Into<String>) {
    self.errors.push(FieldError {
      field:   field.to_owned(),
      message: message.into(),
    });
  }

  /// Whitespace-only counts as missing.
  pub fn required(&mut self, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
      self.fail(field, message);
    }
  }

  pub fn email(&mut self, field: &str, value: &str, message: &str) {
    if !is_email(value) {
      self.fail(field, message);
    }
  }

  /// Parse an optional value; blank counts as absent, an unparseable value
  /// is recorded as `Invalid {field}`.
  pub fn parse<T: FromStr>(&mut self, field: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty())?;
    match raw.parse() {
      Ok(value) => Some(value),
      Err(_) => {
        self.fail(field, format!("Invalid {field}: {raw:?}"));
        None
      }
    }
  }

  /// Like [`Checklist::parse`], but an absent value fails with `message`.
  pub fn parse_required<T: FromStr>(
    &mut self,
    field: &str,
    raw: Option<&str>,
    message: &str,
  ) -> Option<T> {
    if raw.is_none_or(|v| v.trim().is_empty()) {
      self.fail(field, message);
      return None;
    }
    self.parse(field, raw)
  }

  pub fn non_negative(&mut self, field: &str, value: Option<f64>) {
    if let Some(v) = value
      && !(v.is_finite() && v >= 0.0)
    {
      self.fail(field, format!("{field} must be a non-negative number"));
    }
  }

  pub fn finish(self) -> Result<()> {
    if self.errors.is_empty() {
      Ok(())
    } else {
      Err(self.into_error())
    }
  }

  /// The recorded errors as [`Error::Validation`], even if there are none.
  pub fn into_error(self) -> Error { Error::Validation(self.errors) }
}

/// Structural email check: `local@domain.tld`, no whitespace, one `@`.
pub fn is_email(s: &str) -> bool {
  if s.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  let labels: Vec<&str> = domain.split('.').collect();
  labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}
