//! Field-level replacement semantics for update inputs.
//!
//! An update field is either absent (keep the stored value) or present
//! (replace it). For optional fields "present" includes an explicit `null`,
//! which clears the stored value. Serde cannot tell absent from `null` on its
//! own, so nullable fields use [`nullable`] together with `#[serde(default)]`.

use serde::{Deserialize, Deserializer};

/// Deserialise a field that was present in the input, whether `null` or not.
///
/// Use as `#[serde(default, deserialize_with = "crate::patch::nullable")]` on
/// an `Option<Option<T>>`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

/// Overwrite `slot` with `value` if the field was supplied.
pub fn apply<T>(slot: &mut T, value: Option<T>) {
  if let Some(v) = value {
    *slot = v;
  }
}
