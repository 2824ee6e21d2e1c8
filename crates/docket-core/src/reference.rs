//! Weak references between entities.
//!
//! A [`Ref`] is a stored identifier pointing at another entity. It carries no
//! ownership and no existence guarantee: the target may have been deleted
//! since the reference was written. Resolution always yields an `Option`.

use std::{fmt, hash::Hash, marker::PhantomData, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// A typed identifier of a `T`, serialised as a bare UUID.
pub struct Ref<T> {
  id: Uuid,
  _to: PhantomData<fn() -> T>,
}

impl<T> Ref<T> {
  pub const fn new(id: Uuid) -> Self {
    Self { id, _to: PhantomData }
  }

  pub const fn id(&self) -> Uuid { self.id }
}

// Manual impls: derives would demand the same bounds of `T`.

impl<T> Clone for Ref<T> {
  fn clone(&self) -> Self { *self }
}

impl<T> Copy for Ref<T> {}

impl<T> PartialEq for Ref<T> {
  fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl<T> Eq for Ref<T> {}

impl<T> Hash for Ref<T> {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) { self.id.hash(state) }
}

impl<T> fmt::Debug for Ref<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Ref({})", self.id)
  }
}

impl<T> fmt::Display for Ref<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.id.fmt(f)
  }
}

impl<T> From<Uuid> for Ref<T> {
  fn from(id: Uuid) -> Self { Self::new(id) }
}

impl<T> FromStr for Ref<T> {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Uuid::parse_str(s).map(Self::new) }
}

impl<T> Serialize for Ref<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.id.serialize(serializer)
  }
}

impl<'de, T> Deserialize<'de> for Ref<T> {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    Uuid::deserialize(deserializer).map(Self::new)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Target;

  #[test]
  fn serialises_as_bare_uuid() {
    let id = Uuid::new_v4();
    let r: Ref<Target> = Ref::new(id);
    let json = serde_json::to_string(&r).unwrap();
    assert_eq!(json, format!("\"{id}\""));

    let back: Ref<Target> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, r);
  }

  #[test]
  fn parses_from_text() {
    let id = Uuid::new_v4();
    assert_eq!(id.to_string().parse::<Ref<Target>>().unwrap().id(), id);
    assert!("not-a-uuid".parse::<Ref<Target>>().is_err());
  }
}
