//! Owners: the parties that can hold a pet.
//!
//! Owner identity belongs to the owner directory; the ledger only ever stores
//! the kind and UUID.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use uuid::Uuid;

/// The kind of party an [`Owner`] is.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OwnerKind {
  Individual,
  Organization,
}

/// An individual or an organization, identified by UUID.
///
/// Serialises as `{"kind": "individual", "id": "<uuid>"}`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Owner {
  Individual(Uuid),
  Organization(Uuid),
}

impl Owner {
  pub fn new(kind: OwnerKind, id: Uuid) -> Self {
    match kind {
      OwnerKind::Individual => Self::Individual(id),
      OwnerKind::Organization => Self::Organization(id),
    }
  }

  pub fn kind(&self) -> OwnerKind {
    match self {
      Self::Individual(_) => OwnerKind::Individual,
      Self::Organization(_) => OwnerKind::Organization,
    }
  }

  pub fn id(&self) -> Uuid {
    match self {
      Self::Individual(id) | Self::Organization(id) => *id,
    }
  }
}

impl fmt::Display for Owner {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.kind(), self.id())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn same_id_different_kind_is_a_different_owner() {
    let id = Uuid::new_v4();
    assert_ne!(Owner::Individual(id), Owner::Organization(id));
    assert_eq!(Owner::new(OwnerKind::Organization, id), Owner::Organization(id));
  }

  #[test]
  fn serialises_as_kind_and_id() {
    let id = Uuid::new_v4();
    let json = serde_json::to_value(Owner::Organization(id)).unwrap();
    assert_eq!(json["kind"], "organization");
    assert_eq!(json["id"], id.to_string());

    let back: Owner = serde_json::from_value(json).unwrap();
    assert_eq!(back, Owner::Organization(id));
  }

  #[test]
  fn kind_parses_from_lowercase() {
    assert_eq!("individual".parse::<OwnerKind>().unwrap(), OwnerKind::Individual);
    assert!("Person".parse::<OwnerKind>().is_err());
  }
}
