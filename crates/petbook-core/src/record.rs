//! Ownership records: one immutable fact per (pet, owner) interval.
//!
//! A record is never updated. Closing an ownership deletes the `current`
//! record and inserts a `past` replacement carrying the same owner and start
//! date, so every interval keeps its own start/end bracket.

use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use strum::{
  AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr,
};
use uuid::Uuid;

use crate::{Error, Result, owner::Owner};

// ─── Enums ───────────────────────────────────────────────────────────────────

/// Whether a record describes the present holder of the pet.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
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
pub enum OwnershipStatus {
  Current,
  Past,
}

/// Why a pet changed hands.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  IntoStaticStr,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransferReason {
  Adoption,
  Surrender,
  Rescue,
  Sale,
  Gift,
}

impl TransferReason {
  /// Comma-separated list of every accepted reason, for error messages.
  pub fn allowed_list() -> String {
    Self::iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", ")
  }
}

impl FromStr for TransferReason {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::iter()
      .find(|r| AsRef::<str>::as_ref(r) == s)
      .ok_or_else(|| Error::InvalidReason(s.to_owned()))
  }
}

impl TryFrom<&str> for TransferReason {
  type Error = Error;

  fn try_from(s: &str) -> Result<Self> { s.parse() }
}

// ─── Time ────────────────────────────────────────────────────────────────────

/// The current instant truncated to whole seconds, the precision every ledger
/// timestamp is recorded at.
pub fn timestamp_now() -> DateTime<Utc> { Utc::now().trunc_subsecs(0) }

// ─── Record ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRecord {
  pub record_id:       Uuid,
  pub pet_id:          Uuid,
  pub owner:           Owner,
  pub status:          OwnershipStatus,
  /// `None` only for stored rows whose start date is missing or unreadable.
  pub start_date:      Option<DateTime<Utc>>,
  /// Present iff `status` is [`OwnershipStatus::Past`].
  pub end_date:        Option<DateTime<Utc>>,
  /// Absent on a pet's very first ownership.
  pub transfer_reason: Option<TransferReason>,
}

impl OwnershipRecord {
  /// The first ownership of a freshly registered pet.
  pub fn initial(pet_id: Uuid, owner: Owner, at: DateTime<Utc>) -> Self {
    Self {
      record_id: Uuid::new_v4(),
      pet_id,
      owner,
      status: OwnershipStatus::Current,
      start_date: Some(at),
      end_date: None,
      transfer_reason: None,
    }
  }

  /// The ownership opened on the receiving side of a transfer.
  pub fn transferred(
    pet_id: Uuid,
    owner: Owner,
    reason: TransferReason,
    at: DateTime<Utc>,
  ) -> Self {
    Self {
      transfer_reason: Some(reason),
      ..Self::initial(pet_id, owner, at)
    }
  }

  /// The `past` replacement for this record when the pet leaves its owner.
  /// Gets a fresh `record_id`; owner and start date are carried over.
  pub fn closed(&self, reason: TransferReason, at: DateTime<Utc>) -> Self {
    Self {
      record_id:       Uuid::new_v4(),
      pet_id:          self.pet_id,
      owner:           self.owner,
      status:          OwnershipStatus::Past,
      start_date:      self.start_date,
      end_date:        Some(at),
      transfer_reason: Some(reason),
    }
  }

  pub fn is_current(&self) -> bool { self.status == OwnershipStatus::Current }
}
