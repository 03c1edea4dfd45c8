//! Encoding and decoding helpers between ledger types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, and enums by their lowercase names.

use chrono::{DateTime, Utc};
use petbook_core::{
  owner::{Owner, OwnerKind},
  record::{OwnershipRecord, OwnershipStatus, TransferReason},
};
use tracing::warn;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

fn decode_owner_kind(s: &str) -> Result<OwnerKind> {
  s.parse().map_err(|_| Error::UnknownValue {
    column: "owner_kind",
    value:  s.to_owned(),
  })
}

fn decode_status(s: &str) -> Result<OwnershipStatus> {
  s.parse().map_err(|_| Error::UnknownValue {
    column: "status",
    value:  s.to_owned(),
  })
}

fn decode_reason(s: &str) -> Result<TransferReason> {
  s.parse().map_err(|_| Error::UnknownValue {
    column: "transfer_reason",
    value:  s.to_owned(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values bound for an `ownerships` insert, in schema order.
pub struct EncodedRecord {
  pub record_id:       String,
  pub pet_id:          String,
  pub owner_kind:      &'static str,
  pub owner_id:        String,
  pub status:          &'static str,
  pub start_date:      Option<String>,
  pub end_date:        Option<String>,
  pub transfer_reason: Option<&'static str>,
}

impl EncodedRecord {
  pub fn new(record: &OwnershipRecord) -> Self {
    Self {
      record_id:       encode_uuid(record.record_id),
      pet_id:          encode_uuid(record.pet_id),
      owner_kind:      record.owner.kind().into(),
      owner_id:        encode_uuid(record.owner.id()),
      status:          record.status.into(),
      start_date:      record.start_date.map(encode_dt),
      end_date:        record.end_date.map(encode_dt),
      transfer_reason: record.transfer_reason.map(Into::into),
    }
  }
}

/// Raw strings read directly from an `ownerships` row.
pub struct RawRecord {
  pub record_id:       String,
  pub pet_id:          String,
  pub owner_kind:      String,
  pub owner_id:        String,
  pub status:          String,
  pub start_date:      Option<String>,
  pub end_date:        Option<String>,
  pub transfer_reason: Option<String>,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:       row.get(0)?,
      pet_id:          row.get(1)?,
      owner_kind:      row.get(2)?,
      owner_id:        row.get(3)?,
      status:          row.get(4)?,
      start_date:      row.get(5)?,
      end_date:        row.get(6)?,
      transfer_reason: row.get(7)?,
    })
  }

  pub fn into_record(self) -> Result<OwnershipRecord> {
    let record_id = decode_uuid(&self.record_id)?;
    let owner = Owner::new(
      decode_owner_kind(&self.owner_kind)?,
      decode_uuid(&self.owner_id)?,
    );

    // An unreadable start date must not hide the record; it sorts as oldest.
    let start_date = match self.start_date.as_deref().map(decode_dt) {
      Some(Ok(dt)) => Some(dt),
      Some(Err(e)) => {
        warn!(%record_id, error = %e, "unreadable ownership start date");
        None
      }
      None => None,
    };

    Ok(OwnershipRecord {
      record_id,
      pet_id: decode_uuid(&self.pet_id)?,
      owner,
      status: decode_status(&self.status)?,
      start_date,
      end_date: self.end_date.as_deref().map(decode_dt).transpose()?,
      transfer_reason: self
        .transfer_reason
        .as_deref()
        .map(decode_reason)
        .transpose()?,
    })
  }
}
