//! Ordering of a pet's ownership history for display and audit.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::record::OwnershipRecord;

/// Sort records into history order: the current record first, then the rest
/// by start date, newest first. A record without a start date sorts as if it
/// started at the Unix epoch. The sort is stable, so ties keep their input
/// order.
pub fn sort_history(records: &mut [OwnershipRecord]) {
  records.sort_by(history_order);
}

fn history_order(a: &OwnershipRecord, b: &OwnershipRecord) -> Ordering {
  b.is_current()
    .cmp(&a.is_current())
    .then_with(|| start_key(b).cmp(&start_key(a)))
}

fn start_key(record: &OwnershipRecord) -> DateTime<Utc> {
  record.start_date.unwrap_or(DateTime::UNIX_EPOCH)
}
