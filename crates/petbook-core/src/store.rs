//! The `LedgerStore` trait and supporting filter type.
//!
//! The ledger consumes its backing store through three record operations
//! (insert, delete-matching, query-matching) executed inside a transaction
//! whose scope is delimited by the store. Backends (e.g.
//! `petbook-store-sqlite`, [`crate::memory::MemoryStore`]) implement this
//! contract; no query language leaks through it.

use std::future::Future;

use uuid::Uuid;

use crate::{
  Result,
  owner::Owner,
  record::{OwnershipRecord, OwnershipStatus},
};

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Predicate over [`OwnershipRecord`]s. Every field that is set must match;
/// an empty filter matches every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
  pub pet_id: Option<Uuid>,
  pub owner:  Option<Owner>,
  pub status: Option<OwnershipStatus>,
}

impl RecordFilter {
  /// All records for one pet.
  pub fn pet(pet_id: Uuid) -> Self {
    Self { pet_id: Some(pet_id), ..Self::default() }
  }

  /// All records held (now or in the past) by one owner.
  pub fn owner(owner: Owner) -> Self {
    Self { owner: Some(owner), ..Self::default() }
  }

  pub fn with_owner(self, owner: Owner) -> Self {
    Self { owner: Some(owner), ..self }
  }

  pub fn with_status(self, status: OwnershipStatus) -> Self {
    Self { status: Some(status), ..self }
  }

  pub fn current(self) -> Self { self.with_status(OwnershipStatus::Current) }

  pub fn matches(&self, record: &OwnershipRecord) -> bool {
    self.pet_id.is_none_or(|id| record.pet_id == id)
      && self.owner.is_none_or(|o| record.owner == o)
      && self.status.is_none_or(|s| record.status == s)
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Record-level operations available inside a store transaction.
pub trait Transaction {
  fn insert(&mut self, record: &OwnershipRecord) -> Result<()>;

  /// Delete every record matching `filter`; returns how many were removed.
  fn delete_matching(&mut self, filter: &RecordFilter) -> Result<usize>;

  fn query_matching(
    &mut self,
    filter: &RecordFilter,
  ) -> Result<Vec<OwnershipRecord>>;
}

/// A transactional backing store for ownership records.
///
/// Each call runs `op` inside exactly one transaction. `write` commits iff
/// `op` returns `Ok`; on `Err` every change made through the transaction is
/// discarded. Concurrent writers are serialised by the backend.
pub trait LedgerStore: Send + Sync {
  /// Run `op` in a read-only transaction.
  fn read<T, F>(&self, op: F) -> impl Future<Output = Result<T>> + Send + '_
  where
    T: Send + 'static,
    F: FnOnce(&mut dyn Transaction) -> Result<T> + Send + 'static;

  /// Run `op` in a read-write transaction.
  fn write<T, F>(&self, op: F) -> impl Future<Output = Result<T>> + Send + '_
  where
    T: Send + 'static,
    F: FnOnce(&mut dyn Transaction) -> Result<T> + Send + 'static;
}
