//! In-memory [`LedgerStore`] for tests and embedding.

use std::sync::{Arc, RwLock};

use crate::{
  Error, Result,
  record::OwnershipRecord,
  store::{LedgerStore, RecordFilter, Transaction},
};

/// A `Vec`-backed store behind an `RwLock`.
///
/// Read transactions run against a snapshot. Write transactions hold the write
/// lock for their whole duration and operate on a working copy that replaces
/// the shared state only when the operation succeeds, so writers are
/// serialised and a failed write leaves nothing behind.
///
/// Cloning is cheap; clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  records: Arc<RwLock<Vec<OwnershipRecord>>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Number of records currently committed.
  pub fn len(&self) -> Result<usize> {
    Ok(self.records.read().map_err(|_| poisoned())?.len())
  }

  pub fn is_empty(&self) -> Result<bool> { Ok(self.len()? == 0) }
}

fn poisoned() -> Error { Error::store("memory store lock poisoned") }

struct MemoryTxn {
  records: Vec<OwnershipRecord>,
}

impl Transaction for MemoryTxn {
  fn insert(&mut self, record: &OwnershipRecord) -> Result<()> {
    if self.records.iter().any(|r| r.record_id == record.record_id) {
      return Err(Error::store(format!(
        "duplicate record id {}",
        record.record_id
      )));
    }
    self.records.push(record.clone());
    Ok(())
  }

  fn delete_matching(&mut self, filter: &RecordFilter) -> Result<usize> {
    let before = self.records.len();
    self.records.retain(|r| !filter.matches(r));
    Ok(before - self.records.len())
  }

  fn query_matching(
    &mut self,
    filter: &RecordFilter,
  ) -> Result<Vec<OwnershipRecord>> {
    Ok(
      self
        .records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect(),
    )
  }
}

impl LedgerStore for MemoryStore {
  async fn read<T, F>(&self, op: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut dyn Transaction) -> Result<T> + Send + 'static,
  {
    let snapshot = self.records.read().map_err(|_| poisoned())?.clone();
    op(&mut MemoryTxn { records: snapshot })
  }

  async fn write<T, F>(&self, op: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut dyn Transaction) -> Result<T> + Send + 'static,
  {
    let mut shared = self.records.write().map_err(|_| poisoned())?;
    let mut txn = MemoryTxn { records: shared.clone() };
    let value = op(&mut txn)?;
    *shared = txn.records;
    Ok(value)
  }
}
