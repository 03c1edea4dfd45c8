//! [`SqliteStore`]: the SQLite implementation of [`LedgerStore`].

use std::path::Path;

use petbook_core::{
  record::OwnershipRecord,
  store::{LedgerStore, RecordFilter, Transaction},
};
use rusqlite::TransactionBehavior;

use crate::{
  Error, Result,
  encode::{EncodedRecord, RawRecord, encode_uuid},
  schema::SCHEMA,
};

const COLUMNS: &str = "record_id, pet_id, owner_kind, owner_id, status, \
                       start_date, end_date, transfer_reason";

// ─── Store ───────────────────────────────────────────────────────────────────

/// An ownership ledger store backed by a single SQLite file.
///
/// All work runs on the one connection owned by [`tokio_rusqlite`], so ledger
/// transactions never interleave. Cloning is cheap; the inner connection is
/// reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `op` inside one SQLite transaction, committing only when `commit`
  /// is set and `op` succeeded. Dropping an uncommitted transaction rolls it
  /// back.
  async fn run<T, F>(
    &self,
    behavior: TransactionBehavior,
    commit: bool,
    op: F,
  ) -> petbook_core::Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut dyn Transaction) -> petbook_core::Result<T> + Send + 'static,
  {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(behavior)?;
        let outcome = op(&mut SqliteTxn { tx: &tx });
        if commit && outcome.is_ok() {
          tx.commit()?;
        }
        Ok(outcome)
      })
      .await
      .map_err(Error::from)?;
    outcome
  }
}

// ─── Transaction ─────────────────────────────────────────────────────────────

struct SqliteTxn<'a> {
  tx: &'a rusqlite::Transaction<'a>,
}

/// Build a `WHERE` clause and its positional parameters for `filter`.
fn where_clause(filter: &RecordFilter) -> (String, Vec<String>) {
  let mut conds: Vec<String> = Vec::new();
  let mut values: Vec<String> = Vec::new();

  let mut push = |column: &str, value: String| {
    values.push(value);
    conds.push(format!("{column} = ?{}", values.len()));
  };

  if let Some(pet_id) = filter.pet_id {
    push("pet_id", encode_uuid(pet_id));
  }
  if let Some(owner) = filter.owner {
    push("owner_kind", <&str>::from(owner.kind()).to_owned());
    push("owner_id", encode_uuid(owner.id()));
  }
  if let Some(status) = filter.status {
    push("status", <&str>::from(status).to_owned());
  }

  let clause = if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  };
  (clause, values)
}

impl SqliteTxn<'_> {
  fn insert_record(&self, record: &OwnershipRecord) -> Result<()> {
    let row = EncodedRecord::new(record);
    self.tx.execute(
      &format!(
        "INSERT INTO ownerships ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
      ),
      rusqlite::params![
        row.record_id,
        row.pet_id,
        row.owner_kind,
        row.owner_id,
        row.status,
        row.start_date,
        row.end_date,
        row.transfer_reason,
      ],
    )?;
    Ok(())
  }

  fn delete_records(&self, filter: &RecordFilter) -> Result<usize> {
    let (clause, values) = where_clause(filter);
    let removed = self.tx.execute(
      &format!("DELETE FROM ownerships {clause}"),
      rusqlite::params_from_iter(values.iter()),
    )?;
    Ok(removed)
  }

  fn query_records(&self, filter: &RecordFilter) -> Result<Vec<OwnershipRecord>> {
    let (clause, values) = where_clause(filter);
    let mut stmt = self
      .tx
      .prepare(&format!("SELECT {COLUMNS} FROM ownerships {clause} ORDER BY rowid"))?;
    let raws = stmt
      .query_map(rusqlite::params_from_iter(values.iter()), RawRecord::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }
}

impl Transaction for SqliteTxn<'_> {
  fn insert(&mut self, record: &OwnershipRecord) -> petbook_core::Result<()> {
    Ok(self.insert_record(record)?)
  }

  fn delete_matching(
    &mut self,
    filter: &RecordFilter,
  ) -> petbook_core::Result<usize> {
    Ok(self.delete_records(filter)?)
  }

  fn query_matching(
    &mut self,
    filter: &RecordFilter,
  ) -> petbook_core::Result<Vec<OwnershipRecord>> {
    Ok(self.query_records(filter)?)
  }
}

// ─── LedgerStore impl ────────────────────────────────────────────────────────

impl LedgerStore for SqliteStore {
  async fn read<T, F>(&self, op: F) -> petbook_core::Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut dyn Transaction) -> petbook_core::Result<T> + Send + 'static,
  {
    // Reads never commit; whatever `op` did is rolled back on drop.
    self.run(TransactionBehavior::Deferred, false, op).await
  }

  async fn write<T, F>(&self, op: F) -> petbook_core::Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut dyn Transaction) -> petbook_core::Result<T> + Send + 'static,
  {
    // IMMEDIATE takes the write lock up front so a concurrent writer on
    // another connection cannot slip in between our read and our writes.
    self.run(TransactionBehavior::Immediate, true, op).await
  }
}
