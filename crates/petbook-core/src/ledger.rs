//! [`Ledger`], the authority on who owns each pet.
//!
//! Every pet with any ownership record has exactly one record in `current`
//! status. Operations acquire one transaction from the injected
//! [`LedgerStore`], operate, and release it; a transfer closes the old
//! ownership and opens the new one inside the same transaction, so a failure
//! at any step leaves the pre-transfer state behind.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  history::sort_history,
  owner::Owner,
  record::{OwnershipRecord, TransferReason, timestamp_now},
  store::{LedgerStore, RecordFilter, Transaction},
};

/// The ownership ledger over a backing store `S`.
///
/// Cloning is as cheap as cloning the store handle.
#[derive(Debug, Clone)]
pub struct Ledger<S> {
  store: S,
}

impl<S: LedgerStore> Ledger<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Record the first owner of a freshly registered pet.
  ///
  /// Fails with [`Error::AlreadyOwned`] if the pet has any record at all,
  /// current or past. Not idempotent: callers register the pet, then call
  /// this once.
  pub async fn create_initial_ownership(
    &self,
    pet_id: Uuid,
    owner: Owner,
  ) -> Result<OwnershipRecord> {
    let at = timestamp_now();

    let record = self
      .store
      .write(move |tx| {
        if !tx.query_matching(&RecordFilter::pet(pet_id))?.is_empty() {
          return Err(Error::AlreadyOwned(pet_id));
        }
        let record = OwnershipRecord::initial(pet_id, owner, at);
        tx.insert(&record)?;
        Ok(record)
      })
      .await?;

    info!(%pet_id, %owner, "initial ownership recorded");
    Ok(record)
  }

  /// Move current ownership of `pet_id` to `new_owner`.
  ///
  /// The old `current` record is replaced by a `past` one carrying its start
  /// date, `end_date = now` and `reason`; a new `current` record is opened
  /// for `new_owner` starting at the same instant. Returns the new record.
  pub async fn transfer(
    &self,
    pet_id: Uuid,
    new_owner: Owner,
    reason: TransferReason,
  ) -> Result<OwnershipRecord> {
    let now = timestamp_now();

    let (previous, opened) = self
      .store
      .write(move |tx| {
        let current = current_record(tx, pet_id)?;
        if current.owner == new_owner {
          return Err(Error::SelfTransfer { pet_id, owner: new_owner });
        }

        let at = transfer_instant(&current, now);
        let removed = tx.delete_matching(
          &RecordFilter::pet(pet_id).with_owner(current.owner).current(),
        )?;
        if removed != 1 {
          return Err(Error::PartialTransferFailure {
            pet_id,
            detail: format!(
              "closing ownership of {} removed {removed} records",
              current.owner
            ),
          });
        }
        tx.insert(&current.closed(reason, at))?;

        let opened = OwnershipRecord::transferred(pet_id, new_owner, reason, at);
        tx.insert(&opened)?;
        Ok((current.owner, opened))
      })
      .await
      .inspect_err(|e| alert_on_integrity(pet_id, e))?;

    info!(%pet_id, from = %previous, to = %new_owner, %reason, "pet transferred");
    Ok(opened)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// The party currently holding `pet_id`.
  ///
  /// [`Error::NotFound`] means the pet is orphaned (never owned, or removed
  /// by the pet registry), not that the lookup should be retried.
  pub async fn get_current_owner(&self, pet_id: Uuid) -> Result<Owner> {
    let owner = self
      .store
      .read(move |tx| current_record(tx, pet_id).map(|r| r.owner))
      .await
      .inspect_err(|e| alert_on_integrity(pet_id, e))?;

    debug!(%pet_id, %owner, "current owner resolved");
    Ok(owner)
  }

  /// Whether `owner` is the current holder of `pet_id`. A pet without any
  /// current record is owned by nobody.
  pub async fn is_current_owner(&self, pet_id: Uuid, owner: Owner) -> Result<bool> {
    self
      .store
      .read(move |tx| {
        let filter = RecordFilter::pet(pet_id).with_owner(owner).current();
        Ok(!tx.query_matching(&filter)?.is_empty())
      })
      .await
  }

  /// Every record for `pet_id`: current first, then past records newest
  /// first. Empty if the pet has never been owned.
  pub async fn get_history(&self, pet_id: Uuid) -> Result<Vec<OwnershipRecord>> {
    let mut records = self
      .store
      .read(move |tx| tx.query_matching(&RecordFilter::pet(pet_id)))
      .await?;
    sort_history(&mut records);

    debug!(%pet_id, records = records.len(), "history loaded");
    Ok(records)
  }

  /// Pets whose current owner is `owner`, sorted by id.
  pub async fn pets_owned_by(&self, owner: Owner) -> Result<Vec<Uuid>> {
    let mut pets = self
      .store
      .read(move |tx| {
        let records = tx.query_matching(&RecordFilter::owner(owner).current())?;
        Ok(records.into_iter().map(|r| r.pet_id).collect::<Vec<_>>())
      })
      .await?;
    pets.sort_unstable();
    pets.dedup();
    Ok(pets)
  }

  /// Number of pets currently held by each of `owners`. Every requested
  /// owner appears in the result, with zero if it holds nothing.
  pub async fn count_owned_by(
    &self,
    owners: &[Owner],
  ) -> Result<BTreeMap<Owner, usize>> {
    let owners = owners.to_vec();
    self
      .store
      .read(move |tx| {
        owners
          .into_iter()
          .map(|owner| -> Result<(Owner, usize)> {
            let held = tx.query_matching(&RecordFilter::owner(owner).current())?;
            Ok((owner, held.len()))
          })
          .collect()
      })
      .await
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Load the single `current` record for `pet_id`.
fn current_record(
  tx: &mut dyn Transaction,
  pet_id: Uuid,
) -> Result<OwnershipRecord> {
  let mut current = tx.query_matching(&RecordFilter::pet(pet_id).current())?;
  match current.len() {
    0 => Err(Error::NotFound(pet_id)),
    1 => Ok(current.remove(0)),
    n => Err(Error::CorruptLedger { pet_id, current: n }),
  }
}

/// The instant a transfer takes effect. Never earlier than the start of the
/// ownership being closed, so `end_date >= start_date` holds even if the
/// clock has stepped backwards.
fn transfer_instant(current: &OwnershipRecord, now: DateTime<Utc>) -> DateTime<Utc> {
  match current.start_date {
    Some(start) if start > now => start,
    _ => now,
  }
}

fn alert_on_integrity(pet_id: Uuid, err: &Error) {
  if err.is_integrity_violation() {
    error!(%pet_id, error = %err, "ownership ledger integrity alert");
  }
}
