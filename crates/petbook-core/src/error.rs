//! Error types for `petbook-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::{owner::Owner, record::TransferReason};

#[derive(Debug, Error)]
pub enum Error {
  #[error("pet {0} has no current owner")]
  NotFound(Uuid),

  #[error("pet {0} already has ownership records")]
  AlreadyOwned(Uuid),

  #[error("pet {pet_id} is already owned by {owner}")]
  SelfTransfer { pet_id: Uuid, owner: Owner },

  #[error(
    "invalid transfer reason {0:?}, expected one of: {allowed}",
    allowed = TransferReason::allowed_list()
  )]
  InvalidReason(String),

  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A transfer step did not touch the records it was expected to. The
  /// surrounding transaction has been rolled back.
  #[error("partial transfer of pet {pet_id}: {detail}")]
  PartialTransferFailure { pet_id: Uuid, detail: String },

  #[error("pet {pet_id} has {current} current ownership records")]
  CorruptLedger { pet_id: Uuid, current: usize },
}

impl Error {
  /// Wrap any backend failure as [`Error::StoreUnavailable`].
  pub fn store(
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    Self::StoreUnavailable(source.into())
  }

  /// Whether this error means the single-current-owner rule was (or would
  /// have been) broken.
  pub fn is_integrity_violation(&self) -> bool {
    matches!(
      self,
      Self::PartialTransferFailure { .. } | Self::CorruptLedger { .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
