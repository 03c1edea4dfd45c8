//! Handler for `GET /owners/:kind/:id/pets`: the pets an owner currently
//! holds, as shown on profile pages.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use petbook_core::{
  Ledger,
  owner::{Owner, OwnerKind},
  store::LedgerStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct OwnedPets {
  pub owner:   Owner,
  pub pet_ids: Vec<Uuid>,
  pub count:   usize,
}

/// `GET /owners/:kind/:id/pets` where `kind` is `individual` or
/// `organization`.
pub async fn owned_pets<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path((kind, id)): Path<(OwnerKind, Uuid)>,
) -> Result<Json<OwnedPets>, ApiError> {
  let owner = Owner::new(kind, id);
  let pet_ids = ledger.pets_owned_by(owner).await?;
  Ok(Json(OwnedPets { owner, count: pet_ids.len(), pet_ids }))
}
