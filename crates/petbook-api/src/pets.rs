//! Handlers for `/pets/:id/...` ownership endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/pets/:id/ownership` | Body: `{"owner":{"kind":"individual","id":"..."}}`; 201 + record |
//! | `GET`  | `/pets/:id/owner` | Current owner; 404 for an orphaned pet |
//! | `POST` | `/pets/:id/transfer` | Body: [`TransferBody`]; returns the new current record |
//! | `GET`  | `/pets/:id/history` | Current record first, then past records newest first |
//!
//! Callers are expected to have authorised the request already.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use petbook_core::{
  Ledger,
  owner::Owner,
  record::{OwnershipRecord, TransferReason},
  store::LedgerStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub owner: Owner,
}

/// `POST /pets/:id/ownership`: returns 201 + the initial record.
pub async fn create_ownership<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path(pet_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let record = ledger.create_initial_ownership(pet_id, body.owner).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Current owner ────────────────────────────────────────────────────────────

/// `GET /pets/:id/owner`
pub async fn current_owner<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path(pet_id): Path<Uuid>,
) -> Result<Json<Owner>, ApiError> {
  Ok(Json(ledger.get_current_owner(pet_id).await?))
}

// ─── Transfer ─────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /pets/:id/transfer`. Exactly one of
/// `to_user_id` and `to_org_id` must be set.
#[derive(Debug, Deserialize)]
pub struct TransferBody {
  pub to_user_id: Option<Uuid>,
  pub to_org_id:  Option<Uuid>,
  pub reason:     String,
}

impl TransferBody {
  fn destination(&self) -> Result<Owner, ApiError> {
    match (self.to_user_id, self.to_org_id) {
      (Some(user), None) => Ok(Owner::Individual(user)),
      (None, Some(org)) => Ok(Owner::Organization(org)),
      (None, None) => Err(ApiError::BadRequest(
        "must specify to_user_id or to_org_id".into(),
      )),
      (Some(_), Some(_)) => Err(ApiError::BadRequest(
        "cannot specify both to_user_id and to_org_id".into(),
      )),
    }
  }
}

/// `POST /pets/:id/transfer`
pub async fn transfer<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path(pet_id): Path<Uuid>,
  Json(body): Json<TransferBody>,
) -> Result<Json<OwnershipRecord>, ApiError> {
  let new_owner = body.destination()?;
  let reason: TransferReason = body.reason.parse()?;
  let record = ledger.transfer(pet_id, new_owner, reason).await?;
  Ok(Json(record))
}

// ─── History ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
  pub pet_id:  Uuid,
  pub history: Vec<OwnershipRecord>,
}

/// `GET /pets/:id/history`. An empty history is a 200, not a 404.
pub async fn history<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path(pet_id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
  let history = ledger.get_history(pet_id).await?;
  Ok(Json(HistoryResponse { pet_id, history }))
}
