//! JSON REST API for the Petbook ownership ledger.
//!
//! Exposes an axum [`Router`] backed by a [`Ledger`] over any
//! [`LedgerStore`]. Authentication and authorisation (only the current
//! owner, or a manager of an owning organization, may transfer a pet) are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", petbook_api::api_router(ledger.clone()))
//! ```

pub mod error;
pub mod owners;
pub mod pets;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use petbook_core::{Ledger, store::LedgerStore};

pub use error::ApiError;

/// Build the API router for `ledger`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(ledger: Arc<Ledger<S>>) -> Router<()>
where
  S: LedgerStore + 'static,
{
  Router::new()
    .route("/pets/{id}/ownership", post(pets::create_ownership::<S>))
    .route("/pets/{id}/owner", get(pets::current_owner::<S>))
    .route("/pets/{id}/transfer", post(pets::transfer::<S>))
    .route("/pets/{id}/history", get(pets::history::<S>))
    .route("/owners/{kind}/{id}/pets", get(owners::owned_pets::<S>))
    .with_state(ledger)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use petbook_core::{
    memory::MemoryStore,
    owner::Owner,
    record::{OwnershipRecord, OwnershipStatus, TransferReason},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use crate::{owners::OwnedPets, pets::HistoryResponse};

  fn app() -> (Router, Arc<Ledger<MemoryStore>>) {
    let ledger = Arc::new(Ledger::new(MemoryStore::new()));
    (api_router(ledger.clone()), ledger)
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(b) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(b.to_string())),
      None => builder.body(Body::empty()),
    }
    .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  // ── Create / current owner ──────────────────────────────────────────────────

  #[tokio::test]
  async fn create_then_read_current_owner() {
    let (app, _) = app();
    let pet = Uuid::new_v4();
    let user = Uuid::new_v4();

    let (status, body) = send(
      &app,
      "POST",
      &format!("/pets/{pet}/ownership"),
      Some(json!({ "owner": { "kind": "individual", "id": user } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let record: OwnershipRecord = serde_json::from_value(body).unwrap();
    assert_eq!(record.owner, Owner::Individual(user));
    assert_eq!(record.status, OwnershipStatus::Current);

    let (status, body) = send(&app, "GET", &format!("/pets/{pet}/owner"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "kind": "individual", "id": user }));
  }

  #[tokio::test]
  async fn second_create_conflicts() {
    let (app, ledger) = app();
    let pet = Uuid::new_v4();
    ledger
      .create_initial_ownership(pet, Owner::Individual(Uuid::new_v4()))
      .await
      .unwrap();

    let (status, body) = send(
      &app,
      "POST",
      &format!("/pets/{pet}/ownership"),
      Some(json!({ "owner": { "kind": "organization", "id": Uuid::new_v4() } })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn orphaned_pet_is_404() {
    let (app, _) = app();
    let (status, _) =
      send(&app, "GET", &format!("/pets/{}/owner", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Transfer ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn transfer_to_organization_and_read_history() {
    let (app, ledger) = app();
    let pet = Uuid::new_v4();
    let user = Owner::Individual(Uuid::new_v4());
    let org = Uuid::new_v4();
    ledger.create_initial_ownership(pet, user).await.unwrap();

    let (status, body) = send(
      &app,
      "POST",
      &format!("/pets/{pet}/transfer"),
      Some(json!({ "to_org_id": org, "reason": "surrender" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let record: OwnershipRecord = serde_json::from_value(body).unwrap();
    assert_eq!(record.owner, Owner::Organization(org));

    let (status, body) = send(&app, "GET", &format!("/pets/{pet}/history"), None).await;
    assert_eq!(status, StatusCode::OK);
    let resp: HistoryResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.pet_id, pet);
    assert_eq!(resp.history.len(), 2);
    assert_eq!(resp.history[0].owner, Owner::Organization(org));
    assert_eq!(resp.history[1].owner, user);
    assert_eq!(resp.history[1].transfer_reason, Some(TransferReason::Surrender));
  }

  #[tokio::test]
  async fn invalid_reason_is_400_and_changes_nothing() {
    let (app, ledger) = app();
    let pet = Uuid::new_v4();
    let user = Owner::Individual(Uuid::new_v4());
    ledger.create_initial_ownership(pet, user).await.unwrap();

    let (status, body) = send(
      &app,
      "POST",
      &format!("/pets/{pet}/transfer"),
      Some(json!({ "to_user_id": Uuid::new_v4(), "reason": "theft" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("adoption"));

    assert_eq!(ledger.get_current_owner(pet).await.unwrap(), user);
    assert_eq!(ledger.get_history(pet).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn self_transfer_is_400() {
    let (app, ledger) = app();
    let pet = Uuid::new_v4();
    let user = Uuid::new_v4();
    ledger
      .create_initial_ownership(pet, Owner::Individual(user))
      .await
      .unwrap();

    let (status, _) = send(
      &app,
      "POST",
      &format!("/pets/{pet}/transfer"),
      Some(json!({ "to_user_id": user, "reason": "gift" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(ledger.get_history(pet).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn transfer_needs_exactly_one_destination() {
    let (app, ledger) = app();
    let pet = Uuid::new_v4();
    ledger
      .create_initial_ownership(pet, Owner::Individual(Uuid::new_v4()))
      .await
      .unwrap();
    let uri = format!("/pets/{pet}/transfer");

    let (status, _) = send(&app, "POST", &uri, Some(json!({ "reason": "sale" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
      &app,
      "POST",
      &uri,
      Some(json!({
        "to_user_id": Uuid::new_v4(),
        "to_org_id": Uuid::new_v4(),
        "reason": "sale",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn transfer_of_unowned_pet_is_404() {
    let (app, _) = app();
    let (status, _) = send(
      &app,
      "POST",
      &format!("/pets/{}/transfer", Uuid::new_v4()),
      Some(json!({ "to_user_id": Uuid::new_v4(), "reason": "rescue" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── History / owners ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn history_of_unknown_pet_is_empty() {
    let (app, _) = app();
    let (status, body) =
      send(&app, "GET", &format!("/pets/{}/history", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history"], json!([]));
  }

  #[tokio::test]
  async fn owned_pets_by_kind_and_id() {
    let (app, ledger) = app();
    let org = Uuid::new_v4();
    let pet = Uuid::new_v4();
    ledger
      .create_initial_ownership(pet, Owner::Organization(org))
      .await
      .unwrap();

    let (status, body) = send(&app, "GET", &format!("/owners/organization/{org}/pets"), None).await;
    assert_eq!(status, StatusCode::OK);
    let owned: OwnedPets = serde_json::from_value(body).unwrap();
    assert_eq!(owned.pet_ids, vec![pet]);
    assert_eq!(owned.count, 1);

    // Same id as an individual owns nothing.
    let (_, body) = send(&app, "GET", &format!("/owners/individual/{org}/pets"), None).await;
    assert_eq!(body["count"], 0);

    let (status, _) = send(&app, "GET", &format!("/owners/robot/{org}/pets"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
}
