//! Typed reads of repository containers, and plan appends.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/children/:birth_cert_id` | All [`ChildDetails`] under `<id>_2` |
//! | `GET`  | `/vaccines/:vaccine_id` | All [`VaccinationInfo`] under `<id>_2` |
//! | `GET`  | `/plans/:child_id` | All [`VaccinationPlan`] under `<id>_plan` |
//! | `POST` | `/plans` | Body: a [`VaccinationPlan`]; returns 201 + append receipt |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use vaxchain_core::{
  ledger::Ledger,
  record::{ChildDetails, Record, VaccinationInfo, VaccinationPlan},
  store::RecordStore,
};

use crate::error::ApiError;

async fn load<L, R>(store: &RecordStore<L>, natural_key: &str) -> Result<Json<Vec<R>>, ApiError>
where
  L: Ledger,
  R: Record,
{
  let records = store.load::<R>(&R::key_for(natural_key)).await?;
  Ok(Json(records))
}

/// `GET /children/:birth_cert_id`
pub async fn children<L>(
  State(store): State<Arc<RecordStore<L>>>,
  Path(birth_cert_id): Path<String>,
) -> Result<Json<Vec<ChildDetails>>, ApiError>
where
  L: Ledger,
{
  load(&*store, &birth_cert_id).await
}

/// `GET /vaccines/:vaccine_id`
pub async fn vaccines<L>(
  State(store): State<Arc<RecordStore<L>>>,
  Path(vaccine_id): Path<String>,
) -> Result<Json<Vec<VaccinationInfo>>, ApiError>
where
  L: Ledger,
{
  load(&*store, &vaccine_id).await
}

/// `GET /plans/:child_id`
pub async fn plans<L>(
  State(store): State<Arc<RecordStore<L>>>,
  Path(child_id): Path<String>,
) -> Result<Json<Vec<VaccinationPlan>>, ApiError>
where
  L: Ledger,
{
  load(&*store, &child_id).await
}

/// `POST /plans`
pub async fn append_plan<L>(
  State(store): State<Arc<RecordStore<L>>>,
  Json(plan): Json<VaccinationPlan>,
) -> Result<impl IntoResponse, ApiError>
where
  L: Ledger,
{
  if plan.child_id.is_empty() {
    return Err(ApiError::BadRequest("ChildID must not be empty".into()));
  }
  let receipt = store.append_keyed(plan).await?;
  Ok((StatusCode::CREATED, Json(receipt)))
}
