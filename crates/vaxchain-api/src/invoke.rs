//! Handlers for the command surface.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/invoke` | Body: `{"function":"addChildInfo","args":[...]}` |
//! | `GET`  | `/state/:key` | Raw bytes; empty body if the key was never written |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use vaxchain_core::{command::Outcome, ledger::Ledger, store::RecordStore};

use crate::error::ApiError;

/// JSON body accepted by `POST /invoke`.
///
/// `function` is a plain string so that unknown names are reported by the
/// command layer rather than rejected by the JSON extractor.
#[derive(Debug, Deserialize)]
pub struct InvokeBody {
  pub function: String,
  #[serde(default)]
  pub args:     Vec<String>,
}

/// `POST /invoke`
///
/// - `write` → 204
/// - `read` → 200 with the raw bytes
/// - `addChildInfo` / `updateVaccinationInfo` → 201 with the appended record
pub async fn invoke<L>(
  State(store): State<Arc<RecordStore<L>>>,
  Json(body): Json<InvokeBody>,
) -> Result<Response, ApiError>
where
  L: Ledger,
{
  let outcome = store.invoke(&body.function, &body.args).await?;
  Ok(outcome_response(outcome))
}

/// `GET /state/:key`
pub async fn read_state<L>(
  State(store): State<Arc<RecordStore<L>>>,
  Path(key): Path<String>,
) -> Result<Response, ApiError>
where
  L: Ledger,
{
  let bytes = store.read(&key).await?;
  Ok(outcome_response(Outcome::State(bytes)))
}

fn outcome_response(outcome: Outcome) -> Response {
  match outcome {
    Outcome::Empty => StatusCode::NO_CONTENT.into_response(),
    Outcome::State(bytes) => (
      StatusCode::OK,
      [(header::CONTENT_TYPE, "application/octet-stream")],
      Bytes::from(bytes),
    )
      .into_response(),
    Outcome::Record { key, json } => (
      StatusCode::CREATED,
      [
        (header::CONTENT_TYPE, "application/json".to_owned()),
        (header::LOCATION, format!("/state/{key}")),
      ],
      Bytes::from(json),
    )
      .into_response(),
  }
}
