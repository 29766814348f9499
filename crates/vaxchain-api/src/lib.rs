//! JSON REST API for vaxchain.
//!
//! Exposes an axum [`Router`] backed by a [`RecordStore`] over any
//! [`Ledger`]. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", vaxchain_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod invoke;
pub mod repositories;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use vaxchain_core::{ledger::Ledger, store::RecordStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<L>(store: Arc<RecordStore<L>>) -> Router<()>
where
  L: Ledger + 'static,
{
  Router::new()
    // Command surface. `{key}` is one percent-encoded path segment.
    .route("/invoke", post(invoke::invoke::<L>))
    .route("/state/{key}", get(invoke::read_state::<L>))
    // Typed repository reads
    .route("/children/{birth_cert_id}", get(repositories::children::<L>))
    .route("/vaccines/{vaccine_id}", get(repositories::vaccines::<L>))
    .route("/plans/{child_id}", get(repositories::plans::<L>))
    .route("/plans", post(repositories::append_plan::<L>))
    .with_state(store)
}
