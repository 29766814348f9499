//! HTTP server wiring for vaxchain.
//!
//! Configuration loading and router assembly live here so they can be tested
//! without binding a socket; `main.rs` only glues them to a listener.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use vaxchain_core::{
  ledger::Ledger,
  store::{AppendPolicy, RecordStore},
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `vaxchain.toml` and
/// `VAXCHAIN_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub append:     AppendPolicy,
}

/// Layer defaults, the TOML file at `path` (if it exists) and the
/// environment, in increasing order of precedence.
///
/// Nested keys use a double underscore: `VAXCHAIN_APPEND__MAX_ATTEMPTS=32`.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 7050)?
    .set_default("store_path", "vaxchain.db")?
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix("VAXCHAIN")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()?
    .try_deserialize()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API mounted under `/api`, with request tracing.
pub fn router<L>(store: Arc<RecordStore<L>>) -> Router
where
  L: Ledger + 'static,
{
  Router::new()
    .nest("/api", vaxchain_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
