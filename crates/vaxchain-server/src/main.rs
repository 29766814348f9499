//! vaxchain-server binary.
//!
//! Reads `vaxchain.toml` (or the path specified with `--config`), opens the
//! SQLite ledger, and serves the JSON API under `/api`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vaxchain_core::store::RecordStore;
use vaxchain_server::{expand_tilde, load_config, router};
use vaxchain_store_sqlite::SqliteLedger;

#[derive(Parser)]
#[command(author, version, about = "vaxchain ledger server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "vaxchain.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = load_config(&cli.config).context("failed to load configuration")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let ledger = SqliteLedger::open(&store_path)
    .await
    .with_context(|| format!("failed to open ledger at {store_path:?}"))?;
  let store = Arc::new(RecordStore::with_policy(ledger, server_cfg.append));

  let app = router(store);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!(
    store = %store_path.display(),
    max_attempts = server_cfg.append.max_attempts,
    decode = ?server_cfg.append.decode,
    "Listening on http://{address}"
  );
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
