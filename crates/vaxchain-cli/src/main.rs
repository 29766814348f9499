//! `vaxchain` — command-line access to the vaxchain record store.
//!
//! # Usage
//!
//! ```
//! vaxchain --store ledger.db invoke addChildInfo BC1 Amy Bob 1980-01-01 F1 9998887777 2020-05-01 CityX 900 "123 St"
//! vaxchain --url http://localhost:7050 invoke read BC1_2
//! vaxchain --config ~/.config/vaxchain/cli.toml children BC1
//! ```
//!
//! With `--store` the command runs in-process against a SQLite ledger file;
//! otherwise it is sent to a running `vaxchain-server`.

mod client;

use std::{
  io::{self, Write as _},
  path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::ApiClient;
use serde::Deserialize;
use serde_json::Value;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vaxchain_core::{
  record::{ChildDetails, Record, VaccinationInfo, VaccinationPlan},
  store::RecordStore,
};
use vaxchain_store_sqlite::SqliteLedger;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vaxchain", about = "Command-line access to the vaxchain record store")]
struct Args {
  /// Path to a TOML config file (url, store_path).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the vaxchain server (default: http://localhost:7050).
  #[arg(long, env = "VAXCHAIN_URL", conflicts_with = "store")]
  url: Option<String>,

  /// Operate directly on this SQLite ledger file instead of a server.
  #[arg(long, env = "VAXCHAIN_STORE", value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Run write, read, addChildInfo or updateVaccinationInfo.
  Invoke {
    function: String,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args:     Vec<String>,
  },
  /// List the identity records stored for a birth certificate.
  Children { birth_cert_id: String },
  /// List the catalog entries stored for a vaccine.
  Vaccines { vaccine_id: String },
  /// List the vaccination plans stored for a child.
  Plans { child_id: String },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:        String,
  #[serde(default)]
  store_path: Option<PathBuf>,
}

/// Where commands are executed.
enum Backend {
  Local(RecordStore<SqliteLedger>),
  Remote(ApiClient),
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let backend = match (args.store.or(file_cfg.store_path), args.url) {
    (Some(path), None) => {
      let ledger = SqliteLedger::open(&path)
        .await
        .with_context(|| format!("opening ledger {}", path.display()))?;
      Backend::Local(RecordStore::new(ledger))
    }
    (_, url) => {
      let base_url = url
        .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
        .unwrap_or_else(|| "http://localhost:7050".to_string());
      Backend::Remote(ApiClient::new(base_url)?)
    }
  };

  match args.command {
    Command::Invoke { function, args } => {
      let payload = backend.invoke(&function, &args).await?;
      let mut stdout = io::stdout().lock();
      stdout.write_all(&payload)?;
      if !payload.is_empty() {
        writeln!(stdout)?;
      }
    }
    Command::Children { birth_cert_id } => {
      print_json(&backend.list::<ChildDetails>("children", &birth_cert_id).await?)?;
    }
    Command::Vaccines { vaccine_id } => {
      print_json(&backend.list::<VaccinationInfo>("vaccines", &vaccine_id).await?)?;
    }
    Command::Plans { child_id } => {
      print_json(&backend.list::<VaccinationPlan>("plans", &child_id).await?)?;
    }
  }

  Ok(())
}

impl Backend {
  async fn invoke(&self, function: &str, args: &[String]) -> Result<Vec<u8>> {
    match self {
      Backend::Local(store) => {
        let outcome = store.invoke(function, args).await?;
        Ok(outcome.payload().to_vec())
      }
      Backend::Remote(client) => client.invoke(function, args).await,
    }
  }

  async fn list<R: Record>(&self, collection: &str, natural_key: &str) -> Result<Value> {
    match self {
      Backend::Local(store) => {
        let records = store.load::<R>(&R::key_for(natural_key)).await?;
        Ok(serde_json::to_value(records)?)
      }
      Backend::Remote(client) => client.list(collection, natural_key).await,
    }
  }
}

fn print_json(value: &Value) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn invoke_collects_trailing_args() {
    let args = Args::try_parse_from([
      "vaxchain", "--store", "x.db", "invoke", "updateVaccinationInfo", "V1", "BCG",
      "1", "3", "30", "1",
    ])
    .unwrap();
    let Command::Invoke { function, args: rest } = args.command else {
      panic!("expected invoke");
    };
    assert_eq!(function, "updateVaccinationInfo");
    assert_eq!(rest.len(), 6);
  }

  #[test]
  fn url_and_store_conflict() {
    let err = Args::try_parse_from([
      "vaxchain", "--store", "x.db", "--url", "http://h", "children", "BC1",
    ]);
    assert!(err.is_err());
  }

  #[test]
  fn config_file_fields_are_optional() {
    let cfg: ConfigFile = toml::from_str("url = \"http://ledger:7050\"").unwrap();
    assert_eq!(cfg.url, "http://ledger:7050");
    assert!(cfg.store_path.is_none());
  }
}
