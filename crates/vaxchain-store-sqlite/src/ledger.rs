//! [`SqliteLedger`] — the SQLite implementation of [`Ledger`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use vaxchain_core::ledger::{ContentHash, Ledger};

use crate::{
  Error, Result,
  schema::{SCHEMA, UPSERT},
};

// ─── Ledger ──────────────────────────────────────────────────────────────────

/// A key-value ledger backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All
/// statements run on the connection's own thread one closure at a time, which
/// is what makes [`Ledger::compare_and_put`] atomic.
#[derive(Clone)]
pub struct SqliteLedger {
  conn: tokio_rusqlite::Connection,
}

impl SqliteLedger {
  /// Open (or create) a ledger at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let ledger = Self { conn };
    ledger.init_schema().await?;
    Ok(ledger)
  }

  /// Open an in-memory ledger — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let ledger = Self { conn };
    ledger.init_schema().await?;
    Ok(ledger)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of keys holding a value.
  pub async fn key_count(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM world_state", [], |r| r.get(0))?)
      })
      .await?;
    Ok(count.max(0) as u64)
  }
}

fn select_value(
  conn: &rusqlite::Connection,
  key: &str,
) -> rusqlite::Result<Option<Vec<u8>>> {
  conn
    .query_row(
      "SELECT value FROM world_state WHERE state_key = ?1",
      rusqlite::params![key],
      |r| r.get(0),
    )
    .optional()
}

// ─── Ledger impl ─────────────────────────────────────────────────────────────

impl Ledger for SqliteLedger {
  type Error = Error;

  async fn get(&self, key: &str) -> Result<Vec<u8>> {
    let key = key.to_owned();
    let value = self
      .conn
      .call(move |conn| Ok(select_value(conn, &key)?))
      .await?;
    Ok(value.unwrap_or_default())
  }

  async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
    let key    = key.to_owned();
    let at_str = Utc::now().to_rfc3339();

    self
      .conn
      .call(move |conn| {
        conn.execute(UPSERT, rusqlite::params![key, value, at_str])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn compare_and_put(
    &self,
    key:      &str,
    expected: ContentHash,
    value:    Vec<u8>,
  ) -> Result<bool> {
    let key_str = key.to_owned();
    let at_str  = Utc::now().to_rfc3339();

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current = select_value(&tx, &key_str)?.unwrap_or_default();
        if ContentHash::of(&current) != expected {
          return Ok(false);
        }
        tx.execute(UPSERT, rusqlite::params![key_str, value, at_str])?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !written {
      tracing::debug!(key, "compare-and-put lost to a concurrent write");
    }
    Ok(written)
  }
}
