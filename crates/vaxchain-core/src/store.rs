//! [`RecordStore`] — the append engine layered over a [`Ledger`].
//!
//! An append is read-modify-write over a single key: fetch the container (or
//! start an empty one), push the record, write the whole container back. The
//! write-back is a compare-and-put against the hash of the bytes that were
//! read, so a concurrent append to the same key is detected and the whole
//! cycle is replayed against the newer container instead of being overwritten.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
  Error, Result,
  error::StorageOp,
  ledger::{ContentHash, Ledger},
  record::Record,
  repository::{self, Repository},
};

// ─── Policy ──────────────────────────────────────────────────────────────────

/// What to do with stored bytes that do not decode as the expected container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
  /// Fail with [`Error::Corruption`] and leave the stored bytes untouched.
  #[default]
  Strict,
  /// Treat the key as holding an empty container. Whatever was stored there
  /// is replaced on the next append.
  Lenient,
}

/// Tuning for [`RecordStore::append`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppendPolicy {
  /// Read-modify-write cycles to attempt before giving up with
  /// [`Error::Contention`]. Values below 1 are treated as 1.
  pub max_attempts: u32,
  pub decode:       DecodePolicy,
}

impl Default for AppendPolicy {
  fn default() -> Self { Self { max_attempts: 16, decode: DecodePolicy::Strict } }
}

/// Where an appended record landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendReceipt {
  pub key:      String,
  /// Zero-based index of the record within its container.
  pub position: usize,
  /// Read-modify-write cycles it took; more than one means another writer
  /// got in first.
  pub attempts: u32,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Typed access to repository containers held in a [`Ledger`].
///
/// Holds no state between calls besides its configuration; every operation
/// starts from what the ledger currently stores.
#[derive(Debug, Clone)]
pub struct RecordStore<L> {
  ledger: L,
  policy: AppendPolicy,
}

impl<L: Ledger> RecordStore<L> {
  pub fn new(ledger: L) -> Self { Self::with_policy(ledger, AppendPolicy::default()) }

  pub fn with_policy(ledger: L, policy: AppendPolicy) -> Self { Self { ledger, policy } }

  pub fn ledger(&self) -> &L { &self.ledger }

  // ── Raw state ───────────────────────────────────────────────────────────

  /// Raw bytes at `key`; empty if the key was never written.
  pub async fn read(&self, key: &str) -> Result<Vec<u8>> {
    self
      .ledger
      .get(key)
      .await
      .map_err(|e| Error::storage(StorageOp::Get, key, e))
  }

  /// Overwrite `key` with `value`, bypassing any container logic.
  pub async fn write(&self, key: &str, value: Vec<u8>) -> Result<()> {
    self
      .ledger
      .put(key, value)
      .await
      .map_err(|e| Error::storage(StorageOp::Put, key, e))
  }

  // ── Repositories ────────────────────────────────────────────────────────

  /// All records of type `R` stored under `key`, in insertion order.
  pub async fn load<R: Record>(&self, key: &str) -> Result<Vec<R>> {
    let raw = self.read(key).await?;
    Ok(self.decode::<R::Repository>(key, &raw)?.into_records())
  }

  /// Append `record` to the container at `key`, creating it if absent.
  ///
  /// No uniqueness check is made: appending the same record twice stores it
  /// twice.
  pub async fn append<R: Record>(&self, key: &str, record: R) -> Result<AppendReceipt> {
    let max_attempts = self.policy.max_attempts.max(1);
    let mut attempts = 0;

    loop {
      attempts += 1;

      let raw = self.read(key).await?;
      let expected = ContentHash::of(&raw);

      let mut repo = self.decode::<R::Repository>(key, &raw)?;
      repo.push(record.clone());
      let position = repo.len() - 1;
      let encoded = repository::encode(&repo)?;

      let written = self
        .ledger
        .compare_and_put(key, expected, encoded)
        .await
        .map_err(|e| Error::append(key, e))?;

      if written {
        debug!(key, kind = R::KIND, position, attempts, "appended record");
        return Ok(AppendReceipt { key: key.to_owned(), position, attempts });
      }
      if attempts >= max_attempts {
        return Err(Error::Contention { key: key.to_owned(), attempts });
      }
      debug!(key, kind = R::KIND, attempts, "repository changed during append, retrying");
    }
  }

  /// Append `record` under the key derived from its natural key.
  pub async fn append_keyed<R: Record>(&self, record: R) -> Result<AppendReceipt> {
    let key = record.storage_key();
    self.append(&key, record).await
  }

  fn decode<C: Repository>(&self, key: &str, raw: &[u8]) -> Result<C> {
    match repository::decode::<C>(raw) {
      Ok(repo) => Ok(repo),
      Err(e) => match self.policy.decode {
        DecodePolicy::Strict => Err(Error::Corruption { key: key.to_owned(), source: e }),
        DecodePolicy::Lenient => {
          warn!(key, error = %e, "discarding undecodable repository");
          Ok(C::default())
        }
      },
    }
  }
}
