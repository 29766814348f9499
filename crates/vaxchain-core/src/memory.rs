//! [`MemoryLedger`] — a process-local [`Ledger`] backed by a `HashMap`.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::ledger::{ContentHash, Ledger};

/// An in-memory ledger — useful for testing.
///
/// Cloning is cheap and clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
  state: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryLedger {
  pub fn new() -> Self { Self::default() }

  /// Number of keys ever written.
  pub fn len(&self) -> usize { self.lock().len() }

  pub fn is_empty(&self) -> bool { self.lock().is_empty() }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
    // The map is never left half-updated, so a poisoned lock is still usable.
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl Ledger for MemoryLedger {
  type Error = Infallible;

  async fn get(&self, key: &str) -> Result<Vec<u8>, Infallible> {
    Ok(self.lock().get(key).cloned().unwrap_or_default())
  }

  async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), Infallible> {
    self.lock().insert(key.to_owned(), value);
    Ok(())
  }

  async fn compare_and_put(
    &self,
    key: &str,
    expected: ContentHash,
    value: Vec<u8>,
  ) -> Result<bool, Infallible> {
    let mut state = self.lock();
    let current = state.get(key).map(Vec::as_slice).unwrap_or_default();
    if ContentHash::of(current) != expected {
      return Ok(false);
    }
    state.insert(key.to_owned(), value);
    Ok(true)
  }
}
