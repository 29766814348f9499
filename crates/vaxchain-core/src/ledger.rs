//! The `Ledger` trait — the key-value port every backend implements.
//!
//! The ledger owns the persisted bytes. It offers no list append and no
//! transactions; the only concurrency primitive is [`Ledger::compare_and_put`],
//! which the append engine uses to detect a write that landed between its
//! read and its write-back.

use std::{fmt, future::Future};

use sha2::{Digest, Sha256};

// ─── Content hash ────────────────────────────────────────────────────────────

/// Lowercase hex SHA-256 digest of a stored value.
///
/// An absent key hashes like an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
  pub fn of(bytes: &[u8]) -> Self { Self(hex::encode(Sha256::digest(bytes))) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ContentHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the external key-value ledger.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait Ledger: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value at `key`. A key that was never written yields an empty
  /// vector, not an error.
  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send + 'a;

  /// Replace the value at `key` unconditionally.
  fn put<'a>(
    &'a self,
    key: &'a str,
    value: Vec<u8>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Replace the value at `key` only if its current value still hashes to
  /// `expected`. Returns `false`, writing nothing, if it does not.
  ///
  /// Must be atomic with respect to every other operation on this ledger.
  fn compare_and_put<'a>(
    &'a self,
    key: &'a str,
    expected: ContentHash,
    value: Vec<u8>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_value_hash_is_stable() {
    assert_eq!(ContentHash::of(b""), ContentHash::of(&[]));
    assert_eq!(
      ContentHash::of(b"").as_str(),
      "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
  }

  #[test]
  fn different_values_hash_differently() {
    assert_ne!(ContentHash::of(b"{}"), ContentHash::of(b"{} "));
  }
}
